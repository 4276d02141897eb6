//! Get/set capabilities over single slots of a container.
//!
//! Every write the engine performs goes through a [`ValuePointer`] or a
//! [`ListPointer`]. Neither exposes the rest of the owning container.

use std::fmt;
use std::sync::Arc;

use structedit_core::Shared;

/// Accessor projecting a container onto one of its slots.
pub type Accessor<C, T> = fn(&mut C) -> &mut T;

/// Get/set access to one mutable slot.
pub struct ValuePointer<T> {
    get: Arc<dyn Fn() -> T + Send + Sync>,
    set: Arc<dyn Fn(T) + Send + Sync>,
}

impl<T: Clone + 'static> ValuePointer<T> {
    pub fn new(
        get: impl Fn() -> T + Send + Sync + 'static,
        set: impl Fn(T) + Send + Sync + 'static,
    ) -> Self {
        Self {
            get: Arc::new(get),
            set: Arc::new(set),
        }
    }

    /// Pointer to the field of `container` selected by `accessor`.
    pub fn field<C>(container: Shared<C>, accessor: Accessor<C, T>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let writer = container.clone();
        Self::new(
            move || accessor(&mut container.write()).clone(),
            move |value| *accessor(&mut writer.write()) = value,
        )
    }

    /// Current value of the slot.
    pub fn get(&self) -> T {
        (self.get)()
    }

    /// Overwrites the slot with `value`.
    pub fn set(&self, value: T) {
        (self.set)(value)
    }
}

impl<T> Clone for ValuePointer<T> {
    fn clone(&self) -> Self {
        Self {
            get: self.get.clone(),
            set: self.set.clone(),
        }
    }
}

impl<T> fmt::Debug for ValuePointer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuePointer")
            .field("type", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

/// Access to a `Vec` slot of a container.
pub struct ListPointer<C: ?Sized, L> {
    container: Shared<C>,
    accessor: Accessor<C, Vec<L>>,
}

impl<C, L> ListPointer<C, L>
where
    C: ?Sized + Send + Sync + 'static,
    L: Clone + Send + Sync + 'static,
{
    pub fn new(container: Shared<C>, accessor: Accessor<C, Vec<L>>) -> Self {
        Self {
            container,
            accessor,
        }
    }

    pub fn container(&self) -> &Shared<C> {
        &self.container
    }

    /// Copy of the current items. No lock is held once this returns.
    pub fn snapshot(&self) -> Vec<L> {
        (self.accessor)(&mut self.container.write()).clone()
    }

    /// Runs `f` against the list while the container is locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut Vec<L>) -> R) -> R {
        f((self.accessor)(&mut self.container.write()))
    }

    /// Pointer to the item at `index`.
    ///
    /// Reads yield `None` once the index is out of range. Writing `None`,
    /// or writing past the end, leaves the list unchanged.
    pub fn entry(&self, index: usize) -> ValuePointer<Option<L>> {
        let reader = self.clone();
        let writer = self.clone();
        ValuePointer::new(
            move || reader.with(|items| items.get(index).cloned()),
            move |value| {
                writer.with(|items| {
                    if let (Some(slot), Some(value)) = (items.get_mut(index), value) {
                        *slot = value;
                    }
                })
            },
        )
    }
}

impl<C: ?Sized, L> Clone for ListPointer<C, L> {
    fn clone(&self) -> Self {
        Self {
            container: self.container.clone(),
            accessor: self.accessor,
        }
    }
}

impl<C: ?Sized, L> fmt::Debug for ListPointer<C, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListPointer")
            .field("item", &std::any::type_name::<L>())
            .finish_non_exhaustive()
    }
}
