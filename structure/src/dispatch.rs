//! Runtime dispatch over declared types.
//!
//! Handlers are registered against a *declared* type `K`, which is either
//! a concrete container type or an interface (`dyn Trait`). A
//! [`TypeTable`] records which concrete types are assignable to which
//! declared types, and how to view a concrete handle as a `Shared<K>`.
//!
//! Dispatching a [`Target`] runs every handler whose declared type the
//! target is assignable to, in registration order, and concatenates the
//! results. Registering the same declared type twice runs it twice.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use structedit_core::{Shared, Target};

type Cast = Arc<dyn Fn(&Target) -> Option<Box<dyn Any>> + Send + Sync>;

/// Assignability of concrete types to declared types.
#[derive(Default)]
pub struct TypeTable {
    /// Declared type -> (concrete type, cast) pairs.
    casts: HashMap<TypeId, Vec<(TypeId, Cast)>>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `C` assignable to itself. Registering twice has no effect.
    pub fn register<C: Send + Sync + 'static>(&mut self) {
        self.register_cast::<C, C>(|shared| shared);
    }

    /// Declares that `C` is assignable to `K`, viewing a `Shared<C>` as a
    /// `Shared<K>` through `cast`. The first cast registered for a pair
    /// is kept.
    ///
    /// ```ignore
    /// types.register_cast::<Group, dyn ContactContainer>(|g| upcast!(g => dyn ContactContainer));
    /// ```
    pub fn register_cast<C, K>(&mut self, cast: impl Fn(Shared<C>) -> Shared<K> + Send + Sync + 'static)
    where
        C: Send + Sync + 'static,
        K: ?Sized + 'static,
    {
        let source = TypeId::of::<C>();
        let entries = self.casts.entry(TypeId::of::<K>()).or_default();
        if entries.iter().any(|(id, _)| *id == source) {
            log::trace!(
                "{} is already assignable to {}",
                std::any::type_name::<C>(),
                std::any::type_name::<K>()
            );
            return;
        }
        let cast: Cast = Arc::new(move |target: &Target| -> Option<Box<dyn Any>> {
            let shared = target.downcast::<C>()?;
            Some(Box::new(cast(shared)))
        });
        entries.push((source, cast));
    }

    /// Views `target` as a `Shared<K>` if its concrete type is assignable
    /// to `K`.
    pub fn cast<K: ?Sized + 'static>(&self, target: &Target) -> Option<Shared<K>> {
        let (_, cast) = self
            .casts
            .get(&TypeId::of::<K>())?
            .iter()
            .find(|(id, _)| *id == target.type_id())?;
        cast(target)?.downcast::<Shared<K>>().ok().map(|boxed| *boxed)
    }

    pub fn is_assignable<K: ?Sized + 'static>(&self, target: &Target) -> bool {
        self.casts
            .get(&TypeId::of::<K>())
            .is_some_and(|entries| entries.iter().any(|(id, _)| *id == target.type_id()))
    }
}

impl fmt::Debug for TypeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeTable")
            .field("declared_types", &self.casts.len())
            .finish()
    }
}

type Handler<R> = Box<dyn Fn(&Target, &TypeTable) -> Option<Vec<R>> + Send + Sync>;

/// Ordered handlers keyed by declared type.
pub struct Dispatcher<R> {
    handlers: Vec<(&'static str, Handler<R>)>,
}

impl<R: 'static> Dispatcher<R> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Appends a handler for targets assignable to `K`.
    pub fn add<K: ?Sized + 'static>(
        &mut self,
        handler: impl Fn(&Shared<K>) -> Vec<R> + Send + Sync + 'static,
    ) {
        let run: Handler<R> = Box::new(move |target: &Target, types: &TypeTable| {
            types.cast::<K>(target).map(|shared| handler(&shared))
        });
        self.handlers.push((std::any::type_name::<K>(), run));
    }

    /// Concatenated results of every matching handler, in registration
    /// order.
    pub fn dispatch(&self, target: &Target, types: &TypeTable) -> Vec<R> {
        let mut results = Vec::new();
        for (declared, run) in &self.handlers {
            if let Some(items) = run(target, types) {
                log::trace!(
                    "{} as {declared}: {} results",
                    target.type_name(),
                    items.len()
                );
                results.extend(items);
            }
        }
        results
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<R: 'static> Default for Dispatcher<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for Dispatcher<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.handlers.iter().map(|(declared, _)| declared))
            .finish()
    }
}
