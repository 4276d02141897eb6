//! Shared, lock-protected handles into an object graph.
//!
//! Every editable value in a structure lives behind a [`Shared`] handle.
//! Cloning a handle shares the allocation, so two handles can be compared
//! by *identity* ([`Shared::ptr_eq`]) as well as by *value* (`==`).
//!
//! [`Target`] is the type-erased form of a handle. Tree nodes carry a
//! `Target` so that reselection after a rebuild can be decided purely by
//! identity, without knowing the concrete type.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A reference-counted, lock-protected handle to a value in the graph.
///
/// `T` may be unsized: a `Shared<dyn Trait>` obtained through [`upcast!`]
/// refers to the same allocation as the concrete handle it came from.
///
/// [`upcast!`]: crate::upcast
pub struct Shared<T: ?Sized> {
    cell: Arc<RwLock<T>>,
}

impl<T> Shared<T> {
    /// Wraps `value` in a fresh allocation.
    pub fn new(value: T) -> Self {
        Self {
            cell: Arc::new(RwLock::new(value)),
        }
    }

    /// Replaces the contents, returning the previous value. Identity is kept.
    pub fn replace(&self, value: T) -> T {
        std::mem::replace(&mut *self.cell.write(), value)
    }
}

impl<T: Send + Sync + 'static> Shared<T> {
    /// Type-erased handle to the same allocation.
    pub fn target(&self) -> Target {
        Target {
            cell: self.cell.clone(),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }
}

impl<T: ?Sized> Shared<T> {
    /// Builds a handle from an existing allocation.
    ///
    /// Combined with unsized coercion this turns `Arc<RwLock<Concrete>>`
    /// into a `Shared<dyn Trait>`.
    pub fn from_arc(cell: Arc<RwLock<T>>) -> Self {
        Self { cell }
    }

    pub fn into_arc(self) -> Arc<RwLock<T>> {
        self.cell
    }

    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.cell.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.cell.write()
    }

    /// Returns `true` if both handles refer to the same allocation.
    pub fn ptr_eq<U: ?Sized>(&self, other: &Shared<U>) -> bool {
        self.addr() == other.addr()
    }

    /// Returns `true` if `target` refers to this allocation.
    pub fn is_target(&self, target: &Target) -> bool {
        self.addr() == target.addr()
    }

    fn addr(&self) -> usize {
        Arc::as_ptr(&self.cell) as *const () as usize
    }
}

impl<T: ?Sized> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: ?Sized + PartialEq> PartialEq for Shared<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.read() == *other.read()
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.read(), f)
    }
}

impl<T: ?Sized + Serialize> Serialize for Shared<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.read().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Shared<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Shared::new)
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Converts a `Shared<Concrete>` into a `Shared<dyn Trait>` over the same
/// allocation.
///
/// ```
/// use structedit_core::{Shared, upcast};
///
/// trait Named {
///     fn name(&self) -> &str;
/// }
///
/// struct Group {
///     name: String,
/// }
///
/// impl Named for Group {
///     fn name(&self) -> &str {
///         &self.name
///     }
/// }
///
/// let group = Shared::new(Group { name: "Family".into() });
/// let named = upcast!(group.clone() => dyn Named);
/// assert!(named.ptr_eq(&group));
/// assert_eq!(named.read().name(), "Family");
/// ```
#[macro_export]
macro_rules! upcast {
    ($shared:expr => $ty:ty) => {{
        let cell = $crate::Shared::into_arc($shared);
        $crate::Shared::<$ty>::from_arc(cell)
    }};
}

/// A type-erased [`Shared`] handle.
///
/// Equality and hashing are by identity: two targets are equal iff they
/// refer to the same allocation, whatever the values inside.
#[derive(Clone)]
pub struct Target {
    cell: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl Target {
    /// The concrete type of the referenced value.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Recovers the typed handle, or `None` if `T` is not the concrete type.
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Shared<T>> {
        self.cell
            .clone()
            .downcast::<RwLock<T>>()
            .ok()
            .map(Shared::from_arc)
    }

    fn addr(&self) -> usize {
        Arc::as_ptr(&self.cell) as *const () as usize
    }
}

impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for Target {}

impl Hash for Target {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("type", &self.type_name)
            .field("addr", &format_args!("{:#x}", self.addr()))
            .finish()
    }
}

impl<T: Send + Sync + 'static> From<&Shared<T>> for Target {
    fn from(shared: &Shared<T>) -> Self {
        shared.target()
    }
}
