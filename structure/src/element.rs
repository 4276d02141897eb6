//! Membership of element types in list item types.

use structedit_core::Shared;

use crate::Editable;

/// Declares that `Self` can occupy a list whose items are `L`.
///
/// Plain lists store `Shared<E>` directly and are covered by the blanket
/// implementation. Lists holding several element types use an enum item
/// with one variant per type and one implementation per variant:
///
/// ```ignore
/// enum PhoneNumber {
///     Landline(Shared<LandlineNumber>),
///     Mobile(Shared<MobileNumber>),
/// }
///
/// impl ElementOf<PhoneNumber> for MobileNumber {
///     fn wrap(element: Shared<Self>) -> PhoneNumber {
///         PhoneNumber::Mobile(element)
///     }
///
///     fn unwrap(item: &PhoneNumber) -> Option<Shared<Self>> {
///         match item {
///             PhoneNumber::Mobile(m) => Some(m.clone()),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait ElementOf<L>: Editable + Sized {
    fn wrap(element: Shared<Self>) -> L;

    /// The element held by `item`, if `item` holds a `Self`.
    fn unwrap(item: &L) -> Option<Shared<Self>>;

    /// Whether `item` holds exactly `element` (by identity).
    fn holds(item: &L, element: &Shared<Self>) -> bool {
        Self::unwrap(item).is_some_and(|e| e.ptr_eq(element))
    }
}

impl<T: Editable> ElementOf<Shared<T>> for T {
    fn wrap(element: Shared<Self>) -> Shared<T> {
        element
    }

    fn unwrap(item: &Shared<T>) -> Option<Shared<Self>> {
        Some(item.clone())
    }
}
