use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// Typed

/// A static accessor to compile-time type information.
///
/// Implemented by [`#[derive(Reflect)]`](crate::derive::Reflect) and by the
/// built-in impls in [`crate::impls`].
///
/// ```
/// use bk_reflect::info::{Typed, ReflectKind};
///
/// assert_eq!(<Vec<String> as Typed>::type_info().kind(), ReflectKind::List);
/// ```
///
/// Manual impls store the info in a [`NonGenericTypeInfoCell`] or, for
/// generic types, a [`GenericTypeInfoCell`].
///
/// [`NonGenericTypeInfoCell`]: crate::impls::NonGenericTypeInfoCell
/// [`GenericTypeInfoCell`]: crate::impls::GenericTypeInfoCell
pub trait Typed: 'static {
    fn type_info() -> &'static TypeInfo;
}

// -----------------------------------------------------------------------------
// DynamicTyped

/// Object-safe access to [`Typed::type_info`].
///
/// Auto impl for all types that implemented [`Typed`].
pub trait DynamicTyped {
    fn reflect_type_info(&self) -> &'static TypeInfo;
}

impl<T: Typed> DynamicTyped for T {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        Self::type_info()
    }
}
