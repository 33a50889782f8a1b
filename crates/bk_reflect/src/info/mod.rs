//! Static type descriptors.
//!
//! Each reflected type owns one [`TypeInfo`], created on first access and
//! kept for the process lifetime. Nested types are referenced through
//! `fn() -> &'static TypeInfo` pointers, so a type may contain itself.

// -----------------------------------------------------------------------------
// Modules

mod field_info;
mod list_info;
mod map_info;
mod optional_info;
mod scalar_info;
mod struct_info;
mod ty;
mod type_info;
mod typed;
mod union_info;

// -----------------------------------------------------------------------------
// Exports

pub use field_info::NamedField;
pub use list_info::ListInfo;
pub use map_info::MapInfo;
pub use optional_info::{OptionalInfo, PointerInfo};
pub use scalar_info::{ScalarInfo, ScalarKind};
pub use struct_info::StructInfo;
pub use ty::Type;
pub use type_info::{RawInfo, ReflectKind, ReflectKindError, TypeInfo};
pub use typed::{DynamicTyped, Typed};
pub use union_info::{UnionInfo, UnionVariant, WrapFn};

/// Builds a fresh boxed value of a reflected type.
pub type CtorFn = fn() -> Box<dyn crate::Reflect>;

/// The [`CtorFn`] of a `Default` type.
pub fn default_ctor<T: crate::Reflect + Default>() -> Box<dyn crate::Reflect> {
    Box::new(T::default())
}
