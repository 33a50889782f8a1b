//! Dynamic views over reflected values.
//!
//! [`Reflect::reflect_ref`](crate::Reflect::reflect_ref) and
//! [`Reflect::reflect_mut`](crate::Reflect::reflect_mut) return one of the
//! enums below, giving access to the kind-specific trait.

// -----------------------------------------------------------------------------
// Modules

mod list_ops;
mod map_ops;
mod optional_ops;
mod scalar_ops;
mod struct_ops;
mod union_ops;

// -----------------------------------------------------------------------------
// Exports

pub use list_ops::List;
pub use map_ops::{Map, MapInsertError, MapKey, MapKeyError};
pub use optional_ops::{Optional, Pointer};
pub use scalar_ops::{Scalar, ScalarError, ScalarValue};
pub use struct_ops::Struct;
pub use union_ops::Union;

use crate::info::ReflectKind;

// -----------------------------------------------------------------------------
// ReflectRef

/// An immutable view of a reflected value, by kind.
pub enum ReflectRef<'a> {
    Scalar(&'a dyn Scalar),
    Struct(&'a dyn Struct),
    List(&'a dyn List),
    Map(&'a dyn Map),
    Optional(&'a dyn Optional),
    Pointer(&'a dyn Pointer),
    Union(&'a dyn Union),
    Raw(&'a serde_json::Value),
}

// -----------------------------------------------------------------------------
// ReflectMut

/// A mutable view of a reflected value, by kind.
pub enum ReflectMut<'a> {
    Scalar(&'a mut dyn Scalar),
    Struct(&'a mut dyn Struct),
    List(&'a mut dyn List),
    Map(&'a mut dyn Map),
    Optional(&'a mut dyn Optional),
    Pointer(&'a mut dyn Pointer),
    Union(&'a mut dyn Union),
    Raw(&'a mut serde_json::Value),
}

macro_rules! impl_kind_fn {
    ($name:ident) => {
        impl $name<'_> {
            /// Returns the [`ReflectKind`] of the viewed value.
            pub fn kind(&self) -> ReflectKind {
                match self {
                    Self::Scalar(_) => ReflectKind::Scalar,
                    Self::Struct(_) => ReflectKind::Struct,
                    Self::List(_) => ReflectKind::List,
                    Self::Map(_) => ReflectKind::Map,
                    Self::Optional(_) => ReflectKind::Optional,
                    Self::Pointer(_) => ReflectKind::Pointer,
                    Self::Union(_) => ReflectKind::Union,
                    Self::Raw(_) => ReflectKind::Raw,
                }
            }
        }
    };
}

impl_kind_fn!(ReflectRef);
impl_kind_fn!(ReflectMut);
