use crate::Reflect;
use crate::info::{CtorFn, ScalarKind, Type, TypeInfo, Typed, default_ctor};
use crate::ops::{Map, MapKey};

/// Info of a string-keyed map such as `HashMap<String, V>`.
///
/// Keys are restricted to scalars; their wire form is always a JSON string.
#[derive(Clone, Debug)]
pub struct MapInfo {
    ty: Type,
    key_kind: ScalarKind,
    value_info: fn() -> &'static TypeInfo,
    ctor: CtorFn,
}

impl MapInfo {
    pub fn new<M: Map + Default, K: MapKey, V: Typed>() -> Self {
        Self {
            ty: Type::of::<M>(),
            key_kind: K::KIND,
            value_info: V::type_info,
            ctor: default_ctor::<M>,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn key_kind(&self) -> ScalarKind {
        self.key_kind
    }

    #[inline]
    pub fn value_info(&self) -> &'static TypeInfo {
        (self.value_info)()
    }

    /// Builds an empty map.
    #[inline]
    pub fn instantiate(&self) -> Box<dyn Reflect> {
        (self.ctor)()
    }
}
