use core::any::TypeId;

use crate::Reflect;
use crate::info::{CtorFn, Type, TypeInfo, Typed, default_ctor};
use crate::ops::List;

/// Info of a growable sequence such as `Vec<T>`.
#[derive(Clone, Debug)]
pub struct ListInfo {
    ty: Type,
    item_ty_id: TypeId,
    item_info: fn() -> &'static TypeInfo,
    ctor: CtorFn,
}

impl ListInfo {
    pub fn new<L: List + Default, T: Typed>() -> Self {
        Self {
            ty: Type::of::<L>(),
            item_ty_id: TypeId::of::<T>(),
            item_info: T::type_info,
            ctor: default_ctor::<L>,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn item_ty_id(&self) -> TypeId {
        self.item_ty_id
    }

    #[inline]
    pub fn item_info(&self) -> &'static TypeInfo {
        (self.item_info)()
    }

    /// Builds an empty list.
    #[inline]
    pub fn instantiate(&self) -> Box<dyn Reflect> {
        (self.ctor)()
    }
}
