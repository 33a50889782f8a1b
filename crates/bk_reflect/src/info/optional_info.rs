use crate::Reflect;
use crate::info::{CtorFn, Type, TypeInfo, Typed, WrapFn};
use crate::ops::{Optional, Pointer};

// -----------------------------------------------------------------------------
// OptionalInfo

/// Info of an `Option<T>`.
#[derive(Clone, Debug)]
pub struct OptionalInfo {
    ty: Type,
    inner: fn() -> &'static TypeInfo,
    ctor: CtorFn,
}

impl OptionalInfo {
    pub fn new<O: Optional + Default, T: Typed>() -> Self {
        Self {
            ty: Type::of::<O>(),
            inner: T::type_info,
            ctor: crate::info::default_ctor::<O>,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn inner(&self) -> &'static TypeInfo {
        (self.inner)()
    }

    /// Builds an empty optional.
    #[inline]
    pub fn instantiate(&self) -> Box<dyn Reflect> {
        (self.ctor)()
    }
}

// -----------------------------------------------------------------------------
// PointerInfo

/// Info of an owning pointer such as `Box<T>`.
///
/// A pointer has no default of its own; it is built by boxing a pointee
/// through [`PointerInfo::wrap`].
#[derive(Clone, Debug)]
pub struct PointerInfo {
    ty: Type,
    pointee: fn() -> &'static TypeInfo,
    wrap: WrapFn,
}

impl PointerInfo {
    pub fn new<P: Pointer, T: Typed>(wrap: WrapFn) -> Self {
        Self {
            ty: Type::of::<P>(),
            pointee: T::type_info,
            wrap,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub fn pointee(&self) -> &'static TypeInfo {
        (self.pointee)()
    }

    /// Moves a boxed pointee into a new pointer value.
    ///
    /// Gives the value back if it is not of the pointee type.
    #[inline]
    pub fn wrap(&self, pointee: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.wrap)(pointee)
    }
}
