use core::any::TypeId;
use core::fmt;

use thiserror::Error;

use crate::Reflect;
use crate::info::{CtorFn, ListInfo, MapInfo, OptionalInfo, PointerInfo};
use crate::info::{ScalarInfo, StructInfo, Type, UnionInfo};

// -----------------------------------------------------------------------------
// ReflectKind

/// The "kind" of a reflected type, one per [`TypeInfo`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    Scalar,
    Struct,
    List,
    Map,
    Optional,
    Pointer,
    Union,
    Raw,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.pad("Scalar"),
            Self::Struct => f.pad("Struct"),
            Self::List => f.pad("List"),
            Self::Map => f.pad("Map"),
            Self::Optional => f.pad("Optional"),
            Self::Pointer => f.pad("Pointer"),
            Self::Union => f.pad("Union"),
            Self::Raw => f.pad("Raw"),
        }
    }
}

/// Error returned when a `TypeInfo` value is not the expected `ReflectKind`.
#[derive(Debug, Error, Clone, Copy)]
#[error("reflect kind mismatch: expected {expected}, received {received}")]
pub struct ReflectKindError {
    pub expected: ReflectKind,
    pub received: ReflectKind,
}

// -----------------------------------------------------------------------------
// RawInfo

/// Info of a raw JSON value, kept as-is by the codec.
#[derive(Debug, Clone)]
pub struct RawInfo {
    ty: Type,
    ctor: CtorFn,
}

impl RawInfo {
    pub fn new<T: Reflect + Default>() -> Self {
        Self {
            ty: Type::of::<T>(),
            ctor: crate::info::default_ctor::<T>,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Compile-time type information of a reflected type.
///
/// Obtained through [`Typed::type_info`] when the type is known, or
/// [`DynamicTyped::reflect_type_info`] from a `dyn Reflect`.
///
/// [`Typed::type_info`]: crate::info::Typed::type_info
/// [`DynamicTyped::reflect_type_info`]: crate::info::DynamicTyped::reflect_type_info
#[derive(Debug, Clone)]
pub enum TypeInfo {
    Scalar(ScalarInfo),
    Struct(StructInfo),
    List(ListInfo),
    Map(MapInfo),
    Optional(OptionalInfo),
    Pointer(PointerInfo),
    Union(UnionInfo),
    Raw(RawInfo),
}

// Helper macro that implements type-safe accessor methods like `as_struct`.
macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $info:ident) => {
        /// Convert [`TypeInfo`] to specific type information.
        pub const fn $name(&self) -> Result<&$info, ReflectKindError> {
            match self {
                Self::$kind(info) => Ok(info),
                _ => Err(ReflectKindError {
                    expected: ReflectKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

impl TypeInfo {
    impl_cast_method!(as_scalar: Scalar => ScalarInfo);
    impl_cast_method!(as_struct: Struct => StructInfo);
    impl_cast_method!(as_list: List => ListInfo);
    impl_cast_method!(as_map: Map => MapInfo);
    impl_cast_method!(as_optional: Optional => OptionalInfo);
    impl_cast_method!(as_pointer: Pointer => PointerInfo);
    impl_cast_method!(as_union: Union => UnionInfo);

    /// Returns the underlying [`Type`] metadata for this `TypeInfo`.
    pub const fn ty(&self) -> &Type {
        match self {
            Self::Scalar(info) => info.ty(),
            Self::Struct(info) => info.ty(),
            Self::List(info) => info.ty(),
            Self::Map(info) => info.ty(),
            Self::Optional(info) => info.ty(),
            Self::Pointer(info) => info.ty(),
            Self::Union(info) => info.ty(),
            Self::Raw(info) => info.ty(),
        }
    }

    /// Returns the [`ReflectKind`].
    pub const fn kind(&self) -> ReflectKind {
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

    #[inline]
    pub fn ty_id(&self) -> TypeId {
        self.ty().id()
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ty().name()
    }

    /// Check if the given type matches this one.
    #[inline]
    pub fn type_is<T: ?Sized + 'static>(&self) -> bool {
        self.ty().is::<T>()
    }

    /// Builds a fresh default value.
    ///
    /// Returns `None` for pointers and unions, which have no value of
    /// their own without a pointee or a variant.
    pub fn instantiate(&self) -> Option<Box<dyn Reflect>> {
        match self {
            Self::Scalar(info) => Some(info.instantiate()),
            Self::Struct(info) => Some(info.instantiate()),
            Self::List(info) => Some(info.instantiate()),
            Self::Map(info) => Some(info.instantiate()),
            Self::Optional(info) => Some(info.instantiate()),
            Self::Raw(info) => Some((info.ctor)()),
            Self::Pointer(_) | Self::Union(_) => None,
        }
    }

    /// Follows optional and pointer wrappers down to the wrapped type.
    ///
    /// ```
    /// use bk_reflect::info::{ReflectKind, Typed};
    ///
    /// let info = <Option<Box<Vec<u8>>> as Typed>::type_info();
    /// assert_eq!(info.innermost().kind(), ReflectKind::List);
    /// ```
    pub fn innermost(&'static self) -> &'static TypeInfo {
        let mut current = self;
        loop {
            current = match current {
                Self::Optional(info) => info.inner(),
                Self::Pointer(info) => info.pointee(),
                _ => return current,
            };
        }
    }
}
