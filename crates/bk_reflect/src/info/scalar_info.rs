use core::fmt;

use crate::Reflect;
use crate::info::{CtorFn, Type, default_ctor};

// -----------------------------------------------------------------------------
// ScalarKind

/// The primitive a scalar type stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int { signed: bool, bits: u8 },
    Float,
    String,
}

impl ScalarKind {
    /// Returns `true` for signed and unsigned integers.
    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Int { .. })
    }

    /// Returns `true` for integers and floats.
    #[inline]
    pub const fn is_number(self) -> bool {
        matches!(self, Self::Int { .. } | Self::Float)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.pad("bool"),
            Self::Int { signed: true, bits } => write!(f, "i{bits}"),
            Self::Int { signed: false, bits } => write!(f, "u{bits}"),
            Self::Float => f.pad("float"),
            Self::String => f.pad("string"),
        }
    }
}

// -----------------------------------------------------------------------------
// ScalarInfo

/// Info of a scalar type such as `u32` or `String`.
#[derive(Debug, Clone)]
pub struct ScalarInfo {
    ty: Type,
    kind: ScalarKind,
    ctor: CtorFn,
}

impl ScalarInfo {
    pub fn new<T: Reflect + Default>(kind: ScalarKind) -> Self {
        Self {
            ty: Type::of::<T>(),
            kind,
            ctor: default_ctor::<T>,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// Builds the zero value.
    #[inline]
    pub fn instantiate(&self) -> Box<dyn Reflect> {
        (self.ctor)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names() {
        assert_eq!(ScalarKind::Int { signed: true, bits: 64 }.to_string(), "i64");
        assert_eq!(ScalarKind::Int { signed: false, bits: 8 }.to_string(), "u8");
        assert_eq!(ScalarKind::String.to_string(), "string");
        assert!(ScalarKind::Float.is_number());
        assert!(!ScalarKind::Float.is_integer());
    }
}
