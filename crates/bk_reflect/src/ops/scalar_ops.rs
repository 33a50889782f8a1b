use core::fmt;

use thiserror::Error;

use crate::Reflect;
use crate::info::ScalarKind;

// -----------------------------------------------------------------------------
// ScalarValue

/// A borrowed primitive value.
///
/// Integers are widened to `i64` or `u64`; callers narrowing them back go
/// through [`Scalar::assign`], which checks the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue<'a> {
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    Str(&'a str),
}

impl ScalarValue<'_> {
    /// A short name of the value's kind, used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::I64(_) | Self::U64(_) => "integer",
            Self::F64(_) => "float",
            Self::Str(_) => "string",
        }
    }
}

impl fmt::Display for ScalarValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => fmt::Display::fmt(v, f),
            Self::I64(v) => fmt::Display::fmt(v, f),
            Self::U64(v) => fmt::Display::fmt(v, f),
            Self::F64(v) => fmt::Display::fmt(v, f),
            Self::Str(v) => f.write_str(v),
        }
    }
}

/// Error returned by [`Scalar::assign`].
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ScalarError {
    #[error("cannot assign {actual} to {expected}")]
    Mismatch {
        expected: ScalarKind,
        actual: &'static str,
    },
    #[error("{value} is out of range for {expected}")]
    OutOfRange { expected: ScalarKind, value: String },
}

// -----------------------------------------------------------------------------
// Scalar

/// A reflected primitive.
///
/// `assign` only converts within a category: integers accept any integer
/// in range, floats accept any number, `bool` and `String` accept
/// themselves. Looser coercions belong to the codec.
///
/// ```
/// use bk_reflect::ops::{Scalar, ScalarValue};
///
/// let mut x = 0_u8;
/// x.assign(ScalarValue::I64(200)).unwrap();
/// assert_eq!(x, 200);
/// assert!(x.assign(ScalarValue::I64(300)).is_err());
/// assert!(x.assign(ScalarValue::Str("1")).is_err());
/// ```
pub trait Scalar: Reflect {
    fn scalar_kind(&self) -> ScalarKind;

    fn get(&self) -> ScalarValue<'_>;

    fn assign(&mut self, value: ScalarValue<'_>) -> Result<(), ScalarError>;
}
