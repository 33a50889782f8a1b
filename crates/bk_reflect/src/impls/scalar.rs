use crate::Reflect;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{ScalarInfo, ScalarKind, TypeInfo, Typed};
use crate::ops::{Scalar, ScalarError, ScalarValue};
use crate::reflection::impl_reflect_cast_fn;

macro_rules! impl_scalar_typed {
    ($ty:ty, $kind:expr) => {
        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::Scalar(ScalarInfo::new::<$ty>($kind)))
            }
        }

        impl Reflect for $ty {
            impl_reflect_cast_fn!(Scalar);
        }
    };
}

// -----------------------------------------------------------------------------
// Integers

macro_rules! impl_reflect_int {
    ($($ty:ident => $signed:literal, $variant:ident($wide:ty);)*) => {$(
        impl_scalar_typed!($ty, ScalarKind::Int { signed: $signed, bits: $ty::BITS as u8 });

        impl Scalar for $ty {
            #[inline]
            fn scalar_kind(&self) -> ScalarKind {
                ScalarKind::Int { signed: $signed, bits: $ty::BITS as u8 }
            }

            #[inline]
            fn get(&self) -> ScalarValue<'_> {
                ScalarValue::$variant(*self as $wide)
            }

            fn assign(&mut self, value: ScalarValue<'_>) -> Result<(), ScalarError> {
                let narrowed = match value {
                    ScalarValue::I64(v) => <$ty>::try_from(v).ok(),
                    ScalarValue::U64(v) => <$ty>::try_from(v).ok(),
                    other => {
                        return Err(ScalarError::Mismatch {
                            expected: self.scalar_kind(),
                            actual: other.kind_name(),
                        });
                    }
                };
                *self = narrowed.ok_or_else(|| ScalarError::OutOfRange {
                    expected: self.scalar_kind(),
                    value: value.to_string(),
                })?;
                Ok(())
            }
        }
    )*};
}

impl_reflect_int! {
    i8 => true, I64(i64);
    i16 => true, I64(i64);
    i32 => true, I64(i64);
    i64 => true, I64(i64);
    u8 => false, U64(u64);
    u16 => false, U64(u64);
    u32 => false, U64(u64);
    u64 => false, U64(u64);
}

// -----------------------------------------------------------------------------
// Floats

macro_rules! impl_reflect_float {
    ($($ty:ident),*) => {$(
        impl_scalar_typed!($ty, ScalarKind::Float);

        impl Scalar for $ty {
            #[inline]
            fn scalar_kind(&self) -> ScalarKind {
                ScalarKind::Float
            }

            #[inline]
            fn get(&self) -> ScalarValue<'_> {
                ScalarValue::F64(*self as f64)
            }

            fn assign(&mut self, value: ScalarValue<'_>) -> Result<(), ScalarError> {
                *self = match value {
                    ScalarValue::F64(v) => v as $ty,
                    ScalarValue::I64(v) => v as $ty,
                    ScalarValue::U64(v) => v as $ty,
                    other => {
                        return Err(ScalarError::Mismatch {
                            expected: ScalarKind::Float,
                            actual: other.kind_name(),
                        });
                    }
                };
                Ok(())
            }
        }
    )*};
}

impl_reflect_float!(f32, f64);

// -----------------------------------------------------------------------------
// bool

impl_scalar_typed!(bool, ScalarKind::Bool);

impl Scalar for bool {
    #[inline]
    fn scalar_kind(&self) -> ScalarKind {
        ScalarKind::Bool
    }

    #[inline]
    fn get(&self) -> ScalarValue<'_> {
        ScalarValue::Bool(*self)
    }

    fn assign(&mut self, value: ScalarValue<'_>) -> Result<(), ScalarError> {
        match value {
            ScalarValue::Bool(v) => {
                *self = v;
                Ok(())
            }
            other => Err(ScalarError::Mismatch {
                expected: ScalarKind::Bool,
                actual: other.kind_name(),
            }),
        }
    }
}

// -----------------------------------------------------------------------------
// String

impl_scalar_typed!(String, ScalarKind::String);

impl Scalar for String {
    #[inline]
    fn scalar_kind(&self) -> ScalarKind {
        ScalarKind::String
    }

    #[inline]
    fn get(&self) -> ScalarValue<'_> {
        ScalarValue::Str(self)
    }

    fn assign(&mut self, value: ScalarValue<'_>) -> Result<(), ScalarError> {
        match value {
            ScalarValue::Str(v) => {
                self.clear();
                self.push_str(v);
                Ok(())
            }
            other => Err(ScalarError::Mismatch {
                expected: ScalarKind::String,
                actual: other.kind_name(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::DynamicTyped;

    #[test]
    fn int_assign_checks_range() {
        let mut x = 0_i8;
        x.assign(ScalarValue::I64(-128)).unwrap();
        assert_eq!(x, -128);
        assert_eq!(
            x.assign(ScalarValue::U64(128)),
            Err(ScalarError::OutOfRange {
                expected: ScalarKind::Int { signed: true, bits: 8 },
                value: "128".to_string(),
            })
        );
        assert_eq!(x, -128);
    }

    #[test]
    fn unsigned_rejects_negative() {
        let mut x = 5_u32;
        assert!(x.assign(ScalarValue::I64(-1)).is_err());
        assert_eq!(x.get(), ScalarValue::U64(5));
    }

    #[test]
    fn float_accepts_integers() {
        let mut x = 0.0_f32;
        x.assign(ScalarValue::I64(3)).unwrap();
        assert_eq!(x, 3.0);
        assert!(x.assign(ScalarValue::Bool(true)).is_err());
    }

    #[test]
    fn string_and_bool_are_strict() {
        let mut s = String::new();
        s.assign(ScalarValue::Str("acct_1")).unwrap();
        assert_eq!(s, "acct_1");
        assert!(s.assign(ScalarValue::I64(1)).is_err());

        let mut b = false;
        assert!(b.assign(ScalarValue::Str("true")).is_err());
        b.assign(ScalarValue::Bool(true)).unwrap();
        assert!(b);
    }

    #[test]
    fn type_info_is_shared() {
        let a = <u16 as Typed>::type_info();
        let b = 7_u16.as_reflect().reflect_type_info();
        assert!(core::ptr::eq(a, b));
        assert_eq!(
            a.as_scalar().unwrap().kind(),
            ScalarKind::Int { signed: false, bits: 16 }
        );
    }
}
