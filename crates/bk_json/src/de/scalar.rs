//! Lenient scalar coercion.
//!
//! | JSON \ target | string        | bool              | integer            | float        |
//! |---------------|---------------|-------------------|--------------------|--------------|
//! | string        | as is         | `"true"`/`"false"`| parsed             | parsed       |
//! | number        | decimal text  | rejected          | integral, in range | as is        |
//! | bool          | `"true"`/...  | as is             | `1` / `0`          | `1.0`/`0.0`  |
//! | null          | unchanged     | unchanged         | unchanged          | unchanged    |
//!
//! Arrays and objects are rejected by every scalar target.

use bk_reflect::Reflect;
use bk_reflect::info::ScalarKind;
use bk_reflect::ops::{ReflectMut, ScalarError, ScalarValue};
use serde_json::{Number, Value};

use crate::error::json_kind;
use crate::{DecodeError, FieldPath};

pub(super) fn decode_scalar(value: &Value, target: &mut dyn Reflect, path: &mut FieldPath) -> Result<(), DecodeError> {
    let ReflectMut::Scalar(scalar) = target.reflect_mut() else {
        return Err(DecodeError::mismatch(path, "scalar", super::OTHER_TYPE));
    };
    let kind = scalar.scalar_kind();

    let text;
    let source = match (kind, value) {
        (_, Value::Null) => return Ok(()),
        (_, Value::Array(_) | Value::Object(_)) => {
            return Err(DecodeError::mismatch(path, kind, json_kind(value)));
        }

        (ScalarKind::String, Value::String(s)) => ScalarValue::Str(s),
        (ScalarKind::String, Value::Number(n)) => {
            text = n.to_string();
            ScalarValue::Str(&text)
        }
        (ScalarKind::String, Value::Bool(b)) => ScalarValue::Str(if *b { "true" } else { "false" }),

        (ScalarKind::Bool, Value::Bool(b)) => ScalarValue::Bool(*b),
        (ScalarKind::Bool, Value::String(s)) => match s.as_str() {
            "true" => ScalarValue::Bool(true),
            "false" => ScalarValue::Bool(false),
            _ => return Err(DecodeError::mismatch(path, kind, format_args!("string {s:?}"))),
        },
        (ScalarKind::Bool, Value::Number(_)) => {
            return Err(DecodeError::mismatch(path, kind, "number"));
        }

        (ScalarKind::Int { .. }, Value::Number(n)) => integral(n, kind, path)?,
        (ScalarKind::Int { .. }, Value::String(s)) => {
            let literal = s.trim();
            if let Ok(v) = literal.parse::<i64>() {
                ScalarValue::I64(v)
            } else if let Ok(v) = literal.parse::<u64>() {
                ScalarValue::U64(v)
            } else {
                return Err(DecodeError::mismatch(path, kind, format_args!("string {s:?}")));
            }
        }
        (ScalarKind::Int { .. }, Value::Bool(b)) => ScalarValue::I64(i64::from(*b)),

        (ScalarKind::Float, Value::Number(n)) => match n.as_f64() {
            Some(v) => ScalarValue::F64(v),
            None => return Err(DecodeError::mismatch(path, kind, format_args!("number {n}"))),
        },
        (ScalarKind::Float, Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => ScalarValue::F64(v),
            _ => return Err(DecodeError::mismatch(path, kind, format_args!("string {s:?}"))),
        },
        (ScalarKind::Float, Value::Bool(b)) => ScalarValue::F64(if *b { 1.0 } else { 0.0 }),
    };

    scalar.assign(source).map_err(|err| match err {
        ScalarError::Mismatch { expected, actual } => DecodeError::mismatch(path, expected, actual),
        ScalarError::OutOfRange { expected, value } => DecodeError::OutOfRange {
            path: path.clone(),
            expected,
            value,
        },
        other => DecodeError::mismatch(path, kind, other),
    })
}

/// A JSON number as an integer, accepting floats without a fractional part.
fn integral(n: &Number, kind: ScalarKind, path: &FieldPath) -> Result<ScalarValue<'static>, DecodeError> {
    if let Some(v) = n.as_i64() {
        return Ok(ScalarValue::I64(v));
    }
    if let Some(v) = n.as_u64() {
        return Ok(ScalarValue::U64(v));
    }

    let out_of_range = || DecodeError::OutOfRange {
        path: path.clone(),
        expected: kind,
        value: n.to_string(),
    };
    let v = n.as_f64().ok_or_else(out_of_range)?;
    if v.fract() != 0.0 {
        return Err(DecodeError::mismatch(path, kind, format_args!("number {n}")));
    }
    // Integral floats beyond 2^63 cannot fit any supported integer.
    if v >= -9_223_372_036_854_775_808.0 && v < 9_223_372_036_854_775_808.0 {
        Ok(ScalarValue::I64(v as i64))
    } else if v >= 0.0 && v < 18_446_744_073_709_551_616.0 {
        Ok(ScalarValue::U64(v as u64))
    } else {
        Err(out_of_range())
    }
}
