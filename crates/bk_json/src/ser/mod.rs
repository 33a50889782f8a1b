//! Type-directed encoding.
//!
//! Objects are assembled in a `BTreeMap`, so keys are always emitted in
//! lexicographic order regardless of declaration order.

use std::collections::BTreeMap;
use std::sync::Arc;

use bk_reflect::Reflect;
use bk_reflect::info::{ListInfo, MapInfo, OptionalInfo, PointerInfo, StructInfo};
use bk_reflect::info::{TypeInfo, Typed, UnionInfo};
use bk_reflect::ops::{ReflectRef, ScalarValue};
use serde_json::{Map, Number, Value};

use crate::cache::{Forward, Pending, TypeCache};
use crate::plan::{StructPlan, field_ref};
use crate::{EncodeError, FieldPath, SchemaError};

type EncodeFn = dyn Fn(&dyn Reflect, &mut FieldPath) -> Result<Option<Value>, EncodeError> + Send + Sync;

/// The cached encode function of one type.
///
/// `Ok(None)` means the value is absent: an empty optional.
#[derive(Clone)]
pub(crate) struct Encoder(Arc<EncodeFn>);

impl Encoder {
    fn new(
        encode: impl Fn(&dyn Reflect, &mut FieldPath) -> Result<Option<Value>, EncodeError> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(encode))
    }

    #[inline]
    pub(crate) fn encode(&self, value: &dyn Reflect, path: &mut FieldPath) -> Result<Option<Value>, EncodeError> {
        (self.0)(value, path)
    }
}

impl Forward for Encoder {
    fn forward(pending: Arc<Pending<Self>>) -> Self {
        Self::new(move |value, path| pending.wait()?.encode(value, path))
    }
}

static ENCODERS: TypeCache<Encoder> = TypeCache::new();

/// Returns the cached encoder of `info`, building it on first use.
pub(crate) fn encoder_for(info: &'static TypeInfo) -> Result<Encoder, SchemaError> {
    ENCODERS.get_or_build(info, || build(info))
}

fn build(info: &'static TypeInfo) -> Result<Encoder, SchemaError> {
    let ty = info.type_name();
    match info {
        TypeInfo::Scalar(_) => Ok(Encoder::new(move |value, path| match value.reflect_ref() {
            ReflectRef::Scalar(scalar) => encode_scalar(scalar.get(), path).map(Some),
            _ => Err(inconsistent(path, ty)),
        })),
        TypeInfo::Raw(_) => Ok(Encoder::new(move |value, path| match value.reflect_ref() {
            ReflectRef::Raw(raw) => Ok(Some(raw.clone())),
            _ => Err(inconsistent(path, ty)),
        })),
        TypeInfo::Struct(struct_info) => build_struct(struct_info),
        TypeInfo::List(list_info) => build_list(list_info),
        TypeInfo::Map(map_info) => build_map(map_info),
        TypeInfo::Optional(optional_info) => build_optional(optional_info),
        TypeInfo::Pointer(pointer_info) => build_pointer(pointer_info),
        TypeInfo::Union(union_info) => build_union(union_info),
    }
}

fn inconsistent(path: &FieldPath, ty: &'static str) -> EncodeError {
    EncodeError::Inconsistent {
        path: path.clone(),
        ty,
    }
}

// -----------------------------------------------------------------------------
// Kinds

fn encode_scalar(value: ScalarValue<'_>, path: &FieldPath) -> Result<Value, EncodeError> {
    Ok(match value {
        ScalarValue::Bool(v) => Value::Bool(v),
        ScalarValue::I64(v) => Value::Number(v.into()),
        ScalarValue::U64(v) => Value::Number(v.into()),
        ScalarValue::F64(v) => Value::Number(Number::from_f64(v).ok_or_else(|| EncodeError::NonFinite {
            path: path.clone(),
            value: v,
        })?),
        ScalarValue::Str(v) => Value::String(v.to_owned()),
    })
}

fn build_struct(struct_info: &'static StructInfo) -> Result<Encoder, SchemaError> {
    let plan = StructPlan::build(struct_info, &mut |field_info| encoder_for(field_info))?;
    let ty = struct_info.ty().name();

    Ok(Encoder::new(move |value, path| {
        let mut object = BTreeMap::new();

        for field in &plan.fields {
            let inner = field_ref(value, &field.route).ok_or_else(|| inconsistent(path, ty))?;
            path.push_field(field.name);
            let encoded = field.codec.encode(inner, path)?;
            path.pop();

            match encoded {
                Some(encoded) => {
                    object.insert(field.name.to_owned(), encoded);
                }
                None if field.required => {
                    object.insert(field.name.to_owned(), Value::Null);
                }
                None => {}
            }
        }

        // Extras go last and win over a declared field of the same name.
        if let Some(extras) = &plan.extras {
            let Some(ReflectRef::Map(map)) = field_ref(value, &extras.route).map(|v| v.reflect_ref()) else {
                return Err(inconsistent(path, ty));
            };
            for (key, item) in map.entries() {
                path.push_field(&key);
                let encoded = extras.codec.encode(item, path)?;
                path.pop();
                object.insert(key, encoded.unwrap_or(Value::Null));
            }
        }

        Ok(Some(Value::Object(object.into_iter().collect::<Map<_, _>>())))
    }))
}

fn build_list(list_info: &'static ListInfo) -> Result<Encoder, SchemaError> {
    let item = encoder_for(list_info.item_info())?;
    let ty = list_info.ty().name();

    Ok(Encoder::new(move |value, path| {
        let ReflectRef::List(list) = value.reflect_ref() else {
            return Err(inconsistent(path, ty));
        };
        let mut elements = Vec::with_capacity(list.len());
        for (index, element) in list.iter().enumerate() {
            path.push_index(index);
            // Absent elements keep their slot as `null`.
            elements.push(item.encode(element, path)?.unwrap_or(Value::Null));
            path.pop();
        }
        Ok(Some(Value::Array(elements)))
    }))
}

fn build_map(map_info: &'static MapInfo) -> Result<Encoder, SchemaError> {
    let entry = encoder_for(map_info.value_info())?;
    let ty = map_info.ty().name();

    Ok(Encoder::new(move |value, path| {
        let ReflectRef::Map(map) = value.reflect_ref() else {
            return Err(inconsistent(path, ty));
        };
        let mut object = BTreeMap::new();
        for (key, item) in map.entries() {
            path.push_field(&key);
            let encoded = entry.encode(item, path)?;
            path.pop();
            object.insert(key, encoded.unwrap_or(Value::Null));
        }
        Ok(Some(Value::Object(object.into_iter().collect::<Map<_, _>>())))
    }))
}

fn build_optional(optional_info: &'static OptionalInfo) -> Result<Encoder, SchemaError> {
    let inner = encoder_for(optional_info.inner())?;
    let ty = optional_info.ty().name();

    Ok(Encoder::new(move |value, path| match value.reflect_ref() {
        ReflectRef::Optional(optional) => match optional.value() {
            Some(present) => inner.encode(present, path),
            None => Ok(None),
        },
        _ => Err(inconsistent(path, ty)),
    }))
}

fn build_pointer(pointer_info: &'static PointerInfo) -> Result<Encoder, SchemaError> {
    let pointee = encoder_for(pointer_info.pointee())?;
    let ty = pointer_info.ty().name();

    Ok(Encoder::new(move |value, path| match value.reflect_ref() {
        ReflectRef::Pointer(pointer) => pointee.encode(pointer.pointee(), path),
        _ => Err(inconsistent(path, ty)),
    }))
}

fn build_union(union_info: &'static UnionInfo) -> Result<Encoder, SchemaError> {
    let variants = union_info
        .iter()
        .map(|variant| encoder_for(variant.type_info()))
        .collect::<Result<Box<[_]>, _>>()?;
    let ty = union_info.ty().name();

    Ok(Encoder::new(move |value, path| {
        let ReflectRef::Union(union) = value.reflect_ref() else {
            return Err(inconsistent(path, ty));
        };
        let encoder = variants
            .get(union.variant_index())
            .ok_or_else(|| inconsistent(path, ty))?;
        encoder.encode(union.variant_value(), path)
    }))
}

// -----------------------------------------------------------------------------
// Entry points

/// Encodes a value into a JSON tree. An absent value encodes as `null`.
pub fn to_value<T: Reflect + Typed>(value: &T) -> Result<Value, EncodeError> {
    let encoder = encoder_for(T::type_info())?;
    let encoded = encoder.encode(value.as_reflect(), &mut FieldPath::root())?;
    Ok(encoded.unwrap_or(Value::Null))
}

/// Encodes a value into compact JSON bytes with sorted object keys.
///
/// ```
/// use bk_reflect::derive::Reflect;
///
/// #[derive(Reflect, Default)]
/// struct Transfer {
///     #[json("amount")]
///     amount: i64,
///     #[json("account_id")]
///     account_id: String,
///     #[json("memo")]
///     memo: Option<String>,
/// }
///
/// let transfer = Transfer { amount: 500, account_id: "acc_1".into(), memo: None };
/// let bytes = bk_json::to_vec(&transfer).unwrap();
/// assert_eq!(bytes, br#"{"account_id":"acc_1","amount":500}"#);
/// ```
pub fn to_vec<T: Reflect + Typed>(value: &T) -> Result<Vec<u8>, EncodeError> {
    let value = to_value(value)?;
    serde_json::to_vec(&value).map_err(|err| EncodeError::Write(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn list_keeps_absent_slots() {
        let values = vec![Some(1_u8), None, Some(3)];
        assert_eq!(to_vec(&values).unwrap(), b"[1,null,3]");
    }

    #[test]
    fn map_keys_are_sorted_strings() {
        let map = HashMap::from([(10_u32, true), (2, false), (1, true)]);
        assert_eq!(to_vec(&map).unwrap(), br#"{"1":true,"10":true,"2":false}"#);
    }

    #[test]
    fn absent_top_level_is_null() {
        assert_eq!(to_value(&None::<String>).unwrap(), Value::Null);
        assert_eq!(to_vec(&Box::new(7_i8)).unwrap(), b"7");
    }

    #[test]
    fn non_finite_floats_fail() {
        let err = to_vec(&vec![1.0, f64::NAN]).unwrap_err();
        assert_eq!(err.to_string(), "$[1]: NaN cannot be represented in JSON");
    }

    #[test]
    fn bytes_are_the_written_tree() {
        let map = HashMap::from([("b".to_string(), vec![Some(2.5)]), ("a".to_string(), vec![None])]);
        let tree = to_value(&map).unwrap();
        assert_eq!(to_vec(&map).unwrap(), serde_json::to_vec(&tree).unwrap());
        assert_eq!(
            EncodeError::Write("key must be a string".into()).to_string(),
            "cannot write JSON: key must be a string"
        );
    }
}
