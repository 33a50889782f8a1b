//! Type-directed decoding.

// -----------------------------------------------------------------------------
// Modules

mod scalar;
mod union;

// -----------------------------------------------------------------------------
// Decoder

use std::sync::Arc;

use bk_reflect::Reflect;
use bk_reflect::info::{ListInfo, MapInfo, OptionalInfo, PointerInfo, StructInfo};
use bk_reflect::info::{TypeInfo, Typed, UnionInfo};
use bk_reflect::ops::{MapInsertError, ReflectMut};
use serde_json::Value;

use crate::cache::{Forward, Pending, TypeCache};
use crate::error::json_kind;
use crate::plan::{StructPlan, field_mut};
use crate::{DecodeError, FieldPath, SchemaError};

// Reported when a value does not match the descriptor it is decoded with.
const OTHER_TYPE: &str = "a value of another type";

type IntoFn = dyn Fn(&Value, &mut dyn Reflect, &mut FieldPath) -> Result<(), DecodeError> + Send + Sync;
type MakeFn = dyn Fn(&Value, &mut FieldPath) -> Result<Box<dyn Reflect>, DecodeError> + Send + Sync;

/// The cached decode functions of one type.
///
/// `into` decodes over an existing value, `make` produces a new one. Types
/// without a default of their own (pointers and unions) only support the
/// latter natively; their `into` replaces the target wholesale.
#[derive(Clone)]
pub(crate) struct Decoder {
    into: Arc<IntoFn>,
    make: Arc<MakeFn>,
}

impl Decoder {
    #[inline]
    pub(crate) fn decode_into(
        &self,
        value: &Value,
        target: &mut dyn Reflect,
        path: &mut FieldPath,
    ) -> Result<(), DecodeError> {
        (self.into)(value, target, path)
    }

    #[inline]
    pub(crate) fn make(&self, value: &Value, path: &mut FieldPath) -> Result<Box<dyn Reflect>, DecodeError> {
        (self.make)(value, path)
    }

    fn new(
        into: impl Fn(&Value, &mut dyn Reflect, &mut FieldPath) -> Result<(), DecodeError> + Send + Sync + 'static,
        make: impl Fn(&Value, &mut FieldPath) -> Result<Box<dyn Reflect>, DecodeError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            into: Arc::new(into),
            make: Arc::new(make),
        }
    }

    /// A decoder for a type with a default value: `make` is `into` over a
    /// freshly instantiated value.
    fn with_default(
        info: &'static TypeInfo,
        into: impl Fn(&Value, &mut dyn Reflect, &mut FieldPath) -> Result<(), DecodeError> + Send + Sync + 'static,
    ) -> Self {
        let into: Arc<IntoFn> = Arc::new(into);
        let make_into = into.clone();
        let make = move |value: &Value, path: &mut FieldPath| {
            let Some(mut target) = info.instantiate() else {
                return Err(DecodeError::mismatch(path, info.type_name(), "a type without a default"));
            };
            make_into(value, &mut *target, path)?;
            Ok(target)
        };
        Self {
            into,
            make: Arc::new(make),
        }
    }
}

impl Forward for Decoder {
    fn forward(pending: Arc<Pending<Self>>) -> Self {
        let make_pending = pending.clone();
        Self::new(
            move |value, target, path| pending.wait()?.decode_into(value, target, path),
            move |value, path| make_pending.wait()?.make(value, path),
        )
    }
}

static DECODERS: TypeCache<Decoder> = TypeCache::new();

/// Returns the cached decoder of `info`, building it on first use.
pub(crate) fn decoder_for(info: &'static TypeInfo) -> Result<Decoder, SchemaError> {
    DECODERS.get_or_build(info, || build(info))
}

fn build(info: &'static TypeInfo) -> Result<Decoder, SchemaError> {
    match info {
        TypeInfo::Scalar(_) => Ok(Decoder::with_default(info, scalar::decode_scalar)),
        TypeInfo::Raw(_) => Ok(Decoder::with_default(info, decode_raw)),
        TypeInfo::Struct(struct_info) => build_struct(info, struct_info),
        TypeInfo::List(list_info) => build_list(info, list_info),
        TypeInfo::Map(map_info) => build_map(info, map_info),
        TypeInfo::Optional(optional_info) => build_optional(info, optional_info),
        TypeInfo::Pointer(pointer_info) => build_pointer(pointer_info),
        TypeInfo::Union(union_info) => build_union(union_info),
    }
}

// -----------------------------------------------------------------------------
// Kinds

fn decode_raw(value: &Value, target: &mut dyn Reflect, path: &mut FieldPath) -> Result<(), DecodeError> {
    match target.reflect_mut() {
        ReflectMut::Raw(raw) => {
            raw.clone_from(value);
            Ok(())
        }
        _ => Err(DecodeError::mismatch(path, "raw JSON", OTHER_TYPE)),
    }
}

fn build_struct(info: &'static TypeInfo, struct_info: &'static StructInfo) -> Result<Decoder, SchemaError> {
    let plan = StructPlan::build(struct_info, &mut |field_info| decoder_for(field_info))?;
    let ty = struct_info.ty().name();

    Ok(Decoder::with_default(info, move |value, target, path| {
        let object = match value {
            Value::Object(object) => object,
            Value::Null => return Ok(()),
            other => return Err(DecodeError::mismatch(path, "object", json_kind(other))),
        };

        for (key, item) in object {
            path.push_field(key);
            if let Some(&index) = plan.by_name.get(key.as_str()) {
                let field = &plan.fields[index];
                let target = field_mut(target, &field.route)
                    .ok_or_else(|| DecodeError::mismatch(path, ty, OTHER_TYPE))?;
                field.codec.decode_into(item, target, path)?;
            } else if let Some(extras) = &plan.extras {
                let boxed = extras.codec.make(item, path)?;
                let Some(ReflectMut::Map(map)) = field_mut(target, &extras.route).map(|t| t.reflect_mut()) else {
                    return Err(DecodeError::mismatch(path, ty, OTHER_TYPE));
                };
                map.insert_boxed(key, boxed)
                    .map_err(|err| map_insert_error(path, key, err))?;
            }
            path.pop();
        }
        Ok(())
    }))
}

fn build_list(info: &'static TypeInfo, list_info: &'static ListInfo) -> Result<Decoder, SchemaError> {
    let item = decoder_for(list_info.item_info())?;
    let item_name = list_info.item_info().type_name();

    Ok(Decoder::with_default(info, move |value, target, path| {
        let ReflectMut::List(list) = target.reflect_mut() else {
            return Err(DecodeError::mismatch(path, info.type_name(), OTHER_TYPE));
        };
        let elements = match value {
            Value::Array(elements) => elements,
            Value::Null => {
                list.clear();
                return Ok(());
            }
            other => return Err(DecodeError::mismatch(path, "array", json_kind(other))),
        };

        list.clear();
        for (index, element) in elements.iter().enumerate() {
            path.push_index(index);
            let boxed = item.make(element, path)?;
            list.push_boxed(boxed)
                .map_err(|_| DecodeError::mismatch(path, item_name, OTHER_TYPE))?;
            path.pop();
        }
        Ok(())
    }))
}

fn build_map(info: &'static TypeInfo, map_info: &'static MapInfo) -> Result<Decoder, SchemaError> {
    let entry = decoder_for(map_info.value_info())?;

    Ok(Decoder::with_default(info, move |value, target, path| {
        let ReflectMut::Map(map) = target.reflect_mut() else {
            return Err(DecodeError::mismatch(path, info.type_name(), OTHER_TYPE));
        };
        let object = match value {
            Value::Object(object) => object,
            Value::Null => {
                map.clear();
                return Ok(());
            }
            other => return Err(DecodeError::mismatch(path, "object", json_kind(other))),
        };

        for (key, item) in object {
            path.push_field(key);
            let boxed = entry.make(item, path)?;
            map.insert_boxed(key, boxed)
                .map_err(|err| map_insert_error(path, key, err))?;
            path.pop();
        }
        Ok(())
    }))
}

fn map_insert_error(path: &FieldPath, key: &str, err: MapInsertError) -> DecodeError {
    match err {
        MapInsertError::Key(err) => DecodeError::MapKey {
            path: path.clone(),
            key: key.to_owned(),
            expected: err.expected,
        },
        MapInsertError::Value(value) => {
            DecodeError::mismatch(path, "map value", value.reflect_type_info().type_name())
        }
        _ => DecodeError::mismatch(path, "map entry", key),
    }
}

fn build_optional(info: &'static TypeInfo, optional_info: &'static OptionalInfo) -> Result<Decoder, SchemaError> {
    let inner = decoder_for(optional_info.inner())?;

    Ok(Decoder::with_default(info, move |value, target, path| {
        let ReflectMut::Optional(optional) = target.reflect_mut() else {
            return Err(DecodeError::mismatch(path, info.type_name(), OTHER_TYPE));
        };
        if value.is_null() {
            optional.clear();
            return Ok(());
        }
        // Decode over a present value so nested fields absent from the input
        // keep their current contents.
        if let Some(current) = optional.value_mut() {
            return inner.decode_into(value, current, path);
        }
        let boxed = inner.make(value, path)?;
        optional
            .set_some(boxed)
            .map_err(|boxed| DecodeError::mismatch(path, optional_info.inner().type_name(), boxed.reflect_type_info().type_name()))
    }))
}

fn build_pointer(pointer_info: &'static PointerInfo) -> Result<Decoder, SchemaError> {
    let pointee = decoder_for(pointer_info.pointee())?;
    let make_pointee = pointee.clone();

    Ok(Decoder::new(
        move |value, target, path| {
            let ReflectMut::Pointer(pointer) = target.reflect_mut() else {
                return Err(DecodeError::mismatch(path, pointer_info.ty().name(), OTHER_TYPE));
            };
            pointee.decode_into(value, pointer.pointee_mut(), path)
        },
        move |value, path| {
            let boxed = make_pointee.make(value, path)?;
            pointer_info.wrap(boxed).map_err(|boxed| {
                DecodeError::mismatch(path, pointer_info.pointee().type_name(), boxed.reflect_type_info().type_name())
            })
        },
    ))
}

fn build_union(union_info: &'static UnionInfo) -> Result<Decoder, SchemaError> {
    let table = Arc::new(union::VariantTable::build(union_info)?);
    let make_table = table.clone();

    Ok(Decoder::new(
        move |value, target, path| {
            if value.is_null() {
                return Ok(());
            }
            let boxed = table.make(value, path)?;
            target.set(boxed).map_err(|boxed| {
                DecodeError::mismatch(path, union_info.ty().name(), boxed.reflect_type_info().type_name())
            })
        },
        move |value, path| make_table.make(value, path),
    ))
}

// -----------------------------------------------------------------------------
// Entry points

/// Decodes a JSON document over an existing value.
///
/// Keys absent from the document leave the corresponding fields untouched.
///
/// ```
/// use bk_reflect::derive::Reflect;
///
/// #[derive(Reflect, Default)]
/// struct Limits {
///     #[json("daily")]
///     daily: u32,
///     #[json("monthly")]
///     monthly: u32,
/// }
///
/// let mut limits = Limits { daily: 100, monthly: 1000 };
/// bk_json::decode_into(br#"{"daily":250}"#, &mut limits).unwrap();
/// assert_eq!((limits.daily, limits.monthly), (250, 1000));
/// ```
pub fn decode_into<T: Reflect + Typed>(bytes: &[u8], target: &mut T) -> Result<(), DecodeError> {
    let value: Value = serde_json::from_slice(bytes)?;
    decode_value_into(&value, target)
}

/// Decodes a parsed JSON tree over an existing value.
pub fn decode_value_into<T: Reflect + Typed>(value: &Value, target: &mut T) -> Result<(), DecodeError> {
    let decoder = decoder_for(T::type_info())?;
    decoder.decode_into(value, target.as_reflect_mut(), &mut FieldPath::root())
}

/// Decodes a JSON document into a new value.
pub fn from_slice<T: Reflect + Typed>(bytes: &[u8]) -> Result<T, DecodeError> {
    let value: Value = serde_json::from_slice(bytes)?;
    from_value(&value)
}

/// Decodes a parsed JSON tree into a new value.
pub fn from_value<T: Reflect + Typed>(value: &Value) -> Result<T, DecodeError> {
    let decoder = decoder_for(T::type_info())?;
    let path = &mut FieldPath::root();
    let boxed = decoder.make(value, path)?;
    boxed
        .take::<T>()
        .map_err(|boxed| DecodeError::mismatch(path, T::type_info().type_name(), boxed.reflect_type_info().type_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    #[test]
    fn lists_take_the_input_length() {
        let mut values = vec![9_u8; 5];
        decode_into(b"[1,\"2\",true]", &mut values).unwrap();
        assert_eq!(values, [1, 2, 1]);

        decode_into(b"null", &mut values).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn list_errors_carry_the_index() {
        let err = from_slice::<Vec<i32>>(b"[1,{}]").unwrap_err();
        assert_eq!(err.to_string(), "$[1]: expected i32, found object");
    }

    #[test]
    fn maps_parse_keys() {
        let map: BTreeMap<u16, String> = from_slice(br#"{"1":"a","20":"b"}"#).unwrap();
        assert_eq!(map, BTreeMap::from([(1, "a".into()), (20, "b".into())]));

        let err = from_slice::<HashMap<u8, bool>>(br#"{"300":true}"#).unwrap_err();
        let DecodeError::MapKey { key, expected, .. } = err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(key, "300");
        assert_eq!(expected.to_string(), "u8");
    }

    #[test]
    fn optional_null_and_absent() {
        let mut value = Some(3_i64);
        decode_into(b"null", &mut value).unwrap();
        assert_eq!(value, None);

        let value: Option<Box<String>> = from_slice(b"\"boxed\"").unwrap();
        assert_eq!(value.as_deref().map(String::as_str), Some("boxed"));
    }

    #[test]
    fn raw_values_pass_through() {
        let value: Value = from_slice(br#"{"nested":[1,null]}"#).unwrap();
        assert_eq!(value, serde_json::json!({"nested": [1, null]}));
    }

    #[test]
    fn malformed_input() {
        let err = from_slice::<u8>(b"{").unwrap_err();
        assert!(matches!(err, DecodeError::Syntax(_)));
        assert_eq!(err.path(), None);
    }
}
