//! Query-string marshaling of list-filter structs.
//!
//! Parameters are encoded with the same field tags as JSON bodies, then
//! flattened into `key=value` pairs:
//!
//! - nested objects use bracket notation, `created_at[after]=...`;
//! - arrays of scalars repeat the key, arrays of objects are indexed;
//! - absent values and `null` are omitted.
//!
//! Pairs are sorted by key, values of a repeated key keep their order.

use bk_reflect::Reflect;
use bk_reflect::info::Typed;
use serde_json::Value;

use crate::EncodeError;
use crate::error::json_kind;

/// Encodes `params` into sorted query pairs.
///
/// ```
/// use bk_reflect::derive::Reflect;
///
/// #[derive(Reflect, Default)]
/// struct CreatedAt {
///     #[json("after")]
///     after: Option<String>,
/// }
///
/// #[derive(Reflect, Default)]
/// struct ListParams {
///     #[json("limit")]
///     limit: Option<u32>,
///     #[json("status")]
///     status: Vec<String>,
///     #[json("created_at")]
///     created_at: Option<CreatedAt>,
///     #[json("cursor")]
///     cursor: Option<String>,
/// }
///
/// let params = ListParams {
///     limit: Some(10),
///     status: vec!["open".into(), "closed".into()],
///     created_at: Some(CreatedAt { after: Some("2024-01-01".into()) }),
///     cursor: None,
/// };
/// let pairs = bk_json::query::to_pairs(&params).unwrap();
/// assert_eq!(
///     pairs,
///     [
///         ("created_at[after]".to_string(), "2024-01-01".to_string()),
///         ("limit".to_string(), "10".to_string()),
///         ("status".to_string(), "open".to_string()),
///         ("status".to_string(), "closed".to_string()),
///     ]
/// );
/// ```
pub fn to_pairs<T: Reflect + Typed>(params: &T) -> Result<Vec<(String, String)>, EncodeError> {
    let object = match crate::to_value(params)? {
        Value::Object(object) => object,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(EncodeError::QueryRoot {
                actual: json_kind(&other),
            });
        }
    };

    let mut pairs = Vec::new();
    for (key, value) in &object {
        flatten(key.clone(), value, &mut pairs);
    }
    pairs.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(pairs)
}

fn flatten(key: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(v) => pairs.push((key, v.to_string())),
        Value::Number(v) => pairs.push((key, v.to_string())),
        Value::String(v) => pairs.push((key, v.clone())),
        Value::Array(elements) => {
            for (index, element) in elements.iter().enumerate() {
                if matches!(element, Value::Array(_) | Value::Object(_)) {
                    flatten(format!("{key}[{index}]"), element, pairs);
                } else {
                    flatten(key.clone(), element, pairs);
                }
            }
        }
        Value::Object(object) => {
            for (name, nested) in object {
                flatten(format!("{key}[{name}]"), nested, pairs);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn nested_arrays_are_indexed() {
        let mut pairs = Vec::new();
        flatten("f".into(), &json!([{"a": 1}, {"a": null, "b": [true]}]), &mut pairs);
        assert_eq!(
            pairs,
            [
                ("f[0][a]".to_string(), "1".to_string()),
                ("f[1][b]".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn non_object_root() {
        let err = to_pairs(&5_u8).unwrap_err();
        assert_eq!(err, EncodeError::QueryRoot { actual: "number" });
        assert!(to_pairs(&None::<BTreeMap<String, u8>>).unwrap().is_empty());
    }
}
