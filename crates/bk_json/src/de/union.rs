use bk_reflect::Reflect;
use bk_reflect::info::{ScalarKind, TypeInfo, UnionInfo, UnionVariant};
use serde_json::Value;

use super::{Decoder, decoder_for};
use crate::error::json_kind;
use crate::{DecodeError, FieldPath, SchemaError};

/// The JSON values a variant accepts.
#[derive(Debug, Clone)]
enum Accepts {
    Any,
    String,
    Bool,
    Integer,
    Number,
    Array,
    /// An object, optionally with the discriminator field set to the value.
    Object(Option<&'static str>),
    /// Whatever the variants of a nested union accept, under its own
    /// discriminator.
    Nested {
        discriminator: Option<&'static str>,
        variants: Box<[Accepts]>,
    },
}

impl Accepts {
    /// Resolves what `variant` of `owner` accepts.
    ///
    /// Nested unions are expanded once. A union reached again through its
    /// own variants accepts nothing more than it already does.
    fn of(variant: &'static UnionVariant, owner: &'static UnionInfo) -> Self {
        Self::resolve(variant, &mut vec![owner])
    }

    fn resolve(variant: &'static UnionVariant, visited: &mut Vec<&'static UnionInfo>) -> Self {
        match variant.type_info().innermost() {
            TypeInfo::Raw(_) => Self::Any,
            TypeInfo::Scalar(info) => match info.kind() {
                ScalarKind::String => Self::String,
                ScalarKind::Bool => Self::Bool,
                ScalarKind::Int { .. } => Self::Integer,
                ScalarKind::Float => Self::Number,
            },
            TypeInfo::List(_) => Self::Array,
            TypeInfo::Struct(_) | TypeInfo::Map(_) => Self::Object(variant.discriminant()),
            TypeInfo::Union(info) => {
                if visited.iter().any(|seen| core::ptr::eq(*seen, info)) {
                    return Self::Nested {
                        discriminator: None,
                        variants: Box::new([]),
                    };
                }
                visited.push(info);
                let variants = info.iter().map(|nested| Self::resolve(nested, visited)).collect();
                visited.pop();
                Self::Nested {
                    discriminator: info.discriminator(),
                    variants,
                }
            }
            // `innermost` unwraps these.
            TypeInfo::Optional(_) | TypeInfo::Pointer(_) => Self::Any,
        }
    }

    fn matches(&self, value: &Value, discriminator: Option<&str>) -> bool {
        match (self, value) {
            (_, Value::Null) => false,
            (Self::Any, _) => true,
            (Self::String, Value::String(_)) => true,
            (Self::Bool, Value::Bool(_)) => true,
            (Self::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (Self::Number, Value::Number(_)) => true,
            (Self::Array, Value::Array(_)) => true,
            (Self::Object(expected), Value::Object(object)) => match (discriminator, expected) {
                (Some(field), Some(expected)) => {
                    object.get(field).and_then(Value::as_str) == Some(*expected)
                }
                _ => true,
            },
            (Self::Nested { discriminator, variants }, _) => variants
                .iter()
                .any(|accepts| accepts.matches(value, *discriminator)),
            _ => false,
        }
    }
}

struct Candidate {
    accepts: Accepts,
    decoder: Decoder,
    variant: &'static UnionVariant,
}

/// The ordered variant table of a union; the first matching variant wins.
pub(super) struct VariantTable {
    info: &'static UnionInfo,
    candidates: Box<[Candidate]>,
}

impl VariantTable {
    pub(super) fn build(info: &'static UnionInfo) -> Result<Self, SchemaError> {
        let candidates = info
            .iter()
            .map(|variant| {
                Ok(Candidate {
                    accepts: Accepts::of(variant, info),
                    decoder: decoder_for(variant.type_info())?,
                    variant,
                })
            })
            .collect::<Result<_, SchemaError>>()?;
        Ok(Self { info, candidates })
    }

    pub(super) fn make(&self, value: &Value, path: &mut FieldPath) -> Result<Box<dyn Reflect>, DecodeError> {
        let discriminator = self.info.discriminator();
        let Some(candidate) = self
            .candidates
            .iter()
            .find(|candidate| candidate.accepts.matches(value, discriminator))
        else {
            return Err(DecodeError::NoVariant {
                path: path.clone(),
                union: self.info.ty().name(),
                actual: describe(value, discriminator),
            });
        };

        let inner = candidate.decoder.make(value, path)?;
        candidate.variant.wrap(inner).map_err(|inner| {
            DecodeError::mismatch(path, candidate.variant.name(), inner.reflect_type_info().type_name())
        })
    }
}

fn describe(value: &Value, discriminator: Option<&str>) -> String {
    let kind = json_kind(value);
    match (value, discriminator) {
        (Value::Object(object), Some(field)) => match object.get(field) {
            Some(tag) => format!("{kind} with {field} = {tag}"),
            None => format!("{kind} without {field}"),
        },
        _ => kind.to_owned(),
    }
}
