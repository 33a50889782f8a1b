use core::fmt;

use bk_reflect::info::ScalarKind;
use thiserror::Error;

// -----------------------------------------------------------------------------
// FieldPath

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Field(String),
    Index(usize),
}

/// Location of a value inside a JSON document, rendered as `$.data[0].name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    #[inline]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub(crate) fn push_field(&mut self, name: &str) {
        self.segments.push(Segment::Field(name.to_owned()));
    }

    pub(crate) fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            match segment {
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// SchemaError

/// A type definition the codec cannot handle.
///
/// These are programming errors in the reflected types. They are reported
/// every time the affected codec is requested and never cached.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("`{ty}` declares more than one extras field")]
    DuplicateExtras { ty: &'static str },
    #[error("extras field `{field}` of `{ty}` is not a map with string keys")]
    InvalidExtras {
        ty: &'static str,
        field: &'static str,
    },
    #[error("flattened field `{field}` of `{ty}` is not a struct")]
    FlattenNonStruct {
        ty: &'static str,
        field: &'static str,
    },
    #[error("building the codec of `{ty}` did not complete")]
    Incomplete { ty: &'static str },
}

// -----------------------------------------------------------------------------
// DecodeError

/// Failure to decode a JSON document into a reflected value.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    Syntax(#[from] serde_json::Error),
    #[error("{path}: expected {expected}, found {actual}")]
    Mismatch {
        path: FieldPath,
        expected: String,
        actual: String,
    },
    #[error("{path}: {value} is out of range for {expected}")]
    OutOfRange {
        path: FieldPath,
        expected: ScalarKind,
        value: String,
    },
    #[error("{path}: invalid map key {key:?}, expected {expected}")]
    MapKey {
        path: FieldPath,
        key: String,
        expected: ScalarKind,
    },
    #[error("{path}: no variant of `{union}` matches {actual}")]
    NoVariant {
        path: FieldPath,
        union: &'static str,
        actual: String,
    },
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl DecodeError {
    pub(crate) fn mismatch(path: &FieldPath, expected: impl fmt::Display, actual: impl fmt::Display) -> Self {
        Self::Mismatch {
            path: path.clone(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// The location of the offending value, if known.
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            Self::Mismatch { path, .. }
            | Self::OutOfRange { path, .. }
            | Self::MapKey { path, .. }
            | Self::NoVariant { path, .. } => Some(path),
            Self::Syntax(_) | Self::Schema(_) => None,
        }
    }
}

// -----------------------------------------------------------------------------
// EncodeError

/// Failure to encode a reflected value.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum EncodeError {
    #[error("{path}: {value} cannot be represented in JSON")]
    NonFinite { path: FieldPath, value: f64 },
    #[error("{path}: value does not match its type descriptor `{ty}`")]
    Inconsistent { path: FieldPath, ty: &'static str },
    #[error("query parameters must be an object, found {actual}")]
    QueryRoot { actual: &'static str },
    #[error("cannot write JSON: {0}")]
    Write(String),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

// -----------------------------------------------------------------------------
// Error

/// Any error produced by this crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The JSON kind of a value, as used in error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_display() {
        let mut path = FieldPath::root();
        assert_eq!(path.to_string(), "$");

        path.push_field("data");
        path.push_index(3);
        path.push_field("name");
        assert_eq!(path.to_string(), "$.data[3].name");

        path.pop();
        path.pop();
        assert_eq!(path.to_string(), "$.data");
    }

    #[test]
    fn mismatch_message_names_both_types() {
        let mut path = FieldPath::root();
        path.push_field("amount");
        let err = DecodeError::mismatch(&path, ScalarKind::Int { signed: true, bits: 64 }, "object");
        assert_eq!(err.to_string(), "$.amount: expected i64, found object");
        assert_eq!(err.path(), Some(&path));
    }
}
