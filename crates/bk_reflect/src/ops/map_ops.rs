use core::hash::Hash;

use thiserror::Error;

use crate::Reflect;
use crate::info::{ScalarKind, Typed};

// -----------------------------------------------------------------------------
// MapKey

/// A scalar usable as a map key.
///
/// Keys travel as strings: [`MapKey::to_key`] renders one, and
/// [`MapKey::parse_key`] reads it back.
pub trait MapKey: Typed + Ord + Hash + Send + Sync + Sized {
    const KIND: ScalarKind;

    fn to_key(&self) -> String;

    fn parse_key(key: &str) -> Result<Self, MapKeyError>;
}

/// A map key string that does not parse as the key type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid map key {key:?}: expected {expected}")]
pub struct MapKeyError {
    pub key: String,
    pub expected: ScalarKind,
}

impl MapKey for String {
    const KIND: ScalarKind = ScalarKind::String;

    #[inline]
    fn to_key(&self) -> String {
        self.clone()
    }

    #[inline]
    fn parse_key(key: &str) -> Result<Self, MapKeyError> {
        Ok(key.to_owned())
    }
}

impl MapKey for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn to_key(&self) -> String {
        self.to_string()
    }

    fn parse_key(key: &str) -> Result<Self, MapKeyError> {
        key.parse().map_err(|_| MapKeyError {
            key: key.to_owned(),
            expected: Self::KIND,
        })
    }
}

macro_rules! impl_int_map_key {
    ($($ty:ident => $signed:literal),* $(,)?) => {$(
        impl MapKey for $ty {
            const KIND: ScalarKind = ScalarKind::Int {
                signed: $signed,
                bits: $ty::BITS as u8,
            };

            fn to_key(&self) -> String {
                self.to_string()
            }

            fn parse_key(key: &str) -> Result<Self, MapKeyError> {
                key.trim().parse().map_err(|_| MapKeyError {
                    key: key.to_owned(),
                    expected: Self::KIND,
                })
            }
        }
    )*};
}

impl_int_map_key! {
    i8 => true, i16 => true, i32 => true, i64 => true,
    u8 => false, u16 => false, u32 => false, u64 => false,
}

// -----------------------------------------------------------------------------
// Map

/// Error returned by [`Map::insert_boxed`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MapInsertError {
    #[error(transparent)]
    Key(#[from] MapKeyError),
    #[error("map value is not of the expected type")]
    Value(Box<dyn Reflect>),
}

/// A reflected map with scalar keys.
///
/// ```
/// use std::collections::BTreeMap;
/// use bk_reflect::ops::Map;
///
/// let mut map = BTreeMap::<u32, String>::new();
/// map.insert_boxed("7", Box::new("seven".to_string())).unwrap();
/// assert!(map.insert_boxed("x", Box::new("?".to_string())).is_err());
///
/// let entries = map.entries();
/// assert_eq!(entries[0].0, "7");
/// ```
pub trait Map: Reflect {
    fn len(&self) -> usize;

    /// Every entry with its key rendered as a string, in map order.
    fn entries(&self) -> Vec<(String, &dyn Reflect)>;

    /// Parses `key` and inserts the value, replacing an existing entry.
    fn insert_boxed(&mut self, key: &str, value: Box<dyn Reflect>) -> Result<(), MapInsertError>;

    fn clear(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_keys_are_range_checked() {
        assert_eq!(u8::parse_key("255"), Ok(255));
        let err = u8::parse_key("256").unwrap_err();
        assert_eq!(err.expected, ScalarKind::Int { signed: false, bits: 8 });
        assert_eq!(err.to_string(), "invalid map key \"256\": expected u8");
    }

    #[test]
    fn bool_keys() {
        assert_eq!(bool::parse_key("true"), Ok(true));
        assert!(bool::parse_key("yes").is_err());
        assert_eq!(false.to_key(), "false");
    }
}
