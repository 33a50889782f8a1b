#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod cache;
mod de;
mod error;
mod plan;
mod ser;

pub mod query;

// -----------------------------------------------------------------------------
// Exports

pub use de::{decode_into, decode_value_into, from_slice, from_value};
pub use error::{DecodeError, EncodeError, Error, FieldPath, Result, SchemaError};
pub use ser::{to_value, to_vec};

/// Builds and caches the codecs of `T` ahead of first use.
///
/// Reports a misconfigured type definition without decoding anything.
pub fn prepare<T: bk_reflect::Reflect + bk_reflect::info::Typed>() -> Result<(), SchemaError> {
    de::decoder_for(T::type_info())?;
    ser::encoder_for(T::type_info())?;
    Ok(())
}
