//! Reflection for std types, and the cells used to store [`TypeInfo`].
//!
//! [`TypeInfo`]: crate::info::TypeInfo

// -----------------------------------------------------------------------------
// Modules

mod boxed;
mod cell;
mod json;
mod map;
mod option;
mod scalar;
mod vec;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, NonGenericTypeInfoCell};
