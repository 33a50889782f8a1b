#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// The derive macro emits `::bk_reflect::...` paths, which must also resolve
// inside this crate's own tests.
extern crate self as bk_reflect;

// -----------------------------------------------------------------------------
// Modules

mod reflection;

pub mod impls;
pub mod info;
pub mod ops;
pub mod tag;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use bk_reflect_derive as derive;
pub use reflection::Reflect;
