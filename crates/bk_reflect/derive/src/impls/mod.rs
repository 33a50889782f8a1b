//! Code generation, one module per derived kind.

mod common;
mod struct_kind;
mod union_kind;

pub(crate) use struct_kind::impl_struct;
pub(crate) use union_kind::impl_union;

use common::{impl_trait_reflect, impl_trait_typed};
