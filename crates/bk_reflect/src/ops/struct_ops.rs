use crate::Reflect;

/// A reflected struct with named fields.
///
/// Indices follow [`StructInfo`](crate::info::StructInfo) declaration order.
pub trait Struct: Reflect {
    fn field_at(&self, index: usize) -> Option<&dyn Reflect>;

    fn field_at_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    fn field_len(&self) -> usize;
}
