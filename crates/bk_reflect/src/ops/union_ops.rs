use crate::Reflect;

/// A reflected union: one active variant holding one value.
///
/// The index refers to [`UnionInfo`](crate::info::UnionInfo) order.
pub trait Union: Reflect {
    fn variant_index(&self) -> usize;

    fn variant_value(&self) -> &dyn Reflect;

    fn variant_value_mut(&mut self) -> &mut dyn Reflect;
}
