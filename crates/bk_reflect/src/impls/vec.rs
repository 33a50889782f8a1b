use crate::Reflect;
use crate::impls::GenericTypeInfoCell;
use crate::info::{ListInfo, TypeInfo, Typed};
use crate::ops::List;
use crate::reflection::impl_reflect_cast_fn;

impl<T: Reflect + Typed> Typed for Vec<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::List(ListInfo::new::<Self, T>()))
    }
}

impl<T: Reflect + Typed> Reflect for Vec<T> {
    impl_reflect_cast_fn!(List);
}

// Inherent methods are called by path: `self.len()` would pick `List::len`.
impl<T: Reflect + Typed> List for Vec<T> {
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(|v| v as &dyn Reflect)
    }

    fn push_boxed(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        Vec::push(self, value.take::<T>()?);
        Ok(())
    }

    #[inline]
    fn clear(&mut self) {
        Vec::clear(self);
    }
}
