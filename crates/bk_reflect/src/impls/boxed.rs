use crate::Reflect;
use crate::impls::GenericTypeInfoCell;
use crate::info::{PointerInfo, TypeInfo, Typed};
use crate::ops::Pointer;
use crate::reflection::impl_reflect_cast_fn;

fn wrap_box<T: Reflect + Typed>(pointee: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
    let pointee: Box<T> = pointee.downcast::<T>()?;
    Ok(Box::new(pointee))
}

impl<T: Reflect + Typed> Typed for Box<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Pointer(PointerInfo::new::<Self, T>(wrap_box::<T>)))
    }
}

impl<T: Reflect + Typed> Reflect for Box<T> {
    impl_reflect_cast_fn!(Pointer);
}

impl<T: Reflect + Typed> Pointer for Box<T> {
    #[inline]
    fn pointee(&self) -> &dyn Reflect {
        &**self
    }

    #[inline]
    fn pointee_mut(&mut self) -> &mut dyn Reflect {
        &mut **self
    }
}
