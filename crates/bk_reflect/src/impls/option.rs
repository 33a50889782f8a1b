use crate::Reflect;
use crate::impls::GenericTypeInfoCell;
use crate::info::{OptionalInfo, TypeInfo, Typed};
use crate::ops::Optional;
use crate::reflection::impl_reflect_cast_fn;

impl<T: Reflect + Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::Optional(OptionalInfo::new::<Self, T>()))
    }
}

impl<T: Reflect + Typed> Reflect for Option<T> {
    impl_reflect_cast_fn!(Optional);
}

impl<T: Reflect + Typed> Optional for Option<T> {
    #[inline]
    fn value(&self) -> Option<&dyn Reflect> {
        Option::as_ref(self).map(|v| v as &dyn Reflect)
    }

    #[inline]
    fn value_mut(&mut self) -> Option<&mut dyn Reflect> {
        Option::as_mut(self).map(|v| v as &mut dyn Reflect)
    }

    fn set_some(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = Some(value.take::<T>()?);
        Ok(())
    }

    #[inline]
    fn clear(&mut self) {
        *self = None;
    }
}

#[cfg(test)]
mod tests {
    use crate::Reflect;
    use crate::info::{ReflectKind, Typed};
    use crate::ops::{Optional, ReflectMut};

    #[test]
    fn set_some_and_clear() {
        let mut value: Option<u64> = None;
        let ReflectMut::Optional(optional) = value.reflect_mut() else {
            panic!("expected an optional");
        };
        optional.set_some(Box::new(9_u64)).unwrap();
        assert!(optional.set_some(Box::new(9_u32)).is_err());
        assert_eq!(optional.value().and_then(|v| v.downcast_ref::<u64>()), Some(&9));
        optional.clear();
        assert!(value.is_none());
    }

    #[test]
    fn inner_info() {
        let info = <Option<String> as Typed>::type_info().as_optional().unwrap();
        assert_eq!(info.inner().kind(), ReflectKind::Scalar);
        assert!(info.instantiate().downcast_ref::<Option<String>>().unwrap().is_none());
    }
}
