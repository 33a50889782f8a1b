use serde_json::Value;

use crate::Reflect;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{RawInfo, TypeInfo, Typed};
use crate::reflection::impl_reflect_cast_fn;

impl Typed for Value {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Raw(RawInfo::new::<Value>()))
    }
}

impl Reflect for Value {
    impl_reflect_cast_fn!(Raw);
}
