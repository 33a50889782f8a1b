use bk_utils::hash::HashMap;

use crate::Reflect;
use crate::info::{CtorFn, NamedField, Type, default_ctor};
use crate::ops::Struct;

/// A container for compile-time named struct info.
///
/// Fields keep declaration order, which is also the index order used by
/// [`Struct::field_at`].
///
/// ```rust
/// use bk_reflect::{derive::Reflect, info::Typed};
///
/// #[derive(Reflect, Default)]
/// struct Transfer {
///     #[json("amount")]
///     amount: i64,
///     #[json(",extras")]
///     extras: std::collections::BTreeMap<String, serde_json::Value>,
/// }
///
/// let info = Transfer::type_info().as_struct().unwrap();
///
/// assert_eq!(info.field_len(), 2);
/// assert_eq!(info.field("amount").map(|(index, _)| index), Some(0));
/// assert!(info.field_at(1).unwrap().is_extras());
/// ```
#[derive(Clone, Debug)]
pub struct StructInfo {
    ty: Type,
    fields: Box<[NamedField]>,
    // wire name -> index, regular tagged fields only
    by_wire_name: HashMap<&'static str, usize>,
    ctor: CtorFn,
}

impl StructInfo {
    /// Create a new [`StructInfo`].
    ///
    /// When two fields share a wire name the first one wins.
    pub fn new<T: Struct + Default>(fields: &[NamedField]) -> Self {
        let mut by_wire_name = HashMap::default();
        for (index, field) in fields.iter().enumerate() {
            if let Some(name) = field.wire_name() {
                by_wire_name.entry(name).or_insert(index);
            }
        }

        Self {
            ty: Type::of::<T>(),
            fields: fields.into(),
            by_wire_name,
            ctor: default_ctor::<T>,
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// Returns the index and [`NamedField`] for the given wire `name`.
    ///
    /// Flattened fields are not searched.
    pub fn field(&self, name: &str) -> Option<(usize, &NamedField)> {
        let index = *self.by_wire_name.get(name)?;
        Some((index, &self.fields[index]))
    }

    /// Returns the [`NamedField`] at the given index, if present.
    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&NamedField> {
        self.fields.get(index)
    }

    /// Returns an iterator over the fields in declaration order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &NamedField> {
        self.fields.iter()
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }

    /// Builds a value with every field at its default.
    #[inline]
    pub fn instantiate(&self) -> Box<dyn Reflect> {
        (self.ctor)()
    }
}
