//! Flattened field layout of a struct, shared by the decoder and encoder.

use bk_reflect::Reflect;
use bk_reflect::info::{ScalarKind, StructInfo, TypeInfo};
use bk_reflect::ops::{ReflectMut, ReflectRef};
use bk_utils::hash::HashMap;

use crate::SchemaError;

/// A regular field reachable from the top-level struct.
pub(crate) struct PlannedField<C> {
    /// Field indices through flattened structs, ending at the field itself.
    pub route: Box<[usize]>,
    pub name: &'static str,
    pub required: bool,
    pub codec: C,
}

/// The extras map, carrying the codec of its value type.
pub(crate) struct ExtrasField<C> {
    pub route: Box<[usize]>,
    pub codec: C,
}

pub(crate) struct StructPlan<C> {
    pub fields: Vec<PlannedField<C>>,
    pub by_name: HashMap<&'static str, usize>,
    pub extras: Option<ExtrasField<C>>,
}

impl<C> StructPlan<C> {
    /// Lays out `info`, obtaining the codec of each field type from `codec_of`.
    ///
    /// A field declared directly on a struct shadows a same-named field of a
    /// flattened one.
    pub fn build(
        info: &'static StructInfo,
        codec_of: &mut dyn FnMut(&'static TypeInfo) -> Result<C, SchemaError>,
    ) -> Result<Self, SchemaError> {
        let mut plan = Self {
            fields: Vec::new(),
            by_name: HashMap::default(),
            extras: None,
        };
        plan.collect(info, &mut Vec::new(), codec_of)?;
        Ok(plan)
    }

    fn collect(
        &mut self,
        info: &'static StructInfo,
        prefix: &mut Vec<usize>,
        codec_of: &mut dyn FnMut(&'static TypeInfo) -> Result<C, SchemaError>,
    ) -> Result<(), SchemaError> {
        let mut flattened = Vec::new();

        for (index, field) in info.iter().enumerate() {
            let route = || {
                let mut route = prefix.clone();
                route.push(index);
                route.into_boxed_slice()
            };

            if field.is_flatten() {
                let TypeInfo::Struct(inner) = field.type_info() else {
                    return Err(SchemaError::FlattenNonStruct {
                        ty: info.ty().name(),
                        field: field.ident(),
                    });
                };
                flattened.push((index, inner));
            } else if field.is_extras() {
                if self.extras.is_some() {
                    return Err(SchemaError::DuplicateExtras {
                        ty: info.ty().name(),
                    });
                }
                let value_info = match field.type_info() {
                    TypeInfo::Map(map) if map.key_kind() == ScalarKind::String => map.value_info(),
                    _ => {
                        return Err(SchemaError::InvalidExtras {
                            ty: info.ty().name(),
                            field: field.ident(),
                        });
                    }
                };
                self.extras = Some(ExtrasField {
                    route: route(),
                    codec: codec_of(value_info)?,
                });
            } else if let Some(name) = field.wire_name() {
                if self.by_name.contains_key(name) {
                    continue;
                }
                self.by_name.insert(name, self.fields.len());
                self.fields.push(PlannedField {
                    route: route(),
                    name,
                    required: field.tag().is_some_and(|tag| tag.required()),
                    codec: codec_of(field.type_info())?,
                });
            }
        }

        for (index, inner) in flattened {
            prefix.push(index);
            self.collect(inner, prefix, codec_of)?;
            prefix.pop();
        }
        Ok(())
    }
}

/// Follows `route` through nested structs.
pub(crate) fn field_ref<'a>(mut current: &'a dyn Reflect, route: &[usize]) -> Option<&'a dyn Reflect> {
    for &index in route {
        let ReflectRef::Struct(fields) = current.reflect_ref() else {
            return None;
        };
        current = fields.field_at(index)?;
    }
    Some(current)
}

/// Mutable counterpart of [`field_ref`].
pub(crate) fn field_mut<'a>(mut current: &'a mut dyn Reflect, route: &[usize]) -> Option<&'a mut dyn Reflect> {
    for &index in route {
        let ReflectMut::Struct(fields) = current.reflect_mut() else {
            return None;
        };
        current = fields.field_at_mut(index)?;
    }
    Some(current)
}
