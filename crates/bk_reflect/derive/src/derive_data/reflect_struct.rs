use syn::{Ident, Type};

use crate::derive_data::{FieldAttributes, ReflectMeta};

/// A field the codec sees, in declaration order.
pub(crate) struct StructField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub attrs: FieldAttributes,
}

/// A struct with named fields.
pub(crate) struct ReflectStruct<'a> {
    pub meta: ReflectMeta<'a>,
    pub fields: Vec<StructField<'a>>,
}

impl<'a> ReflectStruct<'a> {
    pub fn new(meta: ReflectMeta<'a>, fields: &'a syn::FieldsNamed) -> syn::Result<Self> {
        let mut active = Vec::new();
        for field in &fields.named {
            let attrs = FieldAttributes::parse(&field.attrs)?;
            if !attrs.is_active() {
                continue;
            }
            let Some(ident) = field.ident.as_ref() else {
                continue;
            };
            active.push(StructField {
                ident,
                ty: &field.ty,
                attrs,
            });
        }
        Ok(Self {
            meta,
            fields: active,
        })
    }
}
