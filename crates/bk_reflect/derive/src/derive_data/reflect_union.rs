use syn::spanned::Spanned;
use syn::{Fields, Ident, Type};

use crate::derive_data::{ReflectMeta, TypeAttributes, VariantAttributes};

/// One variant: a single-field tuple variant.
pub(crate) struct UnionVariant<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub attrs: VariantAttributes,
}

/// An enum derived as a union.
pub(crate) struct ReflectUnion<'a> {
    pub meta: ReflectMeta<'a>,
    pub attrs: TypeAttributes,
    pub variants: Vec<UnionVariant<'a>>,
}

impl<'a> ReflectUnion<'a> {
    pub fn new(
        meta: ReflectMeta<'a>,
        attrs: TypeAttributes,
        data: &'a syn::DataEnum,
    ) -> syn::Result<Self> {
        let mut variants = Vec::with_capacity(data.variants.len());

        for variant in &data.variants {
            let Fields::Unnamed(fields) = &variant.fields else {
                return Err(syn::Error::new(
                    variant.span(),
                    "union variants must hold exactly one unnamed field, like `Text(String)`",
                ));
            };
            let mut iter = fields.unnamed.iter();
            let (Some(field), None) = (iter.next(), iter.next()) else {
                return Err(syn::Error::new(
                    fields.span(),
                    "union variants must hold exactly one unnamed field",
                ));
            };

            variants.push(UnionVariant {
                ident: &variant.ident,
                ty: &field.ty,
                attrs: VariantAttributes::parse(&variant.attrs)?,
            });
        }

        if variants.is_empty() {
            return Err(syn::Error::new(
                meta.ident().span(),
                "a union needs at least one variant",
            ));
        }

        Ok(Self {
            meta,
            attrs,
            variants,
        })
    }
}
