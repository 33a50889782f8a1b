use syn::{Data, DeriveInput, Fields};

use crate::derive_data::{ReflectMeta, ReflectStruct, ReflectUnion, TypeAttributes};

/// The parsed input of `#[derive(Reflect)]`.
pub(crate) enum ReflectDerive<'a> {
    Struct(ReflectStruct<'a>),
    Union(ReflectUnion<'a>),
}

impl<'a> ReflectDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse(&input.attrs)?;
        let meta = ReflectMeta::new(&input.ident, &input.generics);

        match &input.data {
            Data::Struct(data) => {
                let Fields::Named(fields) = &data.fields else {
                    return Err(syn::Error::new(
                        input.ident.span(),
                        "`Reflect` can only be derived for structs with named fields",
                    ));
                };
                if let Some(discriminator) = attrs.discriminator {
                    return Err(syn::Error::new(
                        discriminator.span(),
                        "`discriminator` only applies to enums",
                    ));
                }
                ReflectStruct::new(meta.with_default_bound(), fields).map(Self::Struct)
            }
            Data::Enum(data) => ReflectUnion::new(meta, attrs, data).map(Self::Union),
            Data::Union(_) => Err(syn::Error::new(
                input.ident.span(),
                "`Reflect` cannot be derived for Rust unions",
            )),
        }
    }
}
