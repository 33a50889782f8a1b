use proc_macro2::TokenStream;
use quote::quote;

use super::{impl_trait_reflect, impl_trait_typed};
use crate::derive_data::ReflectUnion;

/// Implement full reflect for an enum treated as a union.
pub(crate) fn impl_union(info: &ReflectUnion) -> TokenStream {
    let typed_trait_tokens = impl_trait_typed(&info.meta, union_info_tokens(info));
    let reflect_trait_tokens = impl_trait_reflect(&info.meta, quote!(Union));
    let union_trait_tokens = impl_trait_union(info);

    quote! {
        #typed_trait_tokens

        #reflect_trait_tokens

        #union_trait_tokens
    }
}

/// `TypeInfo::Union(UnionInfo::new::<Self>(discriminator, &[...]))`
fn union_info_tokens(info: &ReflectUnion) -> TokenStream {
    let bk_reflect_path = info.meta.bk_reflect_path();
    let reflect_ = crate::path::reflect_(bk_reflect_path);
    let type_info_ = crate::path::type_info_(bk_reflect_path);
    let union_info_ = crate::path::union_info_(bk_reflect_path);
    let union_variant_ = crate::path::union_variant_(bk_reflect_path);

    let discriminator = match &info.attrs.discriminator {
        Some(lit) => quote! { ::core::option::Option::Some(#lit) },
        None => quote! { ::core::option::Option::None },
    };

    let variants = info.variants.iter().map(|variant| {
        let ident = variant.ident;
        let ty = variant.ty;
        let name = ident.to_string();
        let discriminant = variant
            .attrs
            .discriminant
            .as_ref()
            .map(|lit| quote! { .with_discriminant(#lit) });
        quote! {
            #union_variant_::new::<#ty>(
                #name,
                |value: ::std::boxed::Box<dyn #reflect_>| {
                    value
                        .take::<#ty>()
                        .map(|inner| ::std::boxed::Box::new(Self::#ident(inner)) as ::std::boxed::Box<dyn #reflect_>)
                },
            ) #discriminant
        }
    });

    quote! {
        #type_info_::Union(#union_info_::new::<Self>(#discriminator, &[ #(#variants),* ]))
    }
}

/// Generate `Union` trait implementation tokens.
fn impl_trait_union(info: &ReflectUnion) -> TokenStream {
    let bk_reflect_path = info.meta.bk_reflect_path();
    let reflect_ = crate::path::reflect_(bk_reflect_path);
    let union_ = crate::path::union_(bk_reflect_path);
    let header = info.meta.impl_header(&union_);

    let idents: Vec<_> = info.variants.iter().map(|variant| variant.ident).collect();
    let indices = 0..idents.len();

    quote! {
        #header {
            fn variant_index(&self) -> usize {
                match self {
                    #( Self::#idents(_) => #indices, )*
                }
            }

            fn variant_value(&self) -> &dyn #reflect_ {
                match self {
                    #( Self::#idents(value) => value as &dyn #reflect_, )*
                }
            }

            fn variant_value_mut(&mut self) -> &mut dyn #reflect_ {
                match self {
                    #( Self::#idents(value) => value as &mut dyn #reflect_, )*
                }
            }
        }
    }
}
