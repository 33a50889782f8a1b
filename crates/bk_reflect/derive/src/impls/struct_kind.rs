use proc_macro2::TokenStream;
use quote::quote;

use super::{impl_trait_reflect, impl_trait_typed};
use crate::derive_data::ReflectStruct;

/// Implement full reflect for struct type.
pub(crate) fn impl_struct(info: &ReflectStruct) -> TokenStream {
    let typed_trait_tokens = impl_trait_typed(&info.meta, struct_info_tokens(info));
    let reflect_trait_tokens = impl_trait_reflect(&info.meta, quote!(Struct));
    let struct_trait_tokens = impl_trait_struct(info);

    quote! {
        #typed_trait_tokens

        #reflect_trait_tokens

        #struct_trait_tokens
    }
}

/// `TypeInfo::Struct(StructInfo::new::<Self>(&[...]))`
fn struct_info_tokens(info: &ReflectStruct) -> TokenStream {
    let bk_reflect_path = info.meta.bk_reflect_path();
    let type_info_ = crate::path::type_info_(bk_reflect_path);
    let struct_info_ = crate::path::struct_info_(bk_reflect_path);
    let named_field_ = crate::path::named_field_(bk_reflect_path);

    let fields = info.fields.iter().map(|field| {
        let ty = field.ty;
        let name = field.ident.to_string();
        let modifier = match &field.attrs.tag {
            Some(tag) => quote! { .with_tag(#tag) },
            None => quote! { .flattened() },
        };
        quote! { #named_field_::new::<#ty>(#name) #modifier }
    });

    quote! {
        #type_info_::Struct(#struct_info_::new::<Self>(&[ #(#fields),* ]))
    }
}

/// Generate `Struct` trait implementation tokens.
fn impl_trait_struct(info: &ReflectStruct) -> TokenStream {
    let bk_reflect_path = info.meta.bk_reflect_path();
    let reflect_ = crate::path::reflect_(bk_reflect_path);
    let struct_ = crate::path::struct_(bk_reflect_path);
    let header = info.meta.impl_header(&struct_);

    let field_len = info.fields.len();
    let indices = 0..field_len;
    let indices_mut = 0..field_len;
    let idents: Vec<_> = info.fields.iter().map(|field| field.ident).collect();

    quote! {
        #header {
            fn field_at(&self, index: usize) -> ::core::option::Option<&dyn #reflect_> {
                match index {
                    #( #indices => ::core::option::Option::Some(&self.#idents as &dyn #reflect_), )*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_at_mut(
                &mut self,
                index: usize,
            ) -> ::core::option::Option<&mut dyn #reflect_> {
                match index {
                    #( #indices_mut => ::core::option::Option::Some(&mut self.#idents as &mut dyn #reflect_), )*
                    _ => ::core::option::Option::None,
                }
            }

            #[inline]
            fn field_len(&self) -> usize {
                #field_len
            }
        }
    }
}
