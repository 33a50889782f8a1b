use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectMeta;

/// Generate the `Typed` impl around an expression building the `TypeInfo`.
pub(super) fn impl_trait_typed(meta: &ReflectMeta, info_tokens: TokenStream) -> TokenStream {
    let bk_reflect_path = meta.bk_reflect_path();
    let typed_ = crate::path::typed_(bk_reflect_path);
    let type_info_ = crate::path::type_info_(bk_reflect_path);
    let header = meta.impl_header(&typed_);

    let body = if meta.is_generic() {
        let cell_ = crate::path::generic_cell_(bk_reflect_path);
        quote! {
            static CELL: #cell_ = #cell_::new();
            CELL.get_or_insert::<Self>(|| #info_tokens)
        }
    } else {
        let cell_ = crate::path::non_generic_cell_(bk_reflect_path);
        quote! {
            static CELL: #cell_ = #cell_::new();
            CELL.get_or_init(|| #info_tokens)
        }
    };

    quote! {
        #header {
            fn type_info() -> &'static #type_info_ {
                #body
            }
        }
    }
}

/// Generate the `Reflect` impl for the given kind (`Struct` or `Union`).
pub(super) fn impl_trait_reflect(meta: &ReflectMeta, kind: TokenStream) -> TokenStream {
    let bk_reflect_path = meta.bk_reflect_path();
    let reflect_ = crate::path::reflect_(bk_reflect_path);
    let reflect_kind_ = crate::path::reflect_kind_(bk_reflect_path);
    let reflect_ref_ = crate::path::reflect_ref_(bk_reflect_path);
    let reflect_mut_ = crate::path::reflect_mut_(bk_reflect_path);
    let header = meta.impl_header(&reflect_);

    quote! {
        #header {
            fn set(
                &mut self,
                value: ::std::boxed::Box<dyn #reflect_>,
            ) -> ::core::result::Result<(), ::std::boxed::Box<dyn #reflect_>> {
                *self = value.take::<Self>()?;
                ::core::result::Result::Ok(())
            }

            #[inline]
            fn reflect_kind(&self) -> #reflect_kind_ {
                #reflect_kind_::#kind
            }

            #[inline]
            fn reflect_ref(&self) -> #reflect_ref_<'_> {
                #reflect_ref_::#kind(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> #reflect_mut_<'_> {
                #reflect_mut_::#kind(self)
            }
        }
    }
}
