//! This independent module is used to provide the required paths,
//! so as to minimize changes when the `bk_reflect` layout is modified.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the correct access path to the `bk_reflect` crate.
///
/// 1. For crates that depend on `bk_reflect`, `::bk_reflect` is returned.
/// 2. For crates that depend on `brook`, `::brook::reflect` is returned.
/// 3. For other situations, `::bk_reflect` is returned, which may be incorrect.
///
/// The lookup reads the caller's manifest, so it runs once per derive and
/// the path is passed around afterwards.
pub(crate) fn bk_reflect() -> syn::Path {
    bk_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("bk_reflect"))
}

// -----------------------------------------------------------------------------
// Internal API

#[inline(always)]
pub(crate) fn reflect_(bk_reflect_path: &syn::Path) -> TokenStream {
    quote! { #bk_reflect_path::Reflect }
}

#[inline(always)]
pub(crate) fn typed_(bk_reflect_path: &syn::Path) -> TokenStream {
    quote! { #bk_reflect_path::info::Typed }
}

#[inline(always)]
pub(crate) fn type_info_(bk_reflect_path: &syn::Path) -> TokenStream {
    quote! { #bk_reflect_path::info::TypeInfo }
}

#[inline(always)]
pub(crate) fn reflect_kind_(bk_reflect_path: &syn::Path) -> TokenStream {
    quote! { #bk_reflect_path::info::ReflectKind }
}

#[inline(always)]
pub(crate) fn struct_info_(bk_reflect_path: &syn::Path) -> TokenStream {
    quote! { #bk_reflect_path::info::StructInfo }
}

#[inline(always)]
pub(crate) fn named_field_(bk_reflect_path: &syn::Path) -> TokenStream {
    quote! { #bk_reflect_path::info::NamedField }
}

#[inline(always)]
pub(crate) fn union_info_(bk_reflect_path: &syn::Path) -> TokenStream {
    quote! { #bk_reflect_path::info::UnionInfo }
}

#[inline(always)]
pub(crate) fn union_variant_(bk_reflect_path: &syn::Path) -> TokenStream {
    quote! { #bk_reflect_path::info::UnionVariant }
}

#[inline(always)]
pub(crate) fn non_generic_cell_(bk_reflect_path: &syn::Path) -> TokenStream {
    quote! { #bk_reflect_path::impls::NonGenericTypeInfoCell }
}

#[inline(always)]
pub(crate) fn generic_cell_(bk_reflect_path: &syn::Path) -> TokenStream {
    quote! { #bk_reflect_path::impls::GenericTypeInfoCell }
}

#[inline(always)]
pub(crate) fn reflect_ref_(bk_reflect_path: &syn::Path) -> TokenStream {
    quote! { #bk_reflect_path::ops::ReflectRef }
}

#[inline(always)]
pub(crate) fn reflect_mut_(bk_reflect_path: &syn::Path) -> TokenStream {
    quote! { #bk_reflect_path::ops::ReflectMut }
}

#[inline(always)]
pub(crate) fn struct_(bk_reflect_path: &syn::Path) -> TokenStream {
    quote! { #bk_reflect_path::ops::Struct }
}

#[inline(always)]
pub(crate) fn union_(bk_reflect_path: &syn::Path) -> TokenStream {
    quote! { #bk_reflect_path::ops::Union }
}
