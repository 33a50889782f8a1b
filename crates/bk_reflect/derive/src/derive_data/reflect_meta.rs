use proc_macro2::TokenStream;
use quote::quote;
use syn::{Generics, Ident};

/// Data shared by every kind of derive: the type name, its generics and
/// the resolved `bk_reflect` path.
pub(crate) struct ReflectMeta<'a> {
    ident: &'a Ident,
    generics: &'a Generics,
    bk_reflect_path: syn::Path,
    // structs are instantiated through `Default`
    bound_default: bool,
}

impl<'a> ReflectMeta<'a> {
    pub fn new(ident: &'a Ident, generics: &'a Generics) -> Self {
        Self {
            ident,
            generics,
            bk_reflect_path: crate::path::bk_reflect(),
            bound_default: false,
        }
    }

    /// Adds `Self: Default` to every generated impl.
    #[inline]
    pub fn with_default_bound(mut self) -> Self {
        self.bound_default = true;
        self
    }

    #[inline]
    pub fn ident(&self) -> &Ident {
        self.ident
    }

    #[inline]
    pub fn bk_reflect_path(&self) -> &syn::Path {
        &self.bk_reflect_path
    }

    /// Generic types share one `static` per impl and need a keyed cell.
    #[inline]
    pub fn is_generic(&self) -> bool {
        self.generics.type_params().next().is_some()
    }

    /// `impl<...> #trait_path for Type<...> where ...`, with every type
    /// parameter bounded by `Reflect + Typed`.
    pub fn impl_header(&self, trait_path: &TokenStream) -> TokenStream {
        let ident = self.ident;
        let reflect_ = crate::path::reflect_(&self.bk_reflect_path);
        let typed_ = crate::path::typed_(&self.bk_reflect_path);

        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();
        let existing = where_clause.map(|clause| {
            let predicates = clause.predicates.iter();
            quote! { #(#predicates,)* }
        });
        let bounds = self.generics.type_params().map(|param| {
            let param = &param.ident;
            quote! { #param: #reflect_ + #typed_, }
        });

        let default_bound = self
            .bound_default
            .then(|| quote! { Self: ::core::default::Default, });

        quote! {
            impl #impl_generics #trait_path for #ident #ty_generics
            where
                #existing
                #(#bounds)*
                #default_bound
        }
    }
}
