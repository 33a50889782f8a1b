//! See [`Reflect`](derive_reflect).

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

static JSON_ATTRIBUTE_NAME: &str = "json";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Reflection Derivation
///
/// `#[derive(Reflect)]` implements `Typed` and `Reflect`, plus `Struct` for
/// structs with named fields or `Union` for enums.
///
/// ## Structs
///
/// Structs must implement `Default`; decoding starts from the default value.
/// Fields are opted in with the `json` attribute:
///
/// ```rust, ignore
/// #[derive(Reflect, Default)]
/// struct Account {
///     #[json("id")]
///     id: String,
///     // emitted as `null` when `None`
///     #[json("closed_at,required")]
///     closed_at: Option<String>,
///     // unknown keys land here
///     #[json(",extras")]
///     extras: HashMap<String, serde_json::Value>,
///     // fields of `Common` appear at this level of the JSON object
///     #[json(flatten)]
///     common: Common,
///     // no attribute: invisible to the codec, any type allowed
///     scratch: Vec<u8>,
/// }
/// ```
///
/// ## Unions
///
/// Every variant holds exactly one unnamed field. Variants are matched in
/// declaration order by JSON kind; for objects, the enum-level
/// `discriminator` field is compared with the variant-level `variant` value.
///
/// ```rust, ignore
/// #[derive(Reflect)]
/// #[json(discriminator = "type")]
/// enum Counterparty {
///     Id(String),
///     #[json(variant = "ach")]
///     Ach(AchDetails),
///     #[json(variant = "wire")]
///     Wire(WireDetails),
/// }
/// ```
///
/// ## Generics
///
/// Every type parameter is bounded by `Reflect + Typed`.
#[proc_macro_derive(Reflect, attributes(json))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    use derive_data::ReflectDerive;

    let ast = parse_macro_input!(input as DeriveInput);

    let derive_data = match ReflectDerive::from_input(&ast) {
        Ok(data) => data,
        Err(err) => return err.into_compile_error().into(),
    };

    let reflect_impls = match &derive_data {
        ReflectDerive::Struct(info) => impls::impl_struct(info),
        ReflectDerive::Union(info) => impls::impl_union(info),
    };

    quote! {
        const _: () = {
            #reflect_impls
        };
    }
    .into()
}
