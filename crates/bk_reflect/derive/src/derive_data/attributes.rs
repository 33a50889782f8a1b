//! Parsing of the `#[json(...)]` attribute.
//!
//! - on a field: `#[json("wire_name,flags")]` or `#[json(flatten)]`
//! - on an enum: `#[json(discriminator = "type")]`
//! - on a variant: `#[json(variant = "ach")]`

use syn::parse::ParseStream;
use syn::{Attribute, Ident, LitStr, Token};

use crate::JSON_ATTRIBUTE_NAME;

fn json_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident(JSON_ATTRIBUTE_NAME))
}

/// Parses `key = "value"` where `key` must be `expected`.
fn parse_key_value(input: ParseStream, expected: &str) -> syn::Result<LitStr> {
    let key: Ident = input.parse()?;
    if key != expected {
        return Err(syn::Error::new(
            key.span(),
            format!("unknown json attribute `{key}`, expected `{expected} = \"...\"`"),
        ));
    }
    input.parse::<Token![=]>()?;
    input.parse()
}

// -----------------------------------------------------------------------------
// FieldAttributes

#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub tag: Option<LitStr>,
    pub flatten: bool,
}

impl FieldAttributes {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();

        for attr in json_attrs(attrs) {
            attr.parse_args_with(|input: ParseStream| {
                if input.peek(LitStr) {
                    let lit: LitStr = input.parse()?;
                    if out.tag.is_some() {
                        return Err(syn::Error::new(lit.span(), "duplicate json tag"));
                    }
                    out.tag = Some(lit);
                    return Ok(());
                }

                let ident: Ident = input.parse()?;
                if ident != "flatten" {
                    return Err(syn::Error::new(
                        ident.span(),
                        "expected a json tag string or `flatten`",
                    ));
                }
                out.flatten = true;
                Ok(())
            })?;
        }

        if out.flatten
            && let Some(tag) = &out.tag
        {
            return Err(syn::Error::new(
                tag.span(),
                "a flattened field cannot carry a json tag",
            ));
        }

        Ok(out)
    }

    /// Returns `true` if the codec sees this field.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.flatten || self.tag.is_some()
    }
}

// -----------------------------------------------------------------------------
// TypeAttributes

#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub discriminator: Option<LitStr>,
}

impl TypeAttributes {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        for attr in json_attrs(attrs) {
            out.discriminator = Some(attr.parse_args_with(|input: ParseStream| {
                parse_key_value(input, "discriminator")
            })?);
        }
        Ok(out)
    }
}

// -----------------------------------------------------------------------------
// VariantAttributes

#[derive(Default)]
pub(crate) struct VariantAttributes {
    pub discriminant: Option<LitStr>,
}

impl VariantAttributes {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        for attr in json_attrs(attrs) {
            out.discriminant = Some(
                attr.parse_args_with(|input: ParseStream| parse_key_value(input, "variant"))?,
            );
        }
        Ok(out)
    }
}
