use core::any::TypeId;

use crate::Reflect;
use crate::info::{Type, TypeInfo, Typed};
use crate::ops::Union;

/// Moves a boxed inner value into its wrapper, or gives it back.
pub type WrapFn = fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>;

// -----------------------------------------------------------------------------
// UnionVariant

/// One alternative of a union.
#[derive(Clone, Debug)]
pub struct UnionVariant {
    name: &'static str,
    discriminant: Option<&'static str>,
    ty_id: TypeId,
    type_info: fn() -> &'static TypeInfo,
    wrap: WrapFn,
}

impl UnionVariant {
    /// Creates a variant named `name` holding a `T`.
    pub fn new<T: Typed>(name: &'static str, wrap: WrapFn) -> Self {
        Self {
            name,
            discriminant: None,
            ty_id: TypeId::of::<T>(),
            type_info: T::type_info,
            wrap,
        }
    }

    /// Sets the discriminator value selecting this variant.
    #[inline]
    pub fn with_discriminant(mut self, value: &'static str) -> Self {
        self.discriminant = Some(value);
        self
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn discriminant(&self) -> Option<&'static str> {
        self.discriminant
    }

    #[inline]
    pub const fn ty_id(&self) -> TypeId {
        self.ty_id
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    /// Moves a boxed inner value into the union.
    #[inline]
    pub fn wrap(&self, inner: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.wrap)(inner)
    }
}

// -----------------------------------------------------------------------------
// UnionInfo

/// The variant table of a union.
///
/// Variants are tried in declaration order and the first match wins.
/// Object values are further filtered by the optional discriminator field.
///
/// ```
/// use bk_reflect::{derive::Reflect, info::Typed};
///
/// #[derive(Reflect, Default)]
/// struct Ach {
///     #[json("type")]
///     kind: String,
/// }
///
/// #[derive(Reflect)]
/// #[json(discriminator = "type")]
/// enum Rail {
///     Code(String),
///     #[json(variant = "ach")]
///     Ach(Ach),
/// }
///
/// let info = Rail::type_info().as_union().unwrap();
/// assert_eq!(info.discriminator(), Some("type"));
/// assert_eq!(info.variant_at(1).unwrap().discriminant(), Some("ach"));
/// ```
#[derive(Clone, Debug)]
pub struct UnionInfo {
    ty: Type,
    discriminator: Option<&'static str>,
    variants: Box<[UnionVariant]>,
}

impl UnionInfo {
    pub fn new<T: Union>(discriminator: Option<&'static str>, variants: &[UnionVariant]) -> Self {
        Self {
            ty: Type::of::<T>(),
            discriminator,
            variants: variants.into(),
        }
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    /// The JSON field naming the variant of an object value.
    #[inline]
    pub const fn discriminator(&self) -> Option<&'static str> {
        self.discriminator
    }

    #[inline]
    pub fn variant_at(&self, index: usize) -> Option<&UnionVariant> {
        self.variants.get(index)
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &UnionVariant> {
        self.variants.iter()
    }

    #[inline]
    pub fn variant_len(&self) -> usize {
        self.variants.len()
    }
}
