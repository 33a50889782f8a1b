use core::any::TypeId;

use crate::info::{TypeInfo, Typed};
use crate::tag::FieldTag;

// -----------------------------------------------------------------------------
// NamedField

/// Information for a named struct field.
///
/// A field takes part in (de)serialization in one of two ways:
///
/// - tagged: `#[json("wire_name,flags")]`, see [`FieldTag`].
/// - flattened: `#[json(flatten)]`, the field is a struct whose own fields
///   appear directly in the enclosing JSON object.
///
/// The derive leaves fields with neither attribute out of the struct info.
///
/// ```
/// use bk_reflect::{derive::Reflect, info::Typed};
///
/// #[derive(Reflect, Default)]
/// struct Card {
///     #[json("last_four,required")]
///     last_four: Option<String>,
///     cache_key: u64,
///     #[json("-")]
///     secret: String,
/// }
///
/// let info = Card::type_info().as_struct().unwrap();
/// assert_eq!(info.field_len(), 2);
///
/// let field = info.field_at(0).unwrap();
/// assert_eq!(field.ident(), "last_four");
/// assert!(field.tag().unwrap().required());
/// assert_eq!(info.field_at(1).unwrap().wire_name(), None);
/// ```
#[derive(Clone, Debug)]
pub struct NamedField {
    ident: &'static str,
    ty_id: TypeId,
    // `TypeInfo` is created on first access; using a function pointer delays it.
    type_info: fn() -> &'static TypeInfo,
    tag: Option<FieldTag<'static>>,
    flatten: bool,
}

impl NamedField {
    /// Creates an untagged field named `ident` with type `T`.
    #[inline]
    pub fn new<T: Typed>(ident: &'static str) -> Self {
        Self {
            ident,
            ty_id: TypeId::of::<T>(),
            type_info: T::type_info,
            tag: None,
            flatten: false,
        }
    }

    /// Attaches a raw tag, parsed once here.
    #[inline]
    pub fn with_tag(mut self, raw: &'static str) -> Self {
        self.tag = Some(FieldTag::parse(raw));
        self
    }

    /// Marks the field as flattened.
    #[inline]
    pub fn flattened(mut self) -> Self {
        self.flatten = true;
        self
    }

    /// The Rust identifier of the field.
    #[inline]
    pub const fn ident(&self) -> &'static str {
        self.ident
    }

    #[inline]
    pub const fn tag(&self) -> Option<&FieldTag<'static>> {
        self.tag.as_ref()
    }

    #[inline]
    pub const fn is_flatten(&self) -> bool {
        self.flatten
    }

    /// Returns `true` if the field carries an `extras` tag.
    #[inline]
    pub fn is_extras(&self) -> bool {
        self.tag.is_some_and(|tag| tag.is_extras())
    }

    /// The wire name of a regular tagged field.
    ///
    /// `None` for untagged, skipped, flattened and extras fields.
    pub fn wire_name(&self) -> Option<&'static str> {
        match self.tag {
            Some(tag) if !tag.is_extras() && !tag.is_skipped() && !self.flatten => {
                Some(tag.name())
            }
            _ => None,
        }
    }

    /// Returns the `TypeId`.
    #[inline]
    pub const fn ty_id(&self) -> TypeId {
        self.ty_id
    }

    /// Check if the given type matches this one.
    #[inline]
    pub fn type_is<T: 'static>(&self) -> bool {
        self.ty_id == TypeId::of::<T>()
    }

    /// Returns the field's [`TypeInfo`].
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }
}
