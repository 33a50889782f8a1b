//! Field tag parsing.
//!
//! A tag is the string attached to a struct field with `#[json("...")]`.
//! Its first comma-separated segment is the wire name, the rest are flags:
//!
//! - `required`: an absent value is encoded as `null` instead of omitted.
//! - `extras`: the field is a string-keyed map collecting unknown keys.
//!
//! A wire name of `-` excludes the field. Unknown flags are ignored so that
//! tags written for newer versions keep working.

// -----------------------------------------------------------------------------
// FieldTag

/// A parsed field tag.
///
/// ```
/// use bk_reflect::tag::FieldTag;
///
/// let tag = FieldTag::parse("account_number,required");
/// assert_eq!(tag.name(), "account_number");
/// assert!(tag.required());
/// assert!(!tag.is_extras());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldTag<'a> {
    name: &'a str,
    required: bool,
    extras: bool,
}

impl<'a> FieldTag<'a> {
    /// Parses a raw tag. Never fails.
    pub fn parse(raw: &'a str) -> Self {
        let mut segments = raw.split(',');
        let name = segments.next().unwrap_or_default().trim();

        let mut tag = Self {
            name,
            required: false,
            extras: false,
        };
        for flag in segments {
            match flag.trim() {
                "required" => tag.required = true,
                "extras" => tag.extras = true,
                _ => {}
            }
        }
        tag
    }

    /// The wire name. Empty for an extras field tagged `",extras"`.
    #[inline]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    #[inline]
    pub const fn required(&self) -> bool {
        self.required
    }

    #[inline]
    pub const fn is_extras(&self) -> bool {
        self.extras
    }

    /// Returns `true` for a tag named `-`.
    #[inline]
    pub fn is_skipped(&self) -> bool {
        self.name == "-"
    }
}
