use core::any::{TypeId, type_name};
use core::fmt;

/// The identity of a reflected type.
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    name: &'static str,
}

impl Type {
    /// Creates the [`Type`] of `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// The full type name, as given by [`core::any::type_name`].
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Check if the given type matches this one.
    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}
