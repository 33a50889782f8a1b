use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{DynamicTyped, ReflectKind};
use crate::ops::{ReflectMut, ReflectRef};

// -----------------------------------------------------------------------------
// Reflect

/// The foundational trait of dynamic access in [`bk_reflect`](crate).
///
/// Use [the derive macro](crate::derive::Reflect) for structs and unions;
/// std types are covered by [`crate::impls`].
///
/// # Type Casting
///
/// [`reflect_ref`] and [`reflect_mut`] give a kind-specific view:
///
/// ```rust
/// # use bk_reflect::{Reflect, ops::ReflectRef};
/// let value = vec![1_u8, 2, 3];
/// match value.reflect_ref() {
///     ReflectRef::List(list) => assert_eq!(list.len(), 3),
///     _ => unreachable!(),
/// }
/// ```
///
/// `downcast_ref`, `downcast_mut`, `downcast` and `take` recover the
/// concrete type:
///
/// ```rust
/// # use bk_reflect::Reflect;
/// let x: Box<dyn Reflect> = 10_i32.into_boxed_reflect();
/// assert_eq!(x.downcast_ref::<i32>(), Some(&10));
/// ```
///
/// # Type Identification
///
/// [`Any::type_id`] on a `Box<dyn Reflect>` returns the id of the box.
/// Use [`Reflect::ty_id`] instead.
///
/// [`reflect_ref`]: Reflect::reflect_ref
/// [`reflect_mut`]: Reflect::reflect_mut
pub trait Reflect: DynamicTyped + Send + Sync + Any {
    /// Casts this type to a fully-reflected value.
    #[inline(always)]
    fn as_reflect(&self) -> &dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    /// Casts this type to a mutable, fully-reflected value.
    #[inline(always)]
    fn as_reflect_mut(&mut self) -> &mut dyn Reflect
    where
        Self: Sized,
    {
        self
    }

    /// Boxes this value as a `dyn Reflect`.
    #[inline(always)]
    fn into_boxed_reflect(self) -> Box<dyn Reflect>
    where
        Self: Sized,
    {
        Box::new(self)
    }

    /// Return the [`TypeId`] of underlying type.
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    /// Replaces `self` with `value`.
    ///
    /// Gives `value` back if it is not of type `Self`.
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    fn reflect_kind(&self) -> ReflectKind;

    fn reflect_ref(&self) -> ReflectRef<'_>;

    fn reflect_mut(&mut self) -> ReflectMut<'_>;
}

impl dyn Reflect {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline(always)]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Downcasts the value to type `T` by reference.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    /// Downcasts the value to type `T` by mutable reference.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Downcasts the value to type `T`, consuming the trait object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    #[inline]
    #[expect(unsafe_code, reason = "type is already checked")]
    pub fn downcast<T: Any>(self: Box<dyn Reflect>) -> Result<Box<T>, Box<dyn Reflect>> {
        if self.is::<T>() {
            Ok(unsafe { <Box<dyn Any>>::downcast::<T>(self).unwrap_unchecked() })
        } else {
            Err(self)
        }
    }

    /// Downcasts the value to type `T`, unboxing and consuming the trait object.
    ///
    /// ```
    /// # use bk_reflect::Reflect;
    /// let x: Box<dyn Reflect> = "id".to_string().into_boxed_reflect();
    /// assert_eq!(x.take::<String>().unwrap(), "id");
    /// ```
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        self.downcast::<T>().map(|value| *value)
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dyn Reflect({})", self.reflect_type_info().type_name())
    }
}

// -----------------------------------------------------------------------------
// Auxiliary macro

/// Implement `set`, `reflect_kind`, `reflect_ref` and `reflect_mut`.
macro_rules! impl_reflect_cast_fn {
    ($kind:ident) => {
        fn set(
            &mut self,
            value: ::std::boxed::Box<dyn $crate::Reflect>,
        ) -> Result<(), ::std::boxed::Box<dyn $crate::Reflect>> {
            *self = value.take::<Self>()?;
            Ok(())
        }

        #[inline]
        fn reflect_kind(&self) -> $crate::info::ReflectKind {
            $crate::info::ReflectKind::$kind
        }

        #[inline]
        fn reflect_ref(&self) -> $crate::ops::ReflectRef<'_> {
            $crate::ops::ReflectRef::$kind(self)
        }

        #[inline]
        fn reflect_mut(&mut self) -> $crate::ops::ReflectMut<'_> {
            $crate::ops::ReflectMut::$kind(self)
        }
    };
}

pub(crate) use impl_reflect_cast_fn;
