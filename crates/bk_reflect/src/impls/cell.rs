//! Containers for static storage of type information.
//!
//! A non-generic type keeps its [`TypeInfo`] in a [`NonGenericTypeInfoCell`],
//! a plain [`OnceLock`].
//!
//! A `static` inside a generic function is shared by every instantiation,
//! so generic types use [`GenericTypeInfoCell`]: a [`TypeIdMap`] of leaked
//! infos behind a [`RwLock`].

use std::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use bk_utils::TypeIdMap;

use crate::info::TypeInfo;

/// Container for static storage of non-generic type information.
///
/// ```ignore
/// impl Typed for Cents {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Scalar(ScalarInfo::new::<Cents>(ScalarKind::Int {
///             signed: true,
///             bits: 64,
///         })))
///     }
/// }
/// ```
pub struct NonGenericTypeInfoCell(OnceLock<TypeInfo>);

impl NonGenericTypeInfoCell {
    /// Create a empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored info, initializing it with `f` on first use.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &TypeInfo
    where
        F: FnOnce() -> TypeInfo,
    {
        self.0.get_or_init(f)
    }
}

/// Container for static storage of type information with generics.
///
/// ```
/// use bk_reflect::{impls::GenericTypeInfoCell, info::{Typed, TypeInfo}};
///
/// fn info_of<T: Typed>() -> &'static TypeInfo {
///     static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
///     CELL.get_or_insert::<T>(|| T::type_info().clone())
/// }
///
/// assert!(info_of::<u8>().type_is::<u8>());
/// assert!(info_of::<String>().type_is::<String>());
/// ```
pub struct GenericTypeInfoCell(RwLock<TypeIdMap<&'static TypeInfo>>);

impl GenericTypeInfoCell {
    /// Create a empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the info stored for `G`, inserting `f()` on first use.
    ///
    /// `f` runs without holding the lock, so it may itself query other
    /// cells. If two threads race, the first insert wins.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        // Separate to reduce code compilation times
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(
        &self,
        type_id: TypeId,
        f: impl FnOnce() -> TypeInfo,
    ) -> &TypeInfo {
        match self.get_by_type_id(type_id) {
            Some(info) => info,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: TypeInfo) -> &'static TypeInfo {
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(type_id, || Box::leak(Box::new(value)))
    }
}
