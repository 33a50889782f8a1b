//! Hash states used by the brook maps.
//!
//! [`FixedHashState`] wraps `foldhash` with a constant seed, so two processes
//! hashing the same key agree. [`NoOpHashState`] passes a `u64` straight
//! through and is only meant for keys that are already hashes (`TypeId`).

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHasher

const FIXED_SEED: FixedState = FixedState::with_seed(0x62_72_6F_6F_6B_5F_6A_73);

/// Alias of [`foldhash::fast::FoldHasher`] built from [`FixedHashState`].
pub type FixedHasher = FoldHasher<'static>;

/// Hash state with a fixed seed.
///
/// ```
/// use core::hash::BuildHasher;
/// use bk_utils::hash::FixedHashState;
///
/// assert_eq!(FixedHashState.hash_one("id"), FixedHashState.hash_one("id"));
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_SEED.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// NoOpHasher

/// Hasher that keeps the last written `u64` as its result.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher {
    hash: u64,
}

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        // `TypeId` writes a `u128` on some targets, fold it in.
        for byte in bytes.iter().rev() {
            self.hash = self.hash.rotate_left(8).wrapping_add(*byte as u64);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

/// Hash state producing [`NoOpHasher`].
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        NoOpHasher { hash: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_op_passes_u64_through() {
        let mut hasher = NoOpHashState.build_hasher();
        hasher.write_u64(42);
        assert_eq!(hasher.finish(), 42);
    }

    #[test]
    fn fixed_state_is_stable() {
        let a = FixedHashState.hash_one("next_cursor");
        let b = FixedHashState.hash_one("next_cursor");
        assert_eq!(a, b);
        assert_ne!(a, FixedHashState.hash_one("data"));
    }
}
