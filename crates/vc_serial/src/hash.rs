//! Hash states for the engine's lookup tables.
//!
//! - [`NameHashState`]: `foldhash` with a fixed seed, for field and variant
//!   name indexes.
//! - [`TypeIdHashState`]: passes the `u64` written by `TypeId` straight
//!   through, for the per-type registry cell.

use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

/// Name-keyed map used by registries and enum tables.
pub(crate) type NameMap<V> = hashbrown::HashMap<&'static str, V, NameHashState>;

/// `TypeId`-keyed map used by the registry cell.
pub(crate) type TypeIdMap<V> = hashbrown::HashMap<core::any::TypeId, V, TypeIdHashState>;

// -----------------------------------------------------------------------------
// NameHashState

const NAME_HASH_STATE: FixedState = FixedState::with_seed(0x5E71_A1C0_DE0F_F1E7);

#[derive(Copy, Clone, Default, Debug)]
pub(crate) struct NameHashState;

impl BuildHasher for NameHashState {
    type Hasher = FoldHasher<'static>;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        NAME_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// TypeIdHashState

#[derive(Copy, Clone, Default, Debug)]
pub(crate) struct TypeIdHasher {
    hash: u64,
}

impl Hasher for TypeIdHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        // `TypeId` normally calls `write_u64`; fold anything else in.
        for byte in bytes.iter().rev() {
            self.hash = self.hash.rotate_left(8).wrapping_add(*byte as u64);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

#[derive(Copy, Clone, Default, Debug)]
pub(crate) struct TypeIdHashState;

impl BuildHasher for TypeIdHashState {
    type Hasher = TypeIdHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        TypeIdHasher { hash: 0 }
    }
}
