/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Hashing and hash-slicing (§4.1).

use core::hash::{BuildHasher, Hash, Hasher};

use crate::config::Config;

/// The width-normalized hash of a key. Always stored as a `u64`; when
/// `Config::hash_width()` is `W32` the high bits are masked off so that
/// slicing never observes them (§4.1.1).
pub(crate) type HashValue = u64;

/// Hashes `key` with `hasher_builder` and masks the result to `config`'s
/// `hash_width` (§4.1, §4.1.1).
#[inline]
pub(crate) fn hash_key<Q: ?Sized, H>(key: &Q, hasher_builder: &H, config: Config) -> HashValue
where
    Q: Hash,
    H: BuildHasher,
{
    let mut hasher = hasher_builder.build_hasher();
    key.hash(&mut hasher);
    hasher.finish() & config.hash_mask()
}

/// Returns the branch index in `[0, arity)` selected by `hash` at `level`,
/// or `None` once the hash is exhausted (`level > Lmax`), at which point
/// callers must fall back to a collision node (§4.1).
#[inline]
pub(crate) fn slice(hash: HashValue, level: u32, config: Config) -> Option<u32> {
    if level > config.max_level() {
        return None;
    }

    let shift = level * config.branch_bits() as u32;
    let mask = config.arity() as u64 - 1;

    Some(((hash >> shift) & mask) as u32)
}

#[cfg(feature = "std")]
pub type DefaultBuildHasher = std::collections::hash_map::RandomState;

/// A tiny FNV-1a hasher used as the `no_std` default. It carries a fixed
/// seed (the FNV offset basis) rather than a per-process random one, which
/// keeps it deterministic without needing an entropy source — sufficient
/// per §4.1 ("a process-global seed, if used, is established before any
/// tree is constructed and is not changed thereafter").
#[cfg(not(feature = "std"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct FnvHasher(u64);

#[cfg(not(feature = "std"))]
impl Hasher for FnvHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        const FNV_PRIME: u64 = 0x100_0000_01b3;
        let mut hash = if self.0 == 0 { 0xcbf2_9ce4_8422_2325 } else { self.0 };
        for &byte in bytes {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        self.0 = hash;
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
}

#[cfg(not(feature = "std"))]
pub type DefaultBuildHasher = core::hash::BuildHasherDefault<FnvHasher>;
