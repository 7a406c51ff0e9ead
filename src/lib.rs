/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! A persistent hash array mapped trie (HAMT).
//!
//! [`HashTrieMap`] is an immutable map: every insert or delete returns a
//! new map, sharing as much structure as possible with the one it was
//! derived from, rather than mutating in place. Internally it is a tree
//! of bitmap-indexed branching nodes, falling back to flat collision
//! buckets once a hash is fully consumed.
//!
//! ```
//! use hamt::HashTrieMap;
//!
//! let empty: HashTrieMap<&str, i32> = HashTrieMap::new();
//! let with_a = empty.set("a", 1);
//! let with_ab = with_a.set("b", 2);
//!
//! assert_eq!(with_ab.get("a"), Some(&1));
//! assert_eq!(with_a.get("b"), None); // `with_a` was never modified.
//! ```
//!
//! # Crate features
//!
//! - `std` (default): enables a `RandomState`-backed default hasher and
//!   `std::error::Error` impls. Without it the crate is `no_std` (still
//!   requiring `alloc`) and falls back to a fixed-seed FNV-1a hasher.
//! - `serde`: (de)serializes a [`HashTrieMap`] as a sequence of
//!   key/value pairs.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod bitmap_node;
mod collision_node;
mod config;
mod entry;
mod error;
mod hash;
mod iter;
mod node;
mod tree;

pub use config::{Config, ConfigError, HashWidth, DEFAULT_BRANCH_BITS};
pub use error::Error;
pub use hash::DefaultBuildHasher;
pub use iter::Iter;
pub use tree::{HashTrieMap, HashTrieMapSync};

#[cfg(feature = "serde")]
mod serde_impl {
    use core::fmt;
    use core::hash::{BuildHasher, Hash};
    use core::marker::PhantomData;

    use archery::SharedPointerKind;
    use serde::de::{Deserialize, Deserializer, Visitor};
    use serde::ser::{Serialize, Serializer};

    use crate::HashTrieMap;

    impl<K, V, P, H> Serialize for HashTrieMap<K, V, P, H>
    where
        K: Eq + Hash + Serialize,
        V: Serialize,
        P: SharedPointerKind,
        H: BuildHasher + Clone,
    {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_map(self.iter())
        }
    }

    struct HashTrieMapVisitor<K, V, P, H> {
        marker: PhantomData<(K, V, P, H)>,
    }

    impl<'de, K, V, P, H> Visitor<'de> for HashTrieMapVisitor<K, V, P, H>
    where
        K: Eq + Hash + Deserialize<'de>,
        V: Deserialize<'de>,
        P: SharedPointerKind,
        H: BuildHasher + Clone + Default,
    {
        type Value = HashTrieMap<K, V, P, H>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: serde::de::MapAccess<'de>,
        {
            let mut map = HashTrieMap::new_with_config_and_hasher(
                crate::Config::default(),
                H::default(),
            );

            while let Some((k, v)) = access.next_entry()? {
                map = map.set(k, v);
            }

            Ok(map)
        }
    }

    impl<'de, K, V, P, H> Deserialize<'de> for HashTrieMap<K, V, P, H>
    where
        K: Eq + Hash + Deserialize<'de>,
        V: Deserialize<'de>,
        P: SharedPointerKind,
        H: BuildHasher + Clone + Default,
    {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_map(HashTrieMapVisitor { marker: PhantomData })
        }
    }
}
