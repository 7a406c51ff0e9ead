/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The tree handle, [`HashTrieMap`] (§4.1, §4.4).

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FromIterator;
use core::ops::Index;

use archery::{ArcK, RcK, SharedPointer, SharedPointerKind};

use crate::config::Config;
use crate::entry::EntryWithHash;
use crate::hash::{hash_key, DefaultBuildHasher};
use crate::iter::Iter;
use crate::node::{self, split, DeleteOutcome, Node, Replacement};

/// What the tree handle actually points at: nothing, a single entry held
/// directly (no node allocated for one element), or a subtree (§4.1).
#[derive(Debug)]
pub(crate) enum Root<K, V, P: SharedPointerKind> {
    Empty,
    Leaf(EntryWithHash<K, V, P>),
    Node(SharedPointer<Node<K, V, P>, P>),
}

impl<K, V, P: SharedPointerKind> Clone for Root<K, V, P> {
    fn clone(&self) -> Root<K, V, P> {
        match self {
            Root::Empty => Root::Empty,
            Root::Leaf(e) => Root::Leaf(e.clone()),
            Root::Node(n) => Root::Node(SharedPointer::clone(n)),
        }
    }
}

/// A persistent, immutable hash array mapped trie (§1, §2).
///
/// Every modifying operation (`insert`, `delete`) returns a new handle
/// sharing unmodified structure with its predecessor; the receiver is
/// left untouched (§1 "Persistence"). `P` selects the reference-counting
/// strategy used for shared subtrees: [`RcK`] (the default, single
/// threaded) or [`ArcK`] (thread safe, see [`HashTrieMapSync`]).
pub struct HashTrieMap<K, V, P = RcK, H = DefaultBuildHasher>
where
    P: SharedPointerKind,
{
    pub(crate) root: Root<K, V, P>,
    size: usize,
    config: Config,
    hasher_builder: H,
}

/// A [`HashTrieMap`] whose shared subtrees use atomic reference counting,
/// safe to hand to another thread (§5).
pub type HashTrieMapSync<K, V, H = DefaultBuildHasher> = HashTrieMap<K, V, ArcK, H>;

impl<K, V> HashTrieMap<K, V, RcK, DefaultBuildHasher> {
    /// An empty map using the default configuration and hasher (§4.4.1).
    #[must_use]
    pub fn new() -> HashTrieMap<K, V, RcK, DefaultBuildHasher> {
        HashTrieMap::new_with_config_and_hasher(Config::default(), DefaultBuildHasher::default())
    }
}

impl<K, V> Default for HashTrieMap<K, V, RcK, DefaultBuildHasher> {
    fn default() -> HashTrieMap<K, V, RcK, DefaultBuildHasher> {
        HashTrieMap::new()
    }
}

impl<K, V, P, H> HashTrieMap<K, V, P, H>
where
    P: SharedPointerKind,
    H: BuildHasher,
{
    /// An empty map with an explicit [`Config`] and hasher (§4.4.1, §6.1).
    pub fn new_with_config_and_hasher(config: Config, hasher_builder: H) -> HashTrieMap<K, V, P, H> {
        HashTrieMap { root: Root::Empty, size: 0, config, hasher_builder }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub(crate) fn depth_hint(&self) -> usize {
        self.config.max_level() as usize
    }
}

impl<K, V, P, H> HashTrieMap<K, V, P, H>
where
    K: Eq + Hash,
    P: SharedPointerKind,
    H: BuildHasher,
{
    /// §4.2/§4.3 *Lookup*, entered through the tree handle.
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        let hash = hash_key(key, &self.hasher_builder, self.config);

        match &self.root {
            Root::Empty => None,
            Root::Leaf(e) => {
                if e.matches(key, hash) {
                    Some(e.value())
                } else {
                    None
                }
            }
            Root::Node(n) => node::get(n, key, hash, 0, self.config),
        }
    }

    #[must_use]
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> Iter<'_, K, V, P>
    where
        H: Clone,
    {
        Iter::new(self)
    }
}

impl<K, V, P, H> HashTrieMap<K, V, P, H>
where
    K: Eq + Hash,
    P: SharedPointerKind,
    H: BuildHasher + Clone,
{
    /// §4.2/§4.3 *Insert*. Returns a new map; `self` is left unchanged.
    #[must_use]
    pub fn set(&self, key: K, value: V) -> HashTrieMap<K, V, P, H> {
        let entry = EntryWithHash::new(key, value, &self.hasher_builder, self.config);

        let (new_root, delta) = match &self.root {
            Root::Empty => (Root::Leaf(entry), 1),
            Root::Leaf(existing) => {
                if existing.matches(entry.key(), entry.hash) {
                    (Root::Leaf(entry), 0)
                } else {
                    let node = split(existing.clone(), entry, 0, self.config);
                    (Root::Node(SharedPointer::new(node)), 1)
                }
            }
            Root::Node(n) => {
                let (new_node, delta) = node::insert(n, entry, 0, self.config);
                (Root::Node(SharedPointer::new(new_node)), delta)
            }
        };

        HashTrieMap {
            root: new_root,
            size: self.size + delta as usize,
            config: self.config,
            hasher_builder: self.hasher_builder.clone(),
        }
    }

    /// §4.2/§4.3 *Delete*. A key absent from the map is a no-op that
    /// hands back a map equal to `self` (§4.2 "Delete on an absent key").
    #[must_use]
    pub fn delete<Q: ?Sized>(&self, key: &Q) -> HashTrieMap<K, V, P, H>
    where
        K: Borrow<Q>,
        Q: Hash + Eq,
    {
        let hash = hash_key(key, &self.hasher_builder, self.config);

        match &self.root {
            Root::Empty => self.shallow_clone(),
            Root::Leaf(e) => {
                if e.matches(key, hash) {
                    HashTrieMap {
                        root: Root::Empty,
                        size: 0,
                        config: self.config,
                        hasher_builder: self.hasher_builder.clone(),
                    }
                } else {
                    self.shallow_clone()
                }
            }
            Root::Node(n) => match node::delete(n, key, hash, 0, self.config) {
                DeleteOutcome::Absent => self.shallow_clone(),
                DeleteOutcome::Removed(replacement) => {
                    let new_root = match replacement {
                        Replacement::Empty => Root::Empty,
                        Replacement::Leaf(e) => Root::Leaf(e),
                        Replacement::Node(n) => Root::Node(n),
                    };
                    HashTrieMap {
                        root: new_root,
                        size: self.size - 1,
                        config: self.config,
                        hasher_builder: self.hasher_builder.clone(),
                    }
                }
            },
        }
    }

    fn shallow_clone(&self) -> HashTrieMap<K, V, P, H> {
        HashTrieMap {
            root: self.root.clone(),
            size: self.size,
            config: self.config,
            hasher_builder: self.hasher_builder.clone(),
        }
    }
}

impl<K, V, P, H> Clone for HashTrieMap<K, V, P, H>
where
    P: SharedPointerKind,
    H: Clone,
{
    fn clone(&self) -> HashTrieMap<K, V, P, H> {
        HashTrieMap {
            root: self.root.clone(),
            size: self.size,
            config: self.config,
            hasher_builder: self.hasher_builder.clone(),
        }
    }
}

impl<'a, K, V, P, H> IntoIterator for &'a HashTrieMap<K, V, P, H>
where
    K: Eq + Hash,
    P: SharedPointerKind,
    H: BuildHasher + Clone,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, P>;

    fn into_iter(self) -> Iter<'a, K, V, P> {
        self.iter()
    }
}

impl<K, V, P, H> PartialEq for HashTrieMap<K, V, P, H>
where
    K: Eq + Hash,
    V: PartialEq,
    P: SharedPointerKind,
    H: BuildHasher + Clone,
{
    /// §4.4 *equals*: same size, and every entry of one found with an
    /// equal value in the other — not a structural comparison of the
    /// underlying trees, which may differ in shape under a different
    /// hasher while still representing the same map.
    fn eq(&self, other: &HashTrieMap<K, V, P, H>) -> bool {
        self.size() == other.size() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, P, H> Eq for HashTrieMap<K, V, P, H>
where
    K: Eq + Hash,
    V: Eq,
    P: SharedPointerKind,
    H: BuildHasher + Clone,
{
}

impl<K, V, P, H> fmt::Debug for HashTrieMap<K, V, P, H>
where
    K: fmt::Debug + Eq + Hash,
    V: fmt::Debug,
    P: SharedPointerKind,
    H: BuildHasher + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, Q: ?Sized, P, H> Index<&Q> for HashTrieMap<K, V, P, H>
where
    K: Eq + Hash + Borrow<Q>,
    Q: Eq + Hash,
    P: SharedPointerKind,
    H: BuildHasher,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        self.get(key).unwrap_or_else(|| panic!("{}", crate::Error::KeyNotFound))
    }
}

impl<K, V, P, H> FromIterator<(K, V)> for HashTrieMap<K, V, P, H>
where
    K: Eq + Hash,
    P: SharedPointerKind,
    H: BuildHasher + Clone + Default,
{
    /// Duplicate keys resolve to the last value seen (§4.4.1).
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> HashTrieMap<K, V, P, H> {
        let mut map = HashTrieMap::new_with_config_and_hasher(Config::default(), H::default());

        for (k, v) in iter {
            map = map.set(k, v);
        }

        map
    }
}

#[cfg(feature = "std")]
impl<K, V, P, H> core::fmt::Display for HashTrieMap<K, V, P, H>
where
    K: fmt::Debug + Eq + Hash,
    V: fmt::Debug,
    P: SharedPointerKind,
    H: BuildHasher + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
