/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Leaf entries (§3 "Leaf entry").

use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};

use archery::{SharedPointer, SharedPointerKind};

use crate::hash::{hash_key, HashValue};

/// A single (key, value) pair, heap-allocated once and shared by every
/// [`EntryWithHash`] (and therefore every node) that references it.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

impl<K, V> Entry<K, V> {
    #[inline]
    pub(crate) fn new(key: K, value: V) -> Entry<K, V> {
        Entry { key, value }
    }
}

/// A leaf entry tagged with the full hash of its key, so that repeated
/// descents never need to re-hash the key (§3, §4.1).
#[derive(Debug)]
pub(crate) struct EntryWithHash<K, V, P: SharedPointerKind> {
    pub(crate) entry: SharedPointer<Entry<K, V>, P>,
    pub(crate) hash: HashValue,
}

impl<K, V, P: SharedPointerKind> EntryWithHash<K, V, P> {
    pub(crate) fn new<H: BuildHasher>(
        key: K,
        value: V,
        hasher_builder: &H,
        config: crate::config::Config,
    ) -> EntryWithHash<K, V, P>
    where
        K: Hash,
    {
        let hash = hash_key(&key, hasher_builder, config);
        EntryWithHash { entry: SharedPointer::new(Entry::new(key, value)), hash }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.entry.key
    }

    #[inline]
    pub(crate) fn value(&self) -> &V {
        &self.entry.value
    }

    /// True iff this entry is for `key`, using the precomputed hash to
    /// short-circuit before falling back to equality (§3).
    #[inline]
    pub(crate) fn matches<Q: ?Sized>(&self, key: &Q, hash: HashValue) -> bool
    where
        K: Borrow<Q>,
        Q: Eq,
    {
        self.hash == hash && self.key().borrow() == key
    }
}

impl<K, V, P: SharedPointerKind> Clone for EntryWithHash<K, V, P> {
    fn clone(&self) -> EntryWithHash<K, V, P> {
        EntryWithHash { entry: SharedPointer::clone(&self.entry), hash: self.hash }
    }
}

impl<K: PartialEq, V: PartialEq, P: SharedPointerKind> PartialEq for EntryWithHash<K, V, P> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.entry.key == other.entry.key
            && self.entry.value == other.entry.value
    }
}
