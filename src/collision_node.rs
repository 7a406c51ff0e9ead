/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The collision node: a flat bucket of entries sharing one full hash
//! (§3 "Collision node", §4.3).

use alloc::vec::Vec;
use core::borrow::Borrow;

use archery::{SharedPointer, SharedPointerKind};

use crate::entry::EntryWithHash;
use crate::hash::HashValue;
use crate::node::{DeleteOutcome, Node, Replacement};

/// Terminal node reached only once the hash is fully consumed and two or
/// more keys still share it (§3, §4.3).
///
/// Invariant upheld by construction: `entries.len() >= 2`, all entries
/// hash to `hash`, and no two entries have equal keys.
#[derive(Debug)]
pub(crate) struct CollisionNode<K, V, P: SharedPointerKind> {
    pub(crate) hash: HashValue,
    pub(crate) entries: Vec<EntryWithHash<K, V, P>>,
}

impl<K, V, P: SharedPointerKind> CollisionNode<K, V, P> {
    pub(crate) fn new(hash: HashValue, entries: Vec<EntryWithHash<K, V, P>>) -> CollisionNode<K, V, P> {
        debug_assert!(entries.len() >= 2, "collision node requires at least two entries (§3)");
        CollisionNode { hash, entries }
    }

    pub(crate) fn get<Q: ?Sized>(&self, key: &Q, hash: HashValue) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq,
    {
        debug_assert_eq!(hash, self.hash, "descent only reaches a collision node on a full hash match");

        self.entries.iter().find(|e| e.matches(key, hash)).map(|e| e.value())
    }

    /// Returns the new node and `1` if `entry`'s key was not previously
    /// present, `0` if an existing value was replaced (§4.3 *Insert*).
    pub(crate) fn insert(&self, entry: EntryWithHash<K, V, P>) -> (CollisionNode<K, V, P>, u8)
    where
        K: Eq,
    {
        if entry.hash != self.hash {
            // The caller (node::split) is responsible for ever reaching a
            // collision node with a differing hash; this module never
            // silently mixes two hashes in one bucket (§4.3).
            unreachable!("collision node received an entry with a different hash");
        }

        match self.entries.iter().position(|e| e.matches(entry.key(), entry.hash)) {
            Some(i) => {
                let mut entries = self.entries.clone();
                entries[i] = entry;
                (CollisionNode { hash: self.hash, entries }, 0)
            }
            None => {
                let mut entries = self.entries.clone();
                entries.push(entry);
                (CollisionNode { hash: self.hash, entries }, 1)
            }
        }
    }

    /// §4.3 *Delete*: drops the matching entry. A bucket reduced to one
    /// entry is hoisted as a bare leaf by the caller; it never persists as
    /// a one-entry collision node.
    pub(crate) fn delete<Q: ?Sized>(&self, key: &Q, hash: HashValue) -> DeleteOutcome<K, V, P>
    where
        K: Borrow<Q>,
        Q: Eq,
    {
        match self.entries.iter().position(|e| e.matches(key, hash)) {
            None => DeleteOutcome::Absent,
            Some(i) => {
                if self.entries.len() == 2 {
                    let mut entries = self.entries.clone();
                    let remaining = entries.remove(1 - i);
                    DeleteOutcome::Removed(Replacement::Leaf(remaining))
                } else {
                    let mut entries = self.entries.clone();
                    entries.remove(i);
                    DeleteOutcome::Removed(Replacement::Node(SharedPointer::new(Node::Collision(
                        CollisionNode { hash: self.hash, entries },
                    ))))
                }
            }
        }
    }
}
