/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The bitmap-indexed branching node (§3 "Bitmap node", §4.2).

use alloc::vec;
use alloc::vec::Vec;
use core::borrow::Borrow;

use archery::{SharedPointer, SharedPointerKind};

use crate::config::Config;
use crate::entry::EntryWithHash;
use crate::hash::{slice, HashValue};
use crate::node::{self, DeleteOutcome, Node, Replacement};

/// One occupied branch of a [`BitmapNode`]: either a leaf entry or a
/// reference to a child node (§3).
#[derive(Debug)]
pub(crate) enum Slot<K, V, P: SharedPointerKind> {
    Leaf(EntryWithHash<K, V, P>),
    Branch(SharedPointer<Node<K, V, P>, P>),
}

impl<K, V, P: SharedPointerKind> Clone for Slot<K, V, P> {
    fn clone(&self) -> Slot<K, V, P> {
        match self {
            Slot::Leaf(e) => Slot::Leaf(e.clone()),
            Slot::Branch(c) => Slot::Branch(SharedPointer::clone(c)),
        }
    }
}

/// The common branching node: a 32-bit occupancy bitmap plus a dense
/// array of occupied slots, one per set bit (§3).
///
/// Invariants upheld by construction (never checked defensively, since a
/// violation can only mean a bug in this module — see §7):
///   - `bitmap != 0` (an empty bitmap node is never constructed; the
///     all-empty case lives in [`crate::tree::Root::Empty`] instead).
///   - `slots.len() == bitmap.count_ones()`.
#[derive(Debug)]
pub(crate) struct BitmapNode<K, V, P: SharedPointerKind> {
    pub(crate) bitmap: u32,
    pub(crate) slots: Vec<Slot<K, V, P>>,
}

impl<K, V, P: SharedPointerKind> BitmapNode<K, V, P> {
    pub(crate) fn single_leaf(i: u32, entry: EntryWithHash<K, V, P>) -> BitmapNode<K, V, P> {
        BitmapNode { bitmap: 1 << i, slots: vec![Slot::Leaf(entry)] }
    }

    pub(crate) fn single_branch(
        i: u32,
        child: SharedPointer<Node<K, V, P>, P>,
    ) -> BitmapNode<K, V, P> {
        BitmapNode { bitmap: 1 << i, slots: vec![Slot::Branch(child)] }
    }

    /// Builds a two-slot node for a pair of leaves whose branch indices
    /// differ at this level, ordered by branch index ascending (§4.2
    /// *Split*).
    pub(crate) fn two_leaves(
        ia: u32,
        a: EntryWithHash<K, V, P>,
        ib: u32,
        b: EntryWithHash<K, V, P>,
    ) -> BitmapNode<K, V, P> {
        debug_assert_ne!(ia, ib, "two_leaves requires distinct branch indices");

        let (first_i, first, second_i, second) =
            if ia < ib { (ia, a, ib, b) } else { (ib, b, ia, a) };

        BitmapNode {
            bitmap: (1 << first_i) | (1 << second_i),
            slots: vec![Slot::Leaf(first), Slot::Leaf(second)],
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Dense-array position of branch index `i`'s bit within `bitmap`
    /// (§4.2 "Slot mapping").
    #[inline]
    fn position_for(&self, bit: u32) -> usize {
        (self.bitmap & (bit - 1)).count_ones() as usize
    }

    pub(crate) fn get<Q: ?Sized>(
        &self,
        key: &Q,
        hash: HashValue,
        level: u32,
        config: Config,
    ) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq,
    {
        let i = slice(hash, level, config)
            .expect("bitmap nodes are not produced beyond max_level (§3 invariant)");
        let bit = 1u32 << i;

        if self.bitmap & bit == 0 {
            return None;
        }

        let p = self.position_for(bit);

        match &self.slots[p] {
            Slot::Leaf(e) => {
                if e.matches(key, hash) {
                    Some(e.value())
                } else {
                    None
                }
            }
            Slot::Branch(child) => node::get(child, key, hash, level + 1, config),
        }
    }

    /// Returns the new node and `1` if `entry`'s key was not previously
    /// present, `0` if an existing value was replaced (§4.2 *Insert*).
    pub(crate) fn insert(&self, entry: EntryWithHash<K, V, P>, level: u32, config: Config) -> (BitmapNode<K, V, P>, u8)
    where
        K: Eq,
    {
        debug_assert!(level <= config.max_level(), "bitmap node exists past max_level");

        let i = slice(entry.hash, level, config)
            .expect("bitmap nodes are not produced beyond max_level (§3 invariant)");
        let bit = 1u32 << i;
        let p = self.position_for(bit);

        if self.bitmap & bit == 0 {
            let mut slots = self.slots.clone();
            slots.insert(p, Slot::Leaf(entry));
            return (BitmapNode { bitmap: self.bitmap | bit, slots }, 1);
        }

        match &self.slots[p] {
            Slot::Leaf(existing) if existing.matches(entry.key(), entry.hash) => {
                let mut slots = self.slots.clone();
                slots[p] = Slot::Leaf(entry);
                (BitmapNode { bitmap: self.bitmap, slots }, 0)
            }
            Slot::Leaf(existing) => {
                let new_child = node::split(existing.clone(), entry, level + 1, config);
                let mut slots = self.slots.clone();
                slots[p] = Slot::Branch(SharedPointer::new(new_child));
                (BitmapNode { bitmap: self.bitmap, slots }, 1)
            }
            Slot::Branch(child) => {
                let (new_child, delta) = node::insert(child, entry, level + 1, config);
                let mut slots = self.slots.clone();
                slots[p] = Slot::Branch(SharedPointer::new(new_child));
                (BitmapNode { bitmap: self.bitmap, slots }, delta)
            }
        }
    }

    /// §4.2 *Delete*.
    pub(crate) fn delete<Q: ?Sized>(
        &self,
        key: &Q,
        hash: HashValue,
        level: u32,
        config: Config,
    ) -> DeleteOutcome<K, V, P>
    where
        K: Borrow<Q>,
        Q: Eq,
    {
        let i = slice(hash, level, config)
            .expect("bitmap nodes are not produced beyond max_level (§3 invariant)");
        let bit = 1u32 << i;

        if self.bitmap & bit == 0 {
            return DeleteOutcome::Absent;
        }

        let p = self.position_for(bit);

        match &self.slots[p] {
            Slot::Leaf(e) => {
                if e.matches(key, hash) {
                    self.drop_slot(p, bit)
                } else {
                    DeleteOutcome::Absent
                }
            }
            Slot::Branch(child) => match node::delete(child, key, hash, level + 1, config) {
                DeleteOutcome::Absent => DeleteOutcome::Absent,
                DeleteOutcome::Removed(Replacement::Empty) => self.drop_slot(p, bit),
                DeleteOutcome::Removed(Replacement::Leaf(x)) => {
                    if self.slots.len() == 1 {
                        // This node would be left holding nothing but a bare
                        // leaf; it must not persist as a degenerate
                        // single-slot node, so the leaf is hoisted further.
                        DeleteOutcome::Removed(Replacement::Leaf(x))
                    } else {
                        let mut slots = self.slots.clone();
                        slots[p] = Slot::Leaf(x);
                        DeleteOutcome::Removed(Replacement::Node(SharedPointer::new(
                            Node::Bitmap(BitmapNode { bitmap: self.bitmap, slots }),
                        )))
                    }
                }
                DeleteOutcome::Removed(Replacement::Node(x)) => {
                    let mut slots = self.slots.clone();
                    slots[p] = Slot::Branch(x);
                    DeleteOutcome::Removed(Replacement::Node(SharedPointer::new(Node::Bitmap(
                        BitmapNode { bitmap: self.bitmap, slots },
                    ))))
                }
            },
        }
    }

    /// Removes the slot at dense position `p` (branch bit `bit`),
    /// applying the collapse rule: 1 remaining slot total → empty, 2 → the
    /// sibling slot is hoisted in place of this node, ≥ 3 → the slot is
    /// simply dropped (§4.2 *Delete*, the "collapse" paragraph).
    fn drop_slot(&self, p: usize, bit: u32) -> DeleteOutcome<K, V, P> {
        match self.slots.len() {
            1 => DeleteOutcome::Removed(Replacement::Empty),
            2 => {
                let other = &self.slots[1 - p];
                let replacement = match other {
                    Slot::Leaf(e) => Replacement::Leaf(e.clone()),
                    Slot::Branch(c) => Replacement::Node(SharedPointer::clone(c)),
                };
                DeleteOutcome::Removed(replacement)
            }
            _ => {
                let mut slots = self.slots.clone();
                slots.remove(p);
                DeleteOutcome::Removed(Replacement::Node(SharedPointer::new(Node::Bitmap(
                    BitmapNode { bitmap: self.bitmap & !bit, slots },
                ))))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use archery::RcK;

    fn entry(k: u32, v: u32, hash: HashValue) -> EntryWithHash<u32, u32, RcK> {
        // Builds an entry with an explicit hash rather than going through
        // `EntryWithHash::new`, exactly as a white-box test needs to in
        // order to manufacture hash collisions on demand (§8.1).
        let e = crate::entry::Entry::new(k, v);
        EntryWithHash { entry: SharedPointer::new(e), hash }
    }

    #[test]
    fn single_leaf_roundtrips() {
        let config = Config::default();
        let node: BitmapNode<u32, u32, RcK> = BitmapNode::single_leaf(3, entry(1, 10, 3));
        assert_eq!(node.get(&1, 3, 0, config), Some(&10));
        assert_eq!(node.get(&2, 3, 0, config), None);
    }

    #[test]
    fn insert_grows_and_overrides() {
        let config = Config::default();
        let node: BitmapNode<u32, u32, RcK> = BitmapNode::single_leaf(3, entry(1, 10, 3));

        let (node, delta) = node.insert(entry(2, 20, 3 | (1 << 5)), 0, config);
        assert_eq!(delta, 1);
        assert_eq!(node.get(&1, 3, 0, config), Some(&10));
        assert_eq!(node.get(&2, 3 | (1 << 5), 0, config), Some(&20));

        let (node, delta) = node.insert(entry(1, 99, 3), 0, config);
        assert_eq!(delta, 0);
        assert_eq!(node.get(&1, 3, 0, config), Some(&99));
    }
}
