/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The node enum tying bitmap and collision nodes together, plus the
//! shared *split* operation and the delete-propagation types (§4.2 §4.3).

use alloc::vec;

use archery::{SharedPointer, SharedPointerKind};

use crate::bitmap_node::BitmapNode;
use crate::collision_node::CollisionNode;
use crate::config::Config;
use crate::entry::EntryWithHash;
use crate::hash::{slice, HashValue};

use core::borrow::Borrow;

/// A trie node below the tree handle: either a branching [`BitmapNode`]
/// or a terminal [`CollisionNode`] (§2, §3).
#[derive(Debug)]
pub(crate) enum Node<K, V, P: SharedPointerKind> {
    Bitmap(BitmapNode<K, V, P>),
    Collision(CollisionNode<K, V, P>),
}

/// What a delete recursion hands back to its caller (§4.2 *Delete*).
#[derive(Debug)]
pub(crate) enum DeleteOutcome<K, V, P: SharedPointerKind> {
    /// The key was not present anywhere below this node.
    Absent,
    /// The key was removed; the caller must substitute `Replacement` for
    /// whatever slot/child pointed here.
    Removed(Replacement<K, V, P>),
}

/// The replacement for a slot/child after a successful delete (§4.2).
#[derive(Debug)]
pub(crate) enum Replacement<K, V, P: SharedPointerKind> {
    /// Nothing is left; the parent must drop the slot entirely.
    Empty,
    /// A single entry survived and should be hoisted in place, bypassing
    /// the node that used to hold it (the *collapse* rule).
    Leaf(EntryWithHash<K, V, P>),
    /// A node (still with ≥ 2 slots, or a collision bucket) survives and
    /// replaces the child in place.
    Node(SharedPointer<Node<K, V, P>, P>),
}

pub(crate) fn get<'a, K, V, P, Q: ?Sized>(
    node: &'a Node<K, V, P>,
    key: &Q,
    hash: HashValue,
    level: u32,
    config: Config,
) -> Option<&'a V>
where
    K: Borrow<Q>,
    Q: Eq,
    P: SharedPointerKind,
{
    match node {
        Node::Bitmap(b) => b.get(key, hash, level, config),
        Node::Collision(c) => c.get(key, hash),
    }
}

pub(crate) fn insert<K, V, P>(
    node: &Node<K, V, P>,
    entry: EntryWithHash<K, V, P>,
    level: u32,
    config: Config,
) -> (Node<K, V, P>, u8)
where
    K: Eq,
    P: SharedPointerKind,
{
    match node {
        Node::Bitmap(b) => {
            let (new_bitmap, delta) = b.insert(entry, level, config);
            (Node::Bitmap(new_bitmap), delta)
        }
        Node::Collision(c) => {
            let (new_collision, delta) = c.insert(entry);
            (Node::Collision(new_collision), delta)
        }
    }
}

pub(crate) fn delete<K, V, P, Q: ?Sized>(
    node: &Node<K, V, P>,
    key: &Q,
    hash: HashValue,
    level: u32,
    config: Config,
) -> DeleteOutcome<K, V, P>
where
    K: Borrow<Q>,
    Q: Eq,
    P: SharedPointerKind,
{
    match node {
        Node::Bitmap(b) => b.delete(key, hash, level, config),
        Node::Collision(c) => c.delete(key, hash),
    }
}

/// Combines two leaves that land in the same branch at `level` into a
/// fresh subtree (§4.2 *Split*). Descends one level at a time, building
/// nested single-slot bitmap nodes for as long as the two hashes keep
/// agreeing, and falls back to a collision node once the hash is fully
/// consumed.
pub(crate) fn split<K, V, P>(
    a: EntryWithHash<K, V, P>,
    b: EntryWithHash<K, V, P>,
    level: u32,
    config: Config,
) -> Node<K, V, P>
where
    K: Eq,
    P: SharedPointerKind,
{
    match slice(a.hash, level, config) {
        None => {
            debug_assert_eq!(
                a.hash, b.hash,
                "distinct hashes cannot both exhaust the trie's depth (§4.2 *Split*)"
            );
            Node::Collision(CollisionNode::new(a.hash, vec![a, b]))
        }
        Some(ia) => {
            let ib = slice(b.hash, level, config)
                .expect("a and b share hash_width, so both exhaust the hash together");

            if ia == ib {
                let child = split(a, b, level + 1, config);
                Node::Bitmap(BitmapNode::single_branch(ia, SharedPointer::new(child)))
            } else {
                Node::Bitmap(BitmapNode::two_leaves(ia, a, ib, b))
            }
        }
    }
}
