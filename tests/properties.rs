/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Black-box tests: the quantified invariants and concrete scenarios of
//! §8, driven purely through the public `HashTrieMap` surface.

use std::collections::BTreeSet;
use std::hash::{BuildHasher, Hasher};

use archery::RcK;
use hamt::{Config, HashTrieMap};
use proptest::prelude::*;

fn from_pairs(pairs: &[(i32, i32)]) -> HashTrieMap<i32, i32> {
    pairs.iter().fold(HashTrieMap::new(), |m, &(k, v)| m.set(k, v))
}

fn small_pairs() -> impl Strategy<Value = Vec<(i32, i32)>> {
    prop::collection::vec((0i32..64, any::<i32>()), 0..64)
}

proptest! {
    #[test]
    fn get_after_set(pairs in small_pairs(), k in 0i32..64, v in any::<i32>()) {
        let t = from_pairs(&pairs).set(k, v);
        prop_assert_eq!(t.get(&k), Some(&v));
    }

    #[test]
    fn set_overrides(pairs in small_pairs(), k in 0i32..64, v1 in any::<i32>(), v2 in any::<i32>()) {
        let base = from_pairs(&pairs);
        let once = base.set(k, v1);
        let twice = once.set(k, v2);
        prop_assert_eq!(twice.get(&k), Some(&v2));
        prop_assert_eq!(twice.size(), once.size());
    }

    #[test]
    fn delete_removes(pairs in small_pairs(), k in 0i32..64, v in any::<i32>()) {
        let t = from_pairs(&pairs).set(k, v).delete(&k);
        prop_assert!(!t.contains_key(&k));
    }

    #[test]
    fn delete_on_absent_is_identity(pairs in small_pairs(), k in 64i32..128) {
        let t = from_pairs(&pairs);
        prop_assert!(!t.contains_key(&k));
        let after = t.delete(&k);
        prop_assert_eq!(after.size(), t.size());
        prop_assert_eq!(&after, &t);
    }

    #[test]
    fn size_law(pairs in small_pairs(), k in 0i32..64, v in any::<i32>()) {
        let t = from_pairs(&pairs);
        let had_k = t.contains_key(&k);

        let after_set = t.set(k, v);
        prop_assert_eq!(after_set.size(), t.size() + if had_k { 0 } else { 1 });

        let after_delete = t.delete(&k);
        prop_assert_eq!(after_delete.size(), t.size() - if had_k { 1 } else { 0 });
    }

    #[test]
    fn persistence(pairs in small_pairs(), k in 0i32..64, v in any::<i32>(), k2 in 0i32..64, v2 in any::<i32>()) {
        let t = from_pairs(&pairs);
        let before = t.get(&k).copied();

        let t2 = t.set(k, v);
        let _ = t2.set(k2, v2).delete(&k2);

        prop_assert_eq!(t.get(&k).copied(), before);
    }

    #[test]
    fn canonicality(pairs in small_pairs()) {
        let forward = from_pairs(&pairs);

        let mut reversed = pairs.clone();
        reversed.reverse();
        let backward = from_pairs(&reversed);

        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn iteration_completeness(pairs in small_pairs()) {
        let t = from_pairs(&pairs);

        let expected: BTreeSet<i32> = pairs.iter().map(|&(k, _)| k).collect();
        let actual: BTreeSet<i32> = t.iter().map(|(k, _)| *k).collect();

        prop_assert_eq!(t.iter().count(), t.size());
        prop_assert_eq!(actual, expected);
    }
}

/// A deliberately degenerate hasher returning the same value for every
/// key, forcing every entry into one collision node (§8 invariant 9, S4).
#[derive(Clone, Default)]
struct ConstantBuildHasher;

struct ConstantHasher;

impl BuildHasher for ConstantBuildHasher {
    type Hasher = ConstantHasher;

    fn build_hasher(&self) -> ConstantHasher {
        ConstantHasher
    }
}

impl Hasher for ConstantHasher {
    fn write(&mut self, _bytes: &[u8]) {}

    fn finish(&self) -> u64 {
        0
    }
}

#[test]
fn collision_correctness_under_a_constant_hash() {
    let mut t: HashTrieMap<i32, i32, RcK, ConstantBuildHasher> =
        HashTrieMap::new_with_config_and_hasher(Config::default(), ConstantBuildHasher);

    for k in 0..16 {
        t = t.set(k, k * 10);
    }
    assert_eq!(t.size(), 16);

    for k in 0..16 {
        assert_eq!(t.get(&k), Some(&(k * 10)));
    }

    for k in 0..15 {
        t = t.delete(&k);
        assert_eq!(t.size(), (15 - k) as usize);
    }
    assert_eq!(t.get(&15), Some(&150));

    t = t.delete(&15);
    assert!(t.is_empty());
}

#[test]
fn s1_three_inserts() {
    let t: HashTrieMap<&str, i32> =
        HashTrieMap::new().set("a", 1).set("b", 2).set("c", 3);

    assert_eq!(t.size(), 3);
    assert_eq!(t.get("b"), Some(&2));

    let mut seen: Vec<(&str, i32)> = t.iter().map(|(k, v)| (*k, *v)).collect();
    seen.sort();
    assert_eq!(seen, vec![("a", 1), ("b", 2), ("c", 3)]);
}

#[test]
fn s2_set_twice_same_key() {
    let t: HashTrieMap<&str, i32> = HashTrieMap::new().set("x", 1).set("x", 2);
    assert_eq!(t.size(), 1);
    assert_eq!(t.get("x"), Some(&2));
}

#[test]
fn s3_build_from_iter_then_delete() {
    let t: HashTrieMap<&str, i32> =
        [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
    let t = t.delete("b");

    assert_eq!(t.size(), 2);
    assert!(!t.contains_key("b"));
    assert!(t.contains_key("a"));
    assert_eq!(t.get("c"), Some(&3));
}

#[test]
fn s4_sixteen_keys_one_collision_bucket() {
    let mut t: HashTrieMap<i32, i32, RcK, ConstantBuildHasher> =
        HashTrieMap::new_with_config_and_hasher(Config::default(), ConstantBuildHasher);
    for k in 0..16 {
        t = t.set(k, k);
    }

    for k in 0..15 {
        t = t.delete(&k);
    }
    assert_eq!(t.size(), 1);
    assert_eq!(t.get(&15), Some(&15));

    t = t.delete(&15);
    assert!(t.is_empty());
}

#[test]
fn s5_ten_thousand_keys_and_five_hundred_variants() {
    let base: HashTrieMap<i32, i32> = (0..10_000).map(|i| (i, i)).collect();
    assert_eq!(base.size(), 10_000);

    for v in 0..500 {
        let variant = base.set(10_000 + v, v);
        assert_eq!(variant.size(), 10_001);
        assert_eq!(base.size(), 10_000);
        assert_eq!(base.get(&(10_000 + v)), None);
    }
}

#[test]
fn s6_sibling_leaves_collapse_on_delete() {
    // The exact "two leaves sharing a level-0 branch but diverging at
    // level 1" shape is exercised directly, with controlled hashes, by
    // `node::tests::split_builds_nested_branches_for_shared_prefixes`.
    // This black-box scenario checks the same collapse rule's externally
    // observable consequence: deleting one key out of a larger tree must
    // always yield a tree structurally indistinguishable (by `equals`)
    // from one built directly from the surviving keys, regardless of
    // which single-slot bitmap nodes happen to collapse along the way.
    let with_all: HashTrieMap<i32, i32> = (0..3000).map(|i| (i, i)).collect();
    let without_one: HashTrieMap<i32, i32> =
        (0..3000).filter(|&i| i != 1500).map(|i| (i, i)).collect();

    assert_eq!(with_all.delete(&1500), without_one);
}
