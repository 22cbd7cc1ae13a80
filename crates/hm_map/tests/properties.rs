use std::collections::HashMap;

use hm_map::{ChainedMap, GrowthPolicy, HasherKind, Map, OpenAddressingMap};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Put(String, i32),
    Remove(String),
    Resize(usize),
    Clear,
}

// Short keys over a small alphabet collide a lot under the additive hash.
fn key() -> impl Strategy<Value = String> {
    "[a-e]{1,3}"
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (key(), any::<i32>()).prop_map(|(k, v)| Op::Put(k, v)),
        3 => key().prop_map(Op::Remove),
        1 => (1_usize..64).prop_map(Op::Resize),
        1 => Just(Op::Clear),
    ]
}

fn hasher() -> impl Strategy<Value = HasherKind> {
    prop_oneof![
        Just(HasherKind::Additive),
        Just(HasherKind::Positional),
        Just(HasherKind::Ahash),
    ]
}

fn growth() -> impl Strategy<Value = GrowthPolicy> {
    prop_oneof![Just(GrowthPolicy::Double), Just(GrowthPolicy::DoublePrime)]
}

/// Apply `ops` to `map` and to a `HashMap` model, comparing after each step.
fn check_against_model<M: Map<i32>>(map: &mut M, ops: Vec<Op>, after_op: impl Fn(&M, &Op)) {
    let mut model = HashMap::new();

    for op in ops {
        match &op {
            Op::Put(k, v) => {
                assert_eq!(map.put(k, *v), model.insert(k.clone(), *v), "{op:?}");
            }
            Op::Remove(k) => {
                assert_eq!(map.remove(k), model.remove(k), "{op:?}");
            }
            Op::Resize(capacity) => map.resize_table(*capacity),
            Op::Clear => {
                map.clear();
                model.clear();
            }
        }

        assert_eq!(map.len(), model.len(), "{op:?}");
        for (k, v) in &model {
            assert_eq!(map.get(k), Some(v), "{op:?}: {k}");
            assert!(map.contains_key(k), "{op:?}: {k}");
        }

        let mut keys = map.get_keys();
        keys.sort_unstable();
        let mut expected: Vec<_> = model.keys().map(String::as_str).collect();
        expected.sort_unstable();
        assert_eq!(keys, expected, "{op:?}");

        after_op(map, &op);
    }
}

proptest! {
    #[test]
    fn open_addressing_matches_model(
        capacity in 1_usize..32,
        hasher in hasher(),
        growth in growth(),
        ops in prop::collection::vec(op(), 1..200),
    ) {
        let mut map = OpenAddressingMap::new(capacity, hasher).unwrap().with_growth(growth);

        check_against_model(&mut map, ops, |map, op| {
            assert_eq!(map.empty_buckets() + map.len(), map.capacity());
            if matches!(op, Op::Put(..)) {
                assert!(map.table_load() < 1.0, "load: {}", map.table_load());
            }
        });
    }

    #[test]
    fn chained_matches_model(
        capacity in 1_usize..32,
        hasher in hasher(),
        ops in prop::collection::vec(op(), 1..200),
    ) {
        let mut map = ChainedMap::new(capacity, hasher).unwrap();

        check_against_model(&mut map, ops, |map, op| {
            if let Op::Resize(capacity) = op {
                assert_eq!(map.capacity(), *capacity);
            }
            assert!(map.empty_buckets() <= map.capacity());
        });
    }

    #[test]
    fn resize_preserves_membership(
        keys in prop::collection::hash_set(key(), 0..40),
        removed in prop::collection::hash_set(key(), 0..10),
        new_capacity in 1_usize..128,
    ) {
        let mut open = OpenAddressingMap::new(7, HasherKind::Additive).unwrap();
        let mut chained = ChainedMap::new(7, HasherKind::Additive).unwrap();

        for (i, k) in keys.iter().enumerate() {
            open.put(k, i);
            chained.put(k, i);
        }
        for k in &removed {
            open.remove(k);
            chained.remove(k);
        }

        let probes: Vec<_> = keys.iter().chain(&removed).cloned().collect();
        let before_open: Vec<_> = probes.iter().map(|k| open.get(k).copied()).collect();
        let before_chained: Vec<_> = probes.iter().map(|k| chained.get(k).copied()).collect();

        let len = open.len();
        open.resize_table(new_capacity);
        chained.resize_table(new_capacity);

        if new_capacity >= len {
            prop_assert!(open.capacity() >= new_capacity);
        }
        prop_assert_eq!(chained.capacity(), new_capacity);

        let after_open: Vec<_> = probes.iter().map(|k| open.get(k).copied()).collect();
        let after_chained: Vec<_> = probes.iter().map(|k| chained.get(k).copied()).collect();
        prop_assert_eq!(before_open, after_open);
        prop_assert_eq!(before_chained, after_chained);
    }
}

#[test]
fn open_addressing_doubles_through_150_inserts() {
    let mut map = OpenAddressingMap::new(50, HasherKind::Additive).unwrap();
    for i in 0..150 {
        map.put(&format!("str{i}"), i * 100);
    }

    assert_eq!(map.len(), 150);
    assert!(map.capacity() >= 300);
    assert_eq!(map.get("str77"), Some(&7700));
}

#[test]
fn both_variants_survive_resize() {
    let variants: Vec<Box<dyn Map<i32>>> = vec![
        Box::new(OpenAddressingMap::new(20, HasherKind::Additive).unwrap()),
        Box::new(ChainedMap::new(20, HasherKind::Additive).unwrap()),
    ];

    for mut map in variants {
        map.put("key1", 10);
        assert_eq!(map.get("key1"), Some(&10));
        assert!(map.contains_key("key1"));

        map.resize_table(30);
        assert_eq!(map.capacity(), 30);
        assert_eq!(map.get("key1"), Some(&10));
        assert!(map.contains_key("key1"));
    }
}
