#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can walk
// the bucket table directly after every step.

use crate::chained_hash_map::ChainedHashMap;
use crate::config::MapConfig;
use crate::error::IterError;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations: indices shrink toward earlier keys, the pool
// shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
    // Walk with a cursor, removing entries whose value has this low bit.
    CursorSweep(bool),
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            2 => idx.clone().prop_map(Op::Remove),
            2 => idx.clone().prop_map(Op::Get),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(Op::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
            1 => Just(Op::Iterate),
            1 => any::<bool>().prop_map(Op::CursorSweep),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn arb_config() -> impl Strategy<Value = MapConfig> {
    (1usize..8, prop_oneof![Just(0.25), Just(0.75), Just(1.0), Just(3.0)], 2usize..4).prop_map(
        |(b, lf, g)| {
            MapConfig::new()
                .with_bucket_count(b)
                .with_load_factor(lf)
                .with_grow_factor(g)
        },
    )
}

// State-machine equivalence against std::collections::HashMap. After each
// op: `len` matches the model, the chain walk reaches exactly `len`
// entries each in the bucket its hash resolves to, and the table has not
// shrunk.
fn run_state_machine<S: BuildHasher>(
    mut sut: ChainedHashMap<Key, i32, S>,
    pool: Vec<String>,
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Key, i32> = HashMap::new();
    let mut buckets = sut.bucket_count();
    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let k = key_from(&pool, i);
                let prev = sut.insert(k.clone(), v);
                prop_assert_eq!(prev, model.insert(k, v));
            }
            Op::Remove(i) => {
                let k = key_from(&pool, i);
                prop_assert_eq!(sut.remove(&k), model.remove(&k));
            }
            Op::Get(i) => {
                let k = key_from(&pool, i);
                prop_assert_eq!(sut.get(&k), model.get(&k));
            }
            Op::Contains(s) => {
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
            }
            Op::Mutate(i, d) => {
                let k = key_from(&pool, i);
                match (sut.get_mut(&k), model.get_mut(&k)) {
                    (Some(a), Some(b)) => {
                        *a = a.wrapping_add(d);
                        *b = b.wrapping_add(d);
                    }
                    (None, None) => {}
                    _ => prop_assert!(false, "get_mut presence mismatch"),
                }
            }
            Op::Iterate => {
                let seen: BTreeMap<_, _> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let expected: BTreeMap<_, _> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(sut.iter().count(), seen.len(), "iter yielded a key twice");
                prop_assert_eq!(seen, expected);
            }
            Op::CursorSweep(odd) => {
                let mut visited = BTreeSet::new();
                let mut c = sut.cursor();
                while c.has_next() {
                    let (k, v) = c.next_entry().expect("has_next promised an entry");
                    prop_assert!(visited.insert(k.clone()), "cursor yielded a key twice");
                    if ((*v & 1) == 1) == odd {
                        let (rk, rv) = c.remove().expect("fresh yield is removable");
                        prop_assert_eq!(model.remove(&rk), Some(rv));
                        prop_assert_eq!(c.remove(), Err(IterError::NothingToRemove));
                    }
                }
                prop_assert_eq!(c.next_entry().err(), Some(IterError::Exhausted));
                drop(c);
                let model_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert!(model_keys.is_subset(&visited));
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
        }

        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        sut.check_invariants();
        prop_assert!(sut.bucket_count() >= buckets, "bucket table shrank");
        buckets = sut.bucket_count();
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 96, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), cfg in arb_config()) {
        let sut: ChainedHashMap<Key, i32> = ChainedHashMap::with_config(cfg).unwrap();
        run_state_machine(sut, pool, ops)?;
    }
}

// Collision variant using a constant hasher: every key shares one chain,
// so every removal and cursor step exercises interior unlinking.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario(), cfg in arb_config()) {
        let sut: ChainedHashMap<Key, i32, ConstBuildHasher> =
            ChainedHashMap::with_config_and_hasher(cfg, ConstBuildHasher).unwrap();
        run_state_machine(sut, pool, ops)?;
    }
}

// Growth never loses or duplicates entries, whatever the sizing.
proptest! {
    #[test]
    fn prop_growth_preserves_entries(keys in proptest::collection::btree_set(any::<i64>(), 0..200), cfg in arb_config()) {
        let mut m: ChainedHashMap<i64, i64> = ChainedHashMap::with_config(cfg).unwrap();
        for &k in &keys {
            prop_assert_eq!(m.insert(k, !k), None);
            m.check_invariants();
        }
        prop_assert_eq!(m.len(), keys.len());
        for &k in &keys {
            prop_assert_eq!(m.get(&k), Some(&!k));
        }
        let seen: BTreeSet<i64> = m.keys().copied().collect();
        prop_assert_eq!(seen, keys);
    }
}
