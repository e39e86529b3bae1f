use chained_hashmap::{ChainedHashMap, IterError, MapConfig};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

// Drive a cursor over a populated map with a random removal mask and check
// that it visits every entry once, removes exactly the masked ones, and
// leaves the rest reachable.
proptest! {
    #[test]
    fn prop_cursor_removal_mask(
        entries in proptest::collection::btree_map(any::<u16>(), any::<u32>(), 0..120),
        mask in proptest::collection::vec(any::<bool>(), 120),
        buckets in 1usize..16,
    ) {
        let cfg = MapConfig::new().with_bucket_count(buckets);
        let mut m: ChainedHashMap<u16, u32> = ChainedHashMap::with_config(cfg).unwrap();
        m.extend(entries.iter().map(|(k, v)| (*k, *v)));
        let order: Vec<u16> = m.keys().copied().collect();

        let mut visited = Vec::new();
        let mut removed = BTreeMap::new();
        let mut c = m.cursor();
        prop_assert_eq!(c.remaining(), entries.len());
        let mut i = 0;
        while c.has_next() {
            let (k, v) = c.next_entry().unwrap();
            prop_assert_eq!(entries.get(k), Some(v));
            visited.push(*k);
            if mask[i] {
                let (rk, rv) = c.remove().unwrap();
                removed.insert(rk, rv);
                prop_assert_eq!(c.remove(), Err(IterError::NothingToRemove));
            }
            i += 1;
        }
        prop_assert_eq!(c.next_entry().err(), Some(IterError::Exhausted));
        drop(c);

        // Removal during the walk does not change the visit order.
        prop_assert_eq!(visited, order);
        prop_assert_eq!(m.len(), entries.len() - removed.len());
        for (k, v) in &entries {
            if removed.contains_key(k) {
                prop_assert!(!m.contains_key(k));
            } else {
                prop_assert_eq!(m.get(k), Some(v));
            }
        }
        let left: BTreeSet<u16> = m.keys().copied().collect();
        prop_assert_eq!(left.len(), m.len());
    }
}

// Size equals the number of distinct keys after any put/remove sequence.
proptest! {
    #[test]
    fn prop_len_tracks_distinct_keys(ops in proptest::collection::vec((any::<bool>(), 0u8..32), 1..200)) {
        let mut m: ChainedHashMap<u8, usize> = ChainedHashMap::new();
        let mut live = BTreeSet::new();
        for (n, (put, k)) in ops.into_iter().enumerate() {
            if put {
                let prev = m.insert(k, n);
                prop_assert_eq!(prev.is_some(), !live.insert(k));
            } else {
                let prev = m.remove(&k);
                prop_assert_eq!(prev.is_some(), live.remove(&k));
            }
            prop_assert_eq!(m.len(), live.len());
        }
    }
}
