//! Cursor: explicit-protocol traversal that can remove what it yields.

use crate::chained_hash_map::ChainedHashMap;
use crate::error::IterError;
use crate::table::Link;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

/// Walks a [`ChainedHashMap`] bucket by bucket, each chain front to back.
///
/// Protocol: [`has_next`](Self::has_next) reports whether another entry
/// remains; [`next_entry`](Self::next_entry) yields it; [`remove`](Self::remove)
/// unlinks the entry yielded last, at most once per `next_entry`.
///
/// ```
/// use chained_hashmap::{ChainedHashMap, IterError};
///
/// let mut m = ChainedHashMap::new();
/// m.insert("x", 1);
/// let mut c = m.cursor();
/// assert_eq!(c.next_entry(), Ok((&"x", &1)));
/// assert_eq!(c.remove(), Ok(("x", 1)));
/// assert_eq!(c.remove(), Err(IterError::NothingToRemove));
/// assert_eq!(c.next_entry(), Err(IterError::Exhausted));
/// drop(c);
/// assert!(m.is_empty());
/// ```
pub struct Cursor<'a, K, V, S = RandomState> {
    map: &'a mut ChainedHashMap<K, V, S>,
    // Entry the next call to `next_entry` yields, with its predecessor.
    upcoming: Option<Link>,
    // Entry yielded last and not yet removed. `Some` is the removable state.
    yielded: Option<Link>,
}

impl<'a, K, V, S> Cursor<'a, K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub(crate) fn new(map: &'a mut ChainedHashMap<K, V, S>) -> Self {
        let upcoming = map.table.first_from(0);
        Self {
            map,
            upcoming,
            yielded: None,
        }
    }

    #[inline]
    pub fn has_next(&self) -> bool {
        self.upcoming.is_some()
    }

    /// Whether `remove` would succeed right now.
    #[inline]
    pub fn can_remove(&self) -> bool {
        self.yielded.is_some()
    }

    fn advance(&mut self) -> Result<Link, IterError> {
        let link = self.upcoming.ok_or(IterError::Exhausted)?;
        self.upcoming = self.map.table.after(link);
        self.yielded = Some(link);
        Ok(link)
    }

    /// Yield the next entry.
    ///
    /// Fails with [`IterError::Exhausted`] once every entry has been seen;
    /// the cursor is unchanged by the failure.
    pub fn next_entry(&mut self) -> Result<(&K, &V), IterError> {
        let link = self.advance()?;
        let e = self.map.table.entry(link.id);
        Ok((&e.key, &e.value))
    }

    /// Like [`next_entry`](Self::next_entry) with mutable access to the value.
    pub fn next_entry_mut(&mut self) -> Result<(&K, &mut V), IterError> {
        let link = self.advance()?;
        let e = self.map.table.entry_mut(link.id);
        Ok((&e.key, &mut e.value))
    }

    /// Unlink the entry yielded last and return it.
    ///
    /// Fails with [`IterError::NothingToRemove`] before the first
    /// `next_entry` and after a `remove` for the same position.
    pub fn remove(&mut self) -> Result<(K, V), IterError> {
        let link = self.yielded.take().ok_or(IterError::NothingToRemove)?;
        // The entry after the removed one inherits its predecessor.
        if let Some(up) = self.upcoming.as_mut() {
            if up.prev == Some(link.id) {
                up.prev = link.prev;
            }
        }
        log::trace!("cursor removing entry from bucket {}", link.slot);
        Ok(self.map.unlink(link))
    }

    /// Entries left to yield.
    pub fn remaining(&self) -> usize {
        let mut n = 0;
        let mut cur = self.upcoming;
        while let Some(l) = cur {
            n += 1;
            cur = self.map.table.after(l);
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;
    use std::collections::BTreeMap;
    use std::hash::{BuildHasherDefault, Hasher};

    #[derive(Default)]
    struct Identity(u64);
    impl Hasher for Identity {
        fn write(&mut self, _bytes: &[u8]) {
            unimplemented!("identity hasher only takes integers")
        }
        fn write_i32(&mut self, n: i32) {
            self.0 = n as u32 as u64;
        }
        fn finish(&self) -> u64 {
            self.0
        }
    }

    fn identity_map(keys: &[i32]) -> ChainedHashMap<i32, i32, BuildHasherDefault<Identity>> {
        // Large enough that none of these tests resize.
        let cfg = MapConfig::new().with_bucket_count(5).with_load_factor(100.0);
        let mut m = ChainedHashMap::with_config_and_hasher(cfg, Default::default()).unwrap();
        for &k in keys {
            m.insert(k, k * 10);
        }
        m
    }

    fn drain_keys<S: BuildHasher>(c: &mut Cursor<'_, i32, i32, S>) -> Vec<i32> {
        let mut out = Vec::new();
        while c.has_next() {
            out.push(*c.next_entry().unwrap().0);
        }
        out
    }

    #[test]
    fn empty_map_is_exhausted_immediately() {
        let mut m: ChainedHashMap<String, i32> = ChainedHashMap::new();
        let mut c = m.cursor();
        assert!(!c.has_next());
        assert_eq!(c.remaining(), 0);
        assert_eq!(c.next_entry(), Err(IterError::Exhausted));
        assert_eq!(c.remove(), Err(IterError::NothingToRemove));
    }

    #[test]
    fn visits_slot_then_chain_order() {
        // Slots of 5: 1 <- [11, 6, 1], 3 <- [3], 4 <- [9, 4]
        let mut m = identity_map(&[1, 6, 11, 4, 9, 3]);
        let mut c = m.cursor();
        assert_eq!(c.remaining(), 6);
        assert_eq!(drain_keys(&mut c), vec![11, 6, 1, 3, 9, 4]);
        assert_eq!(c.next_entry(), Err(IterError::Exhausted));
    }

    #[test]
    fn remove_before_next_is_rejected() {
        let mut m = identity_map(&[1, 2]);
        let mut c = m.cursor();
        assert!(!c.can_remove());
        assert_eq!(c.remove(), Err(IterError::NothingToRemove));
        // The failed remove does not disturb traversal.
        assert_eq!(drain_keys(&mut c), vec![1, 2]);
        drop(c);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn remove_twice_is_rejected() {
        let mut m = identity_map(&[7]);
        let mut c = m.cursor();
        assert_eq!(c.next_entry(), Ok((&7, &70)));
        assert_eq!(c.remove(), Ok((7, 70)));
        assert_eq!(c.remove(), Err(IterError::NothingToRemove));
        assert!(!c.has_next());
        drop(c);
        assert!(!m.contains_key(&7));
        assert_eq!(m.len(), 0);
        m.check_invariants();
    }

    /// Removing any position of a chain (head, middle, tail) keeps the rest
    /// of the traversal intact and each chain well formed.
    #[test]
    fn removal_at_every_chain_position() {
        let all = [1, 6, 11, 16, 2];
        // Chain in slot 1 is [16, 11, 6, 1].
        for victim in [16, 11, 6, 1, 2] {
            let mut m = identity_map(&all);
            let mut c = m.cursor();
            let mut seen = Vec::new();
            while c.has_next() {
                let k = *c.next_entry().unwrap().0;
                seen.push(k);
                if k == victim {
                    assert_eq!(c.remove(), Ok((k, k * 10)));
                }
            }
            assert_eq!(seen, vec![16, 11, 6, 1, 2]);
            drop(c);
            assert_eq!(m.len(), 4);
            assert!(!m.contains_key(&victim));
            m.check_invariants();
        }
    }

    /// Removing consecutive entries updates the predecessor each time.
    #[test]
    fn remove_every_entry_while_walking() {
        let mut m = identity_map(&[1, 6, 11, 16, 2, 7, 3]);
        let mut c = m.cursor();
        let mut removed = BTreeMap::new();
        while c.has_next() {
            c.next_entry().unwrap();
            let (k, v) = c.remove().unwrap();
            removed.insert(k, v);
        }
        drop(c);
        assert_eq!(removed.len(), 7);
        assert!(m.is_empty());
        assert_eq!(m.iter().count(), 0);
        m.check_invariants();
    }

    #[test]
    fn remove_alternate_entries() {
        let mut m = identity_map(&[1, 6, 11, 16, 21, 2]);
        let mut c = m.cursor();
        let mut i = 0;
        while c.has_next() {
            c.next_entry().unwrap();
            if i % 2 == 0 {
                c.remove().unwrap();
            }
            i += 1;
        }
        drop(c);
        // Walk order [21, 16, 11, 6, 1, 2]; even positions removed.
        let left: Vec<_> = m.keys().copied().collect();
        assert_eq!(left, vec![16, 6, 2]);
        m.check_invariants();
    }

    #[test]
    fn next_entry_mut_writes_through() {
        let mut m = identity_map(&[1, 2, 3]);
        let mut c = m.cursor();
        while let Ok((_, v)) = c.next_entry_mut() {
            *v += 1;
        }
        drop(c);
        assert_eq!(m.get(&2), Some(&21));
    }

    #[test]
    fn next_after_exhaustion_keeps_failing() {
        let mut m = identity_map(&[4]);
        let mut c = m.cursor();
        c.next_entry().unwrap();
        for _ in 0..3 {
            assert_eq!(c.next_entry(), Err(IterError::Exhausted));
        }
        // The last yielded entry is still removable after a failed next.
        assert_eq!(c.remove(), Ok((4, 40)));
    }
}
