//! Bucket table: slot heads plus an arena of singly linked entries.
//!
//! Entries live in a `SlotMap` and chain to each other by `EntryId`, so a
//! relink during growth moves a link, never an entry. Each entry belongs
//! to exactly one chain, and `bucket_index(entry.hash, slots.len())` is
//! the slot that chain hangs off.

use crate::hashing::bucket_index;
use core::borrow::Borrow;
use core::iter::FusedIterator;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable arena key for one entry.
    pub(crate) struct EntryId;
}

#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: i32,
    pub(crate) next: Option<EntryId>,
}

/// Position of an entry: its slot, itself, and its chain predecessor
/// (`None` when it is the head).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Link {
    pub(crate) slot: usize,
    pub(crate) id: EntryId,
    pub(crate) prev: Option<EntryId>,
}

pub(crate) struct BucketTable<K, V> {
    slots: Vec<Option<EntryId>>,
    entries: SlotMap<EntryId, Entry<K, V>>,
}

impl<K, V> BucketTable<K, V> {
    pub(crate) fn with_slots(len: usize) -> Self {
        debug_assert!(len > 0);
        Self {
            slots: vec![None; len],
            entries: SlotMap::with_key(),
        }
    }

    #[inline]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn entry_count(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn entry(&self, id: EntryId) -> &Entry<K, V> {
        &self.entries[id]
    }

    #[inline]
    pub(crate) fn entry_mut(&mut self, id: EntryId) -> &mut Entry<K, V> {
        &mut self.entries[id]
    }

    /// Scan the chain `hash` resolves to for a key equal to `q`.
    pub(crate) fn locate<Q>(&self, hash: i32, q: &Q) -> Option<Link>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let slot = bucket_index(hash, self.slots.len());
        let mut prev = None;
        let mut cur = self.slots[slot];
        while let Some(id) = cur {
            let e = &self.entries[id];
            if e.hash == hash && e.key.borrow() == q {
                return Some(Link { slot, id, prev });
            }
            prev = Some(id);
            cur = e.next;
        }
        None
    }

    /// Prepend a new entry to the chain `hash` resolves to.
    pub(crate) fn push_head(&mut self, hash: i32, key: K, value: V) -> EntryId {
        let slot = bucket_index(hash, self.slots.len());
        let next = self.slots[slot];
        let id = self.entries.insert(Entry {
            key,
            value,
            hash,
            next,
        });
        self.slots[slot] = Some(id);
        id
    }

    /// Detach the entry at `link` and hand it back.
    ///
    /// Head and interior entries go through the same path: whoever points
    /// at the entry (the slot or the predecessor) takes over its successor.
    pub(crate) fn unlink(&mut self, link: Link) -> Entry<K, V> {
        let next = self.entries[link.id].next;
        match link.prev {
            None => {
                debug_assert_eq!(self.slots[link.slot], Some(link.id));
                self.slots[link.slot] = next;
            }
            Some(p) => {
                debug_assert_eq!(self.entries[p].next, Some(link.id));
                self.entries[p].next = next;
            }
        }
        let mut e = self
            .entries
            .remove(link.id)
            .expect("linked entry must be live in the arena");
        e.next = None;
        e
    }

    /// Head of the first non-empty slot at or after `from`.
    pub(crate) fn first_from(&self, from: usize) -> Option<Link> {
        self.slots
            .iter()
            .enumerate()
            .skip(from)
            .find_map(|(slot, head)| head.map(|id| Link { slot, id, prev: None }))
    }

    /// The position that follows `link` in slot-then-chain order.
    pub(crate) fn after(&self, link: Link) -> Option<Link> {
        match self.entries[link.id].next {
            Some(id) => Some(Link {
                slot: link.slot,
                id,
                prev: Some(link.id),
            }),
            None => self.first_from(link.slot + 1),
        }
    }

    /// Replace the slot array with one of `new_len` slots and relink every
    /// entry into it by its stored hash. Returns how many were relinked.
    pub(crate) fn regrow(&mut self, new_len: usize) -> usize {
        let old = core::mem::replace(&mut self.slots, vec![None; new_len]);
        let mut relinked = 0;
        for head in old {
            let mut cur = head;
            while let Some(id) = cur {
                let e = &mut self.entries[id];
                cur = e.next.take();
                let slot = bucket_index(e.hash, new_len);
                e.next = self.slots[slot].replace(id);
                relinked += 1;
            }
        }
        relinked
    }

    /// Drop every entry, keeping the current slot count.
    pub(crate) fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.entries.clear();
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            table: self,
            next_slot: 0,
            cur: None,
            remaining: self.entries.len(),
        }
    }

    pub(crate) fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.entries.values_mut(),
        }
    }

    /// Walk every chain once and check slot placement, link uniqueness and
    /// arena agreement. Returns the number of entries reached.
    #[cfg(test)]
    pub(crate) fn check_chains(&self) -> usize {
        let mut seen = std::collections::HashSet::new();
        for (slot, head) in self.slots.iter().enumerate() {
            let mut cur = *head;
            while let Some(id) = cur {
                let e = self.entries.get(id).expect("chain links to a live entry");
                assert_eq!(bucket_index(e.hash, self.slots.len()), slot);
                assert!(seen.insert(id), "entry reachable twice");
                cur = e.next;
            }
        }
        assert_eq!(seen.len(), self.entries.len(), "arena holds unlinked entries");
        seen.len()
    }
}

/// Borrowing iterator in slot order, newest-first within each chain.
pub struct Iter<'a, K, V> {
    table: &'a BucketTable<K, V>,
    next_slot: usize,
    cur: Option<EntryId>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let table = self.table;
        loop {
            if let Some(id) = self.cur {
                let e = &table.entries[id];
                self.cur = e.next;
                self.remaining -= 1;
                return Some((&e.key, &e.value));
            }
            let head = table.slots.get(self.next_slot)?;
            self.cur = *head;
            self.next_slot += 1;
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            table: self.table,
            next_slot: self.next_slot,
            cur: self.cur,
            remaining: self.remaining,
        }
    }
}

/// Mutable iterator. Visits entries in arena order, which is unrelated to
/// slot order.
pub struct IterMut<'a, K, V> {
    it: slotmap::basic::ValuesMut<'a, EntryId, Entry<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|e| (&e.key, &mut e.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
