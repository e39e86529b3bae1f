//! ChainedHashMap: the public map over a `BucketTable`, with growth control
//! and a debug reentrancy guard.

use crate::config::MapConfig;
use crate::cursor::Cursor;
use crate::error::ConfigError;
use crate::guard::OpGuard;
use crate::hashing::hash_code;
use crate::table::{BucketTable, Iter, IterMut, Link};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

/// Separate-chaining hash map.
///
/// Colliding keys share a singly linked chain hanging off one bucket; new
/// keys go to the front of their chain. Before every insert the map checks
/// `bucket_count * load_factor < len` and, if so, multiplies the bucket
/// count by the grow factor and relinks all entries.
///
/// Iteration visits buckets in ascending order and each chain newest
/// first. [`cursor`](Self::cursor) walks the same order and can remove
/// the entry it last yielded.
pub struct ChainedHashMap<K, V, S = RandomState> {
    hasher: S,
    config: MapConfig,
    pub(crate) table: BucketTable<K, V>,
    pub(crate) size: usize,
    guard: OpGuard,
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    /// Default sizing (5 buckets, load factor 0.75, grow factor 2).
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_config(config: MapConfig) -> Result<Self, ConfigError> {
        Self::with_config_and_hasher(config, Default::default())
    }
}

impl<K, V> Default for ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_parts(MapConfig::default(), hasher)
    }

    pub fn with_config_and_hasher(config: MapConfig, hasher: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, hasher))
    }

    fn from_parts(config: MapConfig, hasher: S) -> Self {
        Self {
            hasher,
            table: BucketTable::with_slots(config.bucket_count),
            config,
            size: 0,
            guard: OpGuard::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Current table length.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.table.slot_count()
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    fn locate<Q>(&self, q: &Q) -> Option<Link>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = hash_code(&self.hasher, q);
        self.table.locate(hash, q)
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.guard.enter("get");
        let link = self.locate(q)?;
        Some(&self.table.entry(link.id).value)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.guard.enter("get_key_value");
        let link = self.locate(q)?;
        let e = self.table.entry(link.id);
        Some((&e.key, &e.value))
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let link = {
            let _g = self.guard.enter("get_mut");
            self.locate(q)?
        };
        Some(&mut self.table.entry_mut(link.id).value)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.guard.enter("contains_key");
        self.locate(q).is_some()
    }

    /// Insert or replace. Returns the previous value when `key` was present;
    /// in that case the stored key is kept and only the value changes.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let _g = self.guard.enter("insert");

        let table_len = self.table.slot_count();
        if self.config.needs_grow(table_len, self.size) {
            let new_len = table_len.saturating_mul(self.config.grow_factor);
            let before = self.size;
            let relinked = self.table.regrow(new_len);
            debug_assert_eq!(relinked, before, "resize lost or duplicated entries");
            self.size = relinked;
            log::debug!(
                "chained map resized {} -> {} buckets ({} entries)",
                table_len,
                new_len,
                relinked
            );
        }

        let hash = hash_code(&self.hasher, &key);
        if let Some(link) = self.table.locate(hash, &key) {
            let old = &mut self.table.entry_mut(link.id).value;
            return Some(core::mem::replace(old, value));
        }
        self.table.push_head(hash, key, value);
        self.size += 1;
        debug_assert_eq!(self.table.entry_count(), self.size);
        None
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let link = {
            let _g = self.guard.enter("remove");
            self.locate(q)?
        };
        Some(self.unlink(link))
    }

    /// Shared removal path for `remove` and `Cursor::remove`.
    ///
    /// The chain is consistent again before the pair is returned, so drops
    /// of `K`/`V` may touch the map.
    pub(crate) fn unlink(&mut self, link: Link) -> (K, V) {
        let entry = {
            let _g = self.guard.enter("unlink");
            let e = self.table.unlink(link);
            self.size -= 1;
            e
        };
        (entry.key, entry.value)
    }

    /// Remove every entry. The bucket count is left as is.
    pub fn clear(&mut self) {
        let _g = self.guard.enter("clear");
        self.table.clear();
        self.size = 0;
    }

    /// Keep only the entries for which `f` returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut cursor = self.cursor();
        while let Ok((k, v)) = cursor.next_entry_mut() {
            if !f(k, v) {
                let _ = cursor.remove();
            }
        }
    }

    /// A cursor positioned before the first entry.
    ///
    /// The cursor holds the map mutably, so the only structural change
    /// possible while it lives is its own [`Cursor::remove`].
    pub fn cursor(&mut self) -> Cursor<'_, K, V, S> {
        Cursor::new(self)
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.table.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.table.iter_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let reached = self.table.check_chains();
        assert_eq!(reached, self.size, "size disagrees with chain walk");
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> Extend<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::with_hasher(S::default());
        m.extend(iter);
        m
    }
}

impl<K, V, S> fmt::Debug for ChainedHashMap<K, V, S>
where
    K: Eq + Hash + fmt::Debug,
    V: fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
