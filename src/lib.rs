//! chained-hashmap: a single-threaded hash map built on separate chaining,
//! with a cursor that can remove entries mid-traversal.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a map whose structural invariants (chain integrity across
//!   growth, size accounting, removal during traversal) are small enough
//!   to check by walking the table.
//! - Layers:
//!   - `hashing`: folds a `BuildHasher` digest to an `i32` code and maps
//!     codes to bucket slots.
//!   - `BucketTable<K, V>`: slot heads plus a `SlotMap` arena of entries
//!     linked by `EntryId`. Owns chain scan, head insertion, unlink and
//!     regrow.
//!   - `ChainedHashMap<K, V, S>`: public API; decides when to grow and
//!     keeps `len`.
//!   - `Cursor`: `has_next`/`next_entry`/`remove` traversal routed through
//!     the same unlink as `ChainedHashMap::remove`.
//!
//! Constraints
//! - Single-threaded; no interior locking.
//! - Each entry stores its hash code, computed once on insert. Growth
//!   relinks by the stored code and never calls `K: Hash`.
//! - Chains are arena links, so an entry is in exactly one chain and a
//!   relink moves a key, never an entry.
//! - A cursor borrows the map mutably; the only mutation possible while it
//!   lives is its own `remove`.
//!
//! Ordering
//! - Buckets are visited in ascending slot order; within a bucket, newest
//!   insert first. Unrelated keys have no defined relative order.
//! - `iter_mut` walks the arena and does not follow bucket order.
//!
//! Reentrancy policy
//! - Map methods call user code only through `K: Eq`/`K: Hash` while
//!   probing. In debug builds, re-entering the map from those impls panics.
//!   Removed keys and values are handed back after the chain is relinked,
//!   so their `Drop` may use the map.
//!
//! Notes and non-goals
//! - No null keys; use `Option<K>` keys if an absent key is needed.
//! - Absent values are `Option<V>` values: `get` returning `Some(&None)`
//!   is a present key mapped to nothing.
//! - The table never shrinks.

mod chained_hash_map;
mod chained_hash_map_proptest;
mod config;
mod cursor;
mod error;
mod guard;
pub mod hashing;
mod table;

// Public surface
pub use chained_hash_map::ChainedHashMap;
pub use config::{MapConfig, DEFAULT_BUCKET_COUNT, DEFAULT_GROW_FACTOR, DEFAULT_LOAD_FACTOR};
pub use cursor::Cursor;
pub use error::{ConfigError, IterError};
pub use table::{Iter, IterMut};
