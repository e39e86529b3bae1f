//! Hash adapter and bucket index resolver.

use core::hash::{BuildHasher, Hash};

/// Hash `q` with `hasher` and fold the 64-bit digest into a 32-bit code.
///
/// The high and low halves are XORed so both contribute to the slot.
#[inline]
pub fn hash_code<S, Q>(hasher: &S, q: &Q) -> i32
where
    S: BuildHasher,
    Q: ?Sized + Hash,
{
    let h = hasher.hash_one(q);
    ((h >> 32) ^ h) as u32 as i32
}

/// Slot for `code` in a table of `len` buckets.
///
/// `i32::MIN` has no positive counterpart and always lands in slot 0.
#[inline]
pub fn bucket_index(code: i32, len: usize) -> usize {
    debug_assert!(len > 0, "bucket table must not be empty");
    if code == i32::MIN {
        return 0;
    }
    code.unsigned_abs() as usize % len
}
