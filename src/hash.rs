//! Bucket functions built from a standard `BuildHasher`.
//!
//! `BucketTable` takes any `Fn(&T, usize) -> usize`. For element types that
//! already implement `Hash`, these helpers reduce a 64-bit hash into
//! `[0, bucket_count)` so callers do not have to write the modulo by hand.

use core::hash::{BuildHasher, Hash};

pub use hashbrown::hash_map::DefaultHashBuilder;

/// Bucket index of `elem` among `bucket_count` buckets.
#[inline]
pub fn bucket_of<T, S>(hasher: &S, elem: &T, bucket_count: usize) -> usize
where
    T: ?Sized + Hash,
    S: BuildHasher,
{
    debug_assert!(bucket_count > 0);
    (hasher.hash_one(elem) % bucket_count as u64) as usize
}

/// Bucket function using `hasher`. Equal elements must hash equally for
/// the table's lookups to find them.
pub fn hashed_buckets<T, S>(hasher: S) -> impl Fn(&T, usize) -> usize + Clone
where
    T: ?Sized + Hash,
    S: BuildHasher + Clone,
{
    move |elem: &T, bucket_count: usize| bucket_of(&hasher, elem, bucket_count)
}

/// Bucket function using hashbrown's default hasher, seeded once when created.
pub fn default_buckets<T>() -> impl Fn(&T, usize) -> usize + Clone
where
    T: ?Sized + Hash,
{
    hashed_buckets(DefaultHashBuilder::default())
}
