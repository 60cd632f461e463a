//! bucket-set: a growable sequence and a fixed-bucket hash table whose
//! buckets are sorted sequences, both driven entirely by caller-supplied
//! bucket, compare and cleanup functions.
//!
//! Internal Design:
//!
//! Summary
//! - Layers:
//!   - Sequence<T, D>: owned contiguous array with a doubling growth
//!     policy, positional insert/delete/replace, in-place sort, and
//!     linear or binary search from a start index.
//!   - BucketTable<T, H, C, D>: `bucket_count` sequences; an element lives
//!     in bucket `hash(elem, bucket_count)` and each bucket is kept in
//!     ascending order under `compare`, so lookups bisect.
//! - The table only talks to its buckets through the sequence API; the
//!   sequence knows nothing about the table.
//!
//! Constraints
//! - Single-threaded: the table is `!Send`/`!Sync` (see `reentrancy`).
//!   The sequence carries no guard and follows ordinary borrow rules.
//! - The bucket count is fixed at construction. There is no rehashing.
//! - `hash` must return a value in `[0, bucket_count)`; elements equal
//!   under `compare` must land in the same bucket.
//!
//! Failure model
//! - Caller misuse (bad index, zero buckets, out-of-range bucket from the
//!   hash function) panics. Absence is `None`. `BucketTable::try_new` is
//!   the one checked path, for bucket counts that come from runtime input.
//!
//! Element cleanup
//! - Elements are owned values and run their own `Drop`. An optional
//!   `Discard` hook additionally sees each element exactly once, when it
//!   is deleted or when its container drops. Values handed back to the
//!   caller (`Sequence::replace`, `BucketTable::enter` on update) skip the
//!   hook; they now belong to the caller.
//! - The high-water mark (largest length ever reached) is tracked for
//!   diagnostics only. Teardown walks live elements, never stale slots.
//!
//! Notes and non-goals
//! - No iteration order beyond: buckets ascending, sorted within a bucket.
//! - No shrinking: capacity freed only when a sequence drops.
//! - No equality beyond what `compare` defines.

pub mod bucket_table;
mod bucket_table_proptest;
pub mod error;
pub mod hash;
mod reentrancy;
pub mod sequence;
mod sequence_proptest;

// Public surface
pub use bucket_table::BucketTable;
pub use error::BuildError;
pub use hash::{bucket_of, default_buckets, hashed_buckets};
pub use sequence::{Discard, NoDiscard, SearchMode, Sequence, DEFAULT_CAPACITY};
