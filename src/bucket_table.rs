//! BucketTable: fixed array of buckets, each a `Sequence` kept sorted.
//!
//! Placement is decided by a caller-supplied bucket function
//! `Fn(&T, usize) -> usize` that must return an index below the bucket
//! count. Inside a bucket, elements are ordered by the caller's comparator
//! so lookups bisect. The bucket count is fixed; a poor bucket function
//! degrades lookups to a bisection over one large bucket.

use crate::error::BuildError;
use crate::reentrancy::DebugReentrancy;
use crate::sequence::{Discard, NoDiscard, SearchMode, Sequence};
use core::cmp::Ordering;
use core::fmt;

pub struct BucketTable<T, H, C, D = NoDiscard>
where
    D: Discard<T>,
{
    buckets: Box<[Sequence<T, D>]>,
    hash: H,
    compare: C,
    len: usize,
    reentrancy: DebugReentrancy,
}

impl<T, H, C> BucketTable<T, H, C>
where
    H: Fn(&T, usize) -> usize,
    C: Fn(&T, &T) -> Ordering,
{
    /// Panics if `bucket_count` is zero.
    pub fn new(bucket_count: usize, hash: H, compare: C) -> Self {
        Self::with_discard(bucket_count, hash, compare, NoDiscard)
    }

    pub fn try_new(bucket_count: usize, hash: H, compare: C) -> Result<Self, BuildError> {
        Self::try_with_discard(bucket_count, hash, compare, NoDiscard)
    }
}

impl<T, H, C, D> BucketTable<T, H, C, D>
where
    H: Fn(&T, usize) -> usize,
    C: Fn(&T, &T) -> Ordering,
    D: Discard<T> + Clone,
{
    /// Like `new`, with a discard hook shared (by clone) across buckets.
    pub fn with_discard(bucket_count: usize, hash: H, compare: C, discard: D) -> Self {
        match Self::try_with_discard(bucket_count, hash, compare, discard) {
            Ok(table) => table,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn try_with_discard(
        bucket_count: usize,
        hash: H,
        compare: C,
        discard: D,
    ) -> Result<Self, BuildError> {
        if bucket_count == 0 {
            return Err(BuildError::ZeroBuckets);
        }
        log::trace!("creating bucket table with {} buckets", bucket_count);
        let buckets = (0..bucket_count)
            .map(|_| Sequence::with_discard(discard.clone()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Ok(Self {
            buckets,
            hash,
            compare,
            len: 0,
            reentrancy: DebugReentrancy::new("bucket table"),
        })
    }
}

impl<T, H, C, D> BucketTable<T, H, C, D>
where
    H: Fn(&T, usize) -> usize,
    C: Fn(&T, &T) -> Ordering,
    D: Discard<T>,
{
    /// Number of distinct elements across all buckets.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Contents of bucket `index`, in comparator order.
    pub fn bucket(&self, index: usize) -> &[T] {
        assert!(
            index < self.buckets.len(),
            "bucket {} out of range for table of {} buckets",
            index,
            self.buckets.len()
        );
        self.buckets[index].as_slice()
    }

    fn bucket_index(&self, elem: &T) -> usize {
        let n = self.buckets.len();
        let b = (self.hash)(elem, n);
        assert!(
            b < n,
            "bucket function returned {} for a table of {} buckets",
            b,
            n
        );
        b
    }

    /// Insert `elem`, or overwrite the element comparing equal to it.
    ///
    /// Returns the overwritten element on the update path; the discard hook
    /// is not run on it. New elements go to their sorted position, so the
    /// bucket stays ordered by the comparator.
    pub fn enter(&mut self, elem: T) -> Option<T> {
        let _g = self.reentrancy.enter();
        let b = self.bucket_index(&elem);
        let compare = &self.compare;
        let bucket = &mut self.buckets[b];
        if bucket.is_empty() {
            bucket.append(elem);
            self.len += 1;
            return None;
        }
        match bucket.binary_search_by(|probe| compare(probe, &elem)) {
            Ok(pos) => Some(bucket.replace(elem, pos)),
            Err(pos) => {
                bucket.insert(elem, pos);
                self.len += 1;
                None
            }
        }
    }

    fn position(&self, b: usize, elem: &T) -> Option<usize> {
        let bucket = &self.buckets[b];
        if bucket.is_empty() {
            return None;
        }
        let compare = &self.compare;
        bucket.search(elem, |probe, key| compare(probe, key), 0, SearchMode::Binary)
    }

    /// Stored element comparing equal to `elem`.
    /// Read-only: callbacks may look up the same table through a shared
    /// handle.
    pub fn lookup(&self, elem: &T) -> Option<&T> {
        let b = self.bucket_index(elem);
        let pos = self.position(b, elem)?;
        Some(self.buckets[b].nth(pos))
    }

    /// Mutable access to the stored element comparing equal to `elem`.
    /// Changes must not alter its bucket or its order under the comparator.
    pub fn lookup_mut(&mut self, elem: &T) -> Option<&mut T> {
        let _g = self.reentrancy.enter();
        let b = self.bucket_index(elem);
        let pos = self.position(b, elem)?;
        Some(self.buckets[b].nth_mut(pos))
    }

    pub fn contains(&self, elem: &T) -> bool {
        self.lookup(elem).is_some()
    }

    /// Delete the element comparing equal to `elem`, running the discard
    /// hook on it. Returns whether anything was removed.
    pub fn remove(&mut self, elem: &T) -> bool {
        let _g = self.reentrancy.enter();
        let b = self.bucket_index(elem);
        match self.position(b, elem) {
            Some(pos) => {
                self.buckets[b].delete(pos);
                self.len -= 1;
                true
            }
            None => false,
        }
    }

    /// Apply `f` to every element: buckets in ascending index, sorted order
    /// within each bucket. `f` must not change an element's bucket or order.
    pub fn map<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut T),
    {
        let _g = self.reentrancy.enter();
        for bucket in self.buckets.iter_mut() {
            bucket.map(&mut f);
        }
    }

    /// Elements in the same order as `map`.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.buckets.iter().flat_map(|bucket| bucket.iter())
    }
}

impl<T, H, C, D> fmt::Debug for BucketTable<T, H, C, D>
where
    T: fmt::Debug,
    D: Discard<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketTable")
            .field("len", &self.len)
            .field(
                "buckets",
                &self.buckets.iter().map(|b| b.as_slice()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
