//! Sequence: owned, growable array with a doubling growth policy.
//!
//! Elements live contiguously in `[0, len)`. Capacity starts at the
//! requested size (or `DEFAULT_CAPACITY`) and doubles whenever an insert
//! would overflow it; it never shrinks. Removed elements are handed to the
//! sequence's `Discard` hook exactly once before they drop.

use core::cmp::Ordering;
use core::fmt;

/// Capacity used when the caller asks for zero.
pub const DEFAULT_CAPACITY: usize = 4;

/// Cleanup hook run on an element when it is deleted or when the owning
/// sequence is dropped. Runs before the element's own `Drop`.
///
/// The hook must not try to reach back into the sequence it was called
/// from.
pub trait Discard<T> {
    fn discard(&mut self, elem: &mut T);
}

/// Hook that does nothing; elements only run their own `Drop`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoDiscard;

impl<T> Discard<T> for NoDiscard {
    #[inline]
    fn discard(&mut self, _elem: &mut T) {}
}

impl<T, F> Discard<T> for F
where
    F: FnMut(&mut T),
{
    #[inline]
    fn discard(&mut self, elem: &mut T) {
        self(elem)
    }
}

/// How `Sequence::search` walks the range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchMode {
    /// Scan front to back and return the first match.
    Linear,
    /// Bisect; the searched range must already be ordered by the comparator.
    Binary,
}

pub struct Sequence<T, D: Discard<T> = NoDiscard> {
    buf: Vec<T>,
    capacity: usize,
    high_water_mark: usize,
    discard: D,
}

impl<T> Sequence<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_discard(capacity, NoDiscard)
    }
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, D: Discard<T>> Sequence<T, D> {
    pub fn with_discard(discard: D) -> Self {
        Self::with_capacity_and_discard(0, discard)
    }

    pub fn with_capacity_and_discard(capacity: usize, discard: D) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            capacity
        };
        Self {
            buf: Vec::with_capacity(capacity),
            capacity,
            high_water_mark: 0,
            discard,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Slots currently reserved under the doubling policy.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Largest length this sequence has ever reached.
    #[inline]
    pub fn high_water_mark(&self) -> usize {
        self.high_water_mark
    }

    pub fn nth(&self, pos: usize) -> &T {
        self.check_index(pos);
        &self.buf[pos]
    }

    pub fn nth_mut(&mut self, pos: usize) -> &mut T {
        self.check_index(pos);
        &mut self.buf[pos]
    }

    /// Overwrite the element at `pos`, handing the old value back to the
    /// caller. The discard hook is not run on it.
    pub fn replace(&mut self, elem: T, pos: usize) -> T {
        self.check_index(pos);
        core::mem::replace(&mut self.buf[pos], elem)
    }

    /// Insert at `pos` in `[0, len]`, shifting `[pos, len)` one slot right.
    pub fn insert(&mut self, elem: T, pos: usize) {
        let len = self.len();
        assert!(
            pos <= len,
            "insert position {} out of range for sequence of length {}",
            pos,
            len
        );
        if pos == len {
            self.append(elem);
            return;
        }
        self.grow_if_full();
        self.buf.insert(pos, elem);
        self.bump_high_water_mark();
    }

    pub fn append(&mut self, elem: T) {
        self.grow_if_full();
        self.buf.push(elem);
        self.bump_high_water_mark();
    }

    /// Remove the element at `pos`: discard hook first, then drop. The tail
    /// shifts left and no copy of the old last element is left behind.
    pub fn delete(&mut self, pos: usize) {
        self.check_index(pos);
        let mut removed = self.buf.remove(pos);
        self.discard.discard(&mut removed);
    }

    pub fn sort<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.buf.sort_unstable_by(compare);
    }

    /// Apply `f` to every element in index order. Auxiliary state goes in
    /// the closure's captures.
    pub fn map<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut T),
    {
        for elem in self.buf.iter_mut() {
            f(elem);
        }
    }

    /// Find an element in `[start, len)` for which `compare(elem, key)` is
    /// `Equal`. `start` must be a valid index.
    ///
    /// With `SearchMode::Binary` the range must be ordered by `compare`;
    /// otherwise the result is unspecified (but never out of bounds).
    pub fn search<K, F>(
        &self,
        key: &K,
        mut compare: F,
        start: usize,
        mode: SearchMode,
    ) -> Option<usize>
    where
        K: ?Sized,
        F: FnMut(&T, &K) -> Ordering,
    {
        self.check_index(start);
        let range = &self.buf[start..];
        match mode {
            SearchMode::Binary => range
                .binary_search_by(|elem| compare(elem, key))
                .ok()
                .map(|i| start + i),
            SearchMode::Linear => range
                .iter()
                .position(|elem| compare(elem, key) == Ordering::Equal)
                .map(|i| start + i),
        }
    }

    /// Bisect the whole sequence. `Ok(i)` is a match, `Err(i)` the position
    /// at which an element would keep the order.
    pub fn binary_search_by<F>(&self, f: F) -> Result<usize, usize>
    where
        F: FnMut(&T) -> Ordering,
    {
        self.buf.binary_search_by(f)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.buf
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.buf.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.buf.iter_mut()
    }

    #[inline]
    fn check_index(&self, pos: usize) {
        assert!(
            pos < self.len(),
            "position {} out of range for sequence of length {}",
            pos,
            self.len()
        );
    }

    fn grow_if_full(&mut self) {
        if self.buf.len() < self.capacity {
            return;
        }
        let new_capacity = self
            .capacity
            .checked_mul(2)
            .expect("sequence capacity overflow");
        log::trace!(
            "sequence growing from {} to {} slots",
            self.capacity,
            new_capacity
        );
        self.buf.reserve_exact(new_capacity - self.buf.len());
        self.capacity = new_capacity;
    }

    #[inline]
    fn bump_high_water_mark(&mut self) {
        self.high_water_mark = self.high_water_mark.max(self.buf.len());
    }
}

impl<T, D: Discard<T>> Drop for Sequence<T, D> {
    fn drop(&mut self) {
        // Live elements only: [len, high_water_mark) holds nothing.
        for elem in self.buf.iter_mut() {
            self.discard.discard(elem);
        }
    }
}

impl<T: fmt::Debug, D: Discard<T>> fmt::Debug for Sequence<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("elems", &self.buf)
            .field("capacity", &self.capacity)
            .field("high_water_mark", &self.high_water_mark)
            .finish()
    }
}

impl<'a, T, D: Discard<T>> IntoIterator for &'a Sequence<T, D> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.buf.iter()
    }
}

impl<T> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut seq = Sequence::new();
        for elem in iter {
            seq.append(elem);
        }
        seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn seq_of(xs: &[i32]) -> Sequence<i32> {
        xs.iter().copied().collect()
    }

    /// Invariant: zero requested capacity falls back to the default, and
    /// capacity doubles exactly when an append would overflow it.
    #[test]
    fn capacity_defaults_and_doubles() {
        let mut s: Sequence<u8> = Sequence::with_capacity(0);
        assert_eq!(s.capacity(), DEFAULT_CAPACITY);
        for i in 0..4 {
            s.append(i);
        }
        assert_eq!(s.capacity(), 4);
        s.append(4);
        assert_eq!(s.capacity(), 8);
        for i in 5..9 {
            s.append(i);
        }
        assert_eq!(s.capacity(), 16);
        assert_eq!(s.len(), 9);

        let s3: Sequence<u8> = Sequence::with_capacity(3);
        assert_eq!(s3.capacity(), 3);
    }

    /// Invariant: capacity never shrinks on delete.
    #[test]
    fn delete_does_not_shrink() {
        let mut s = seq_of(&[1, 2, 3, 4, 5]);
        let cap = s.capacity();
        while !s.is_empty() {
            s.delete(0);
        }
        assert_eq!(s.capacity(), cap);
        assert_eq!(s.high_water_mark(), 5);
    }

    /// Invariant: insert at `len` behaves like append; insert in the middle
    /// shifts the tail right by one.
    #[test]
    fn insert_positions() {
        let mut s = seq_of(&[1, 2, 4]);
        s.insert(3, 2);
        assert_eq!(s.as_slice(), &[1, 2, 3, 4]);
        s.insert(5, 4);
        assert_eq!(s.as_slice(), &[1, 2, 3, 4, 5]);
        s.insert(0, 0);
        assert_eq!(s.as_slice(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(s.high_water_mark(), 6);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn insert_past_end_panics() {
        let mut s = seq_of(&[1]);
        s.insert(9, 2);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn nth_out_of_range_panics() {
        let s = seq_of(&[1, 2]);
        let _ = s.nth(2);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn delete_from_empty_panics() {
        let mut s: Sequence<i32> = Sequence::new();
        s.delete(0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn replace_at_len_panics() {
        let mut s = seq_of(&[1, 2, 3]);
        let _ = s.replace(9, 3);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn nth_mut_at_len_panics() {
        let mut s = seq_of(&[1, 2, 3]);
        *s.nth_mut(3) = 9;
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn delete_at_len_panics() {
        let mut s = seq_of(&[1, 2, 3]);
        s.delete(3);
    }

    #[test]
    fn replace_returns_previous_without_discard() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        let mut s = Sequence::with_discard(move |x: &mut i32| log.borrow_mut().push(*x));
        s.append(1);
        s.append(2);
        let old = s.replace(20, 1);
        assert_eq!(old, 2);
        assert_eq!(*s.nth(1), 20);
        assert!(seen.borrow().is_empty());
    }

    /// Invariant: every element reaches the discard hook exactly once, either
    /// on delete or at teardown; deleted elements are not discarded again.
    #[test]
    fn discard_runs_once_per_element() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        {
            let mut s =
                Sequence::with_discard(move |x: &mut String| log.borrow_mut().push(x.clone()));
            for w in ["a", "b", "c", "d"] {
                s.append(w.to_string());
            }
            s.delete(1);
            s.delete(2);
            assert_eq!(s.len(), 2);
            assert_eq!(s.high_water_mark(), 4);
        }
        let mut got = seen.borrow().clone();
        got.sort();
        assert_eq!(got, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn search_linear_from_start_index() {
        let s = seq_of(&[7, 3, 7, 1]);
        let cmp = |a: &i32, b: &i32| a.cmp(b);
        assert_eq!(s.search(&7, cmp, 0, SearchMode::Linear), Some(0));
        assert_eq!(s.search(&7, cmp, 1, SearchMode::Linear), Some(2));
        assert_eq!(s.search(&9, cmp, 0, SearchMode::Linear), None);
    }

    /// Invariant: binary search covers the whole `[start, len)` range,
    /// including the last element.
    #[test]
    fn search_binary_reaches_last_element() {
        let s = seq_of(&[1, 3, 5, 7, 9]);
        let cmp = |a: &i32, b: &i32| a.cmp(b);
        assert_eq!(s.search(&9, cmp, 0, SearchMode::Binary), Some(4));
        assert_eq!(s.search(&9, cmp, 4, SearchMode::Binary), Some(4));
        assert_eq!(s.search(&1, cmp, 1, SearchMode::Binary), None);
        assert_eq!(s.search(&5, cmp, 1, SearchMode::Binary), Some(2));
        assert_eq!(s.search(&4, cmp, 0, SearchMode::Binary), None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn search_start_must_be_valid() {
        let s = seq_of(&[1]);
        let _ = s.search(&1, |a: &i32, b: &i32| a.cmp(b), 1, SearchMode::Linear);
    }

    #[test]
    fn sort_then_map_mutates_in_place() {
        let mut s = seq_of(&[5, 1, 4, 2, 3]);
        s.sort(|a, b| a.cmp(b));
        assert_eq!(s.as_slice(), &[1, 2, 3, 4, 5]);

        let mut total = 0;
        s.map(|x| {
            *x *= 10;
            total += *x;
        });
        assert_eq!(s.as_slice(), &[10, 20, 30, 40, 50]);
        assert_eq!(total, 150);
    }

    #[test]
    fn binary_search_by_reports_insertion_point() {
        let s = seq_of(&[10, 20, 30]);
        assert_eq!(s.binary_search_by(|x| x.cmp(&20)), Ok(1));
        assert_eq!(s.binary_search_by(|x| x.cmp(&25)), Err(2));
        assert_eq!(s.binary_search_by(|x| x.cmp(&5)), Err(0));
    }
}
