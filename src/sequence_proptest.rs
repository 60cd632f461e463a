#![cfg(test)]

// Property tests for Sequence against a plain Vec model.

use crate::sequence::{SearchMode, Sequence};
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

// Positions are raw and reduced modulo the current length when applied, so
// shrinking keeps every op valid.
#[derive(Clone, Debug)]
enum Op {
    Append(i16),
    Insert(usize, i16),
    Delete(usize),
    Replace(usize, i16),
    Sort,
    Map(i16),
    SearchLinear(usize, i16),
    SearchBinary(i16),
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        any::<i16>().prop_map(Op::Append),
        (any::<usize>(), any::<i16>()).prop_map(|(p, v)| Op::Insert(p, v)),
        any::<usize>().prop_map(Op::Delete),
        (any::<usize>(), any::<i16>()).prop_map(|(p, v)| Op::Replace(p, v)),
        Just(Op::Sort),
        (-3i16..=3).prop_map(Op::Map),
        (any::<usize>(), -8i16..=8).prop_map(|(p, v)| Op::SearchLinear(p, v)),
        (-8i16..=8).prop_map(Op::SearchBinary),
    ];
    proptest::collection::vec(op, 1..80)
}

// Property: Sequence behaves like Vec under random op sequences.
// - len matches the model and never exceeds capacity.
// - Capacity is DEFAULT_CAPACITY times a power of two and never shrinks.
// - Insert/delete/replace keep element order identical to the model.
// - Linear search returns the first match at or after start.
// - After sort, binary search finds a key iff the model contains it.
// - Each value reaches the discard hook once: on delete or at drop.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_sequence_matches_vec(ops in arb_ops()) {
        let discarded = Rc::new(RefCell::new(Vec::new()));
        let sink = discarded.clone();
        let mut sut = Sequence::with_discard(move |x: &mut i16| sink.borrow_mut().push(*x));
        let mut model: Vec<i16> = Vec::new();
        let mut model_discarded: Vec<i16> = Vec::new();
        let mut sorted = true;
        let mut last_cap = sut.capacity();
        let mut peak = 0usize;

        for op in ops {
            match op {
                Op::Append(v) => {
                    sut.append(v);
                    model.push(v);
                    prop_assert_eq!(*sut.nth(sut.len() - 1), v);
                    sorted = false;
                }
                Op::Insert(p, v) => {
                    let p = p % (model.len() + 1);
                    sut.insert(v, p);
                    model.insert(p, v);
                    sorted = false;
                }
                Op::Delete(p) => {
                    if !model.is_empty() {
                        let p = p % model.len();
                        sut.delete(p);
                        model_discarded.push(model.remove(p));
                    }
                }
                Op::Replace(p, v) => {
                    if !model.is_empty() {
                        let p = p % model.len();
                        let old = sut.replace(v, p);
                        prop_assert_eq!(old, model[p]);
                        model[p] = v;
                        sorted = false;
                    }
                }
                Op::Sort => {
                    sut.sort(|a, b| a.cmp(b));
                    model.sort();
                    sorted = true;
                }
                Op::Map(d) => {
                    sut.map(|x| *x = x.wrapping_add(d));
                    for x in model.iter_mut() {
                        *x = x.wrapping_add(d);
                    }
                    if d != 0 {
                        // Wrapping can break order.
                        sorted = false;
                    }
                }
                Op::SearchLinear(p, key) => {
                    if !model.is_empty() {
                        let start = p % model.len();
                        let got = sut.search(&key, |a, k| a.cmp(k), start, SearchMode::Linear);
                        let want = model[start..].iter().position(|x| *x == key).map(|i| i + start);
                        prop_assert_eq!(got, want);
                    }
                }
                Op::SearchBinary(key) => {
                    if sorted && !model.is_empty() {
                        let got = sut.search(&key, |a, k| a.cmp(k), 0, SearchMode::Binary);
                        match got {
                            Some(i) => prop_assert_eq!(model[i], key),
                            None => prop_assert!(!model.contains(&key)),
                        }
                    }
                }
            }

            peak = peak.max(model.len());
            prop_assert_eq!(sut.as_slice(), model.as_slice());
            prop_assert!(sut.len() <= sut.capacity());
            prop_assert!(sut.capacity() >= last_cap);
            prop_assert!((sut.capacity() / crate::DEFAULT_CAPACITY).is_power_of_two());
            prop_assert_eq!(sut.high_water_mark(), peak);
            last_cap = sut.capacity();
        }

        prop_assert_eq!(&*discarded.borrow(), &model_discarded);
        drop(sut);
        model_discarded.extend(model.iter().copied());
        let mut got = discarded.borrow().clone();
        got.sort();
        model_discarded.sort();
        prop_assert_eq!(got, model_discarded);
    }
}
