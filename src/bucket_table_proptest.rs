#![cfg(test)]

// Property tests for BucketTable kept inside the crate so they can inspect
// bucket contents directly.

use crate::bucket_table::BucketTable;
use crate::hash::hashed_buckets;
use core::cmp::Ordering;
use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::BuildHasherDefault;

// Element with an identity (`key`) and a payload that only the update path
// changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Rec {
    key: i32,
    val: u8,
}

fn by_key(a: &Rec, b: &Rec) -> Ordering {
    a.key.cmp(&b.key)
}

fn rec_bucket(r: &Rec, n: usize) -> usize {
    r.key.rem_euclid(n as i32) as usize
}

#[derive(Clone, Debug)]
enum Op {
    Enter(i32, u8),
    Lookup(i32),
    Remove(i32),
    Bump(u8),
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let key = -40i32..40;
    let op = prop_oneof![
        4 => (key.clone(), any::<u8>()).prop_map(|(k, v)| Op::Enter(k, v)),
        2 => key.clone().prop_map(Op::Lookup),
        1 => key.prop_map(Op::Remove),
        1 => any::<u8>().prop_map(Op::Bump),
    ];
    proptest::collection::vec(op, 1..120)
}

fn check_against_model<H>(
    bucket_count: usize,
    hash: H,
    ops: Vec<Op>,
) -> Result<(), TestCaseError>
where
    H: Fn(&Rec, usize) -> usize + Clone,
{
    let placement = hash.clone();
    let mut sut = BucketTable::new(bucket_count, hash, by_key);
    let mut model: BTreeMap<i32, u8> = BTreeMap::new();

    for op in ops {
        match op {
            Op::Enter(k, v) => {
                let prev = sut.enter(Rec { key: k, val: v });
                let want = model.insert(k, v).map(|old| Rec { key: k, val: old });
                prop_assert_eq!(prev, want);
            }
            Op::Lookup(k) => {
                let got = sut.lookup(&Rec { key: k, val: 0 }).copied();
                let want = model.get(&k).map(|&v| Rec { key: k, val: v });
                prop_assert_eq!(got, want);
            }
            Op::Remove(k) => {
                let removed = sut.remove(&Rec { key: k, val: 0 });
                prop_assert_eq!(removed, model.remove(&k).is_some());
            }
            Op::Bump(d) => {
                sut.map(|r| r.val = r.val.wrapping_add(d));
                for v in model.values_mut() {
                    *v = v.wrapping_add(d);
                }
            }
        }

        // Post-conditions after each op
        // 1) Count parity
        prop_assert_eq!(sut.len(), model.len());
        // 2) Each bucket strictly ascending and holding only its own elements
        for b in 0..sut.bucket_count() {
            let bucket = sut.bucket(b);
            prop_assert!(bucket.windows(2).all(|w| by_key(&w[0], &w[1]) == Ordering::Less));
            prop_assert!(bucket.iter().all(|r| placement(r, bucket_count) == b));
        }
        // 3) Iteration covers exactly the model
        let mut seen: Vec<(i32, u8)> = sut.iter().map(|r| (r.key, r.val)).collect();
        seen.sort();
        let want: Vec<(i32, u8)> = model.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(seen, want);
    }
    Ok(())
}

// Property: BucketTable tracks a BTreeMap model across enter/lookup/remove/map.
// - `enter` returns the replaced element exactly when the key was present.
// - `lookup` finds an element iff the model holds its key, with the latest payload.
// - Buckets stay sorted and only hold elements the bucket function sends there.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_table_matches_model(bucket_count in 1usize..9, ops in arb_ops()) {
        check_against_model(bucket_count, rec_bucket, ops)?;
    }

    #[test]
    fn prop_table_with_std_hasher(bucket_count in 1usize..9, ops in arb_ops()) {
        let inner = hashed_buckets::<i32, _>(BuildHasherDefault::<DefaultHasher>::default());
        let hash = move |r: &Rec, n: usize| inner(&r.key, n);
        check_against_model(bucket_count, hash, ops)?;
    }
}
