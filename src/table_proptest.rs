#![cfg(test)]

// Property tests for ChainedTable kept inside the crate so they can call
// the test-only invariant walker.

use crate::hash::BucketHasher;
use crate::table::ChainedTable;
use crate::TableError;
use core::num::NonZeroUsize;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations so shrinking moves toward earlier keys and
// shorter op lists.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Delete(usize),
    Search(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<OpI>)> {
    (1usize..=16, proptest::collection::vec("[a-z]{1,5}", 1..=8)).prop_flat_map(
        |(buckets, pool)| {
            let idxs: Vec<usize> = (0..pool.len()).collect();
            let idx = proptest::sample::select(idxs);
            let op = prop_oneof![
                (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
                idx.clone().prop_map(OpI::Delete),
                idx.clone().prop_map(OpI::Search),
                "[a-z]{1,5}".prop_map(OpI::Contains),
                (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
                Just(OpI::Iterate),
            ];
            proptest::collection::vec(op, 1..60).prop_map(move |ops| (buckets, pool.clone(), ops))
        },
    )
}

fn run<H: BucketHasher>(
    mut sut: ChainedTable<i32, H>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();
    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = &pool[i];
                let prev = sut.insert(k, v).expect("insert of non-empty key");
                prop_assert_eq!(prev, model.insert(k.clone(), v));
            }
            OpI::Delete(i) => {
                let k = &pool[i];
                let before = sut.len();
                match (sut.delete(k), model.remove(k)) {
                    (Ok(v), Some(mv)) => {
                        prop_assert_eq!(v, mv);
                    }
                    (Err(TableError::KeyNotFound), None) => {
                        prop_assert_eq!(sut.len(), before, "miss must not change count");
                    }
                    (got, want) => {
                        prop_assert!(false, "delete mismatch: {:?} vs {:?}", got, want)
                    }
                }
                prop_assert_eq!(sut.search(k), Ok(None));
            }
            OpI::Search(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.search(k), Ok(model.get(k)));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(v) = sut.get_mut(k).expect("non-empty key") {
                    *v = v.saturating_add(d);
                    let mv = model.get_mut(k).expect("present in model");
                    *mv = mv.saturating_add(d);
                } else {
                    prop_assert!(!model.contains_key(k));
                }
            }
            OpI::Iterate => {
                let s: BTreeSet<(String, i32)> =
                    sut.iter().map(|(k, v)| (k.to_string(), *v)).collect();
                let m: BTreeSet<(String, i32)> =
                    model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(s, m);
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        sut.assert_invariants();
    }

    let expected = model.len();
    let report = sut.destroy();
    prop_assert_eq!(report.entries, expected);
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// - Overwrite returns the previous value and keeps the count.
// - Delete of a miss is reported and changes nothing.
// - Every entry sits in the bucket its key hashes to, keys are unique,
//   and the count equals the number of reachable entries.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((buckets, pool, ops) in arb_scenario()) {
        let sut: ChainedTable<i32> = ChainedTable::new(buckets).unwrap();
        run(sut, &pool, ops)?;
    }
}

#[derive(Clone, Copy, Default)]
struct OneBucket;
impl BucketHasher for OneBucket {
    fn bucket_index(&self, _key: &[u8], _n: NonZeroUsize) -> usize {
        0
    }
}

// Property: same invariants when every key collides, which stresses
// unlinking at the head, middle and tail of a single long chain.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((buckets, pool, ops) in arb_scenario()) {
        let sut = ChainedTable::with_hasher(buckets, OneBucket).unwrap();
        run(sut, &pool, ops)?;
    }

    #[test]
    fn prop_hash_deterministic(key in "[ -~]{1,64}", n in 1usize..10_000) {
        let n = NonZeroUsize::new(n).unwrap();
        let a = crate::hash::bucket_index(key.as_bytes(), n);
        prop_assert_eq!(a, crate::hash::bucket_index(key.as_bytes(), n));
        prop_assert!(a < n.get());
    }
}
