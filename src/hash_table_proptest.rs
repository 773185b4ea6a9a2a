#![cfg(test)]

// Property tests for the table invariants, run through the set and map so
// the null element and strategies are covered too.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use proptest::prelude::*;

use crate::hash_map::HashMap;
use crate::hash_set::HashSet;
use crate::hash_set::IdentityHashSet;
use crate::strategy::Equivalence;

// Hashes every key into one of three codes so that clusters form, overlap
// and wrap around the end of the slot array.
struct ThreeBuckets;

impl Equivalence<u16> for ThreeBuckets {
    fn equals(a: &u16, b: &u16) -> bool {
        a == b
    }

    fn hash(value: &u16) -> i32 {
        (value % 3) as i32
    }
}

#[derive(Clone, Debug)]
enum Op {
    Insert(Option<u16>),
    Remove(Option<u16>),
    Contains(Option<u16>),
    CursorRemoveMultiplesOf(u16),
    Retain(u16),
    Clear,
}

fn arb_key() -> impl Strategy<Value = Option<u16>> {
    prop_oneof![
        9 => (0u16..64).prop_map(Some),
        1 => Just(None),
    ]
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        8 => arb_key().prop_map(Op::Insert),
        5 => arb_key().prop_map(Op::Remove),
        2 => arb_key().prop_map(Op::Contains),
        1 => (2u16..6).prop_map(Op::CursorRemoveMultiplesOf),
        1 => (2u16..6).prop_map(Op::Retain),
        1 => Just(Op::Clear),
    ];
    proptest::collection::vec(op, 1..200)
}

fn contents<S: Equivalence<u16>>(set: &HashSet<u16, S>) -> BTreeSet<Option<u16>> {
    set.iter().map(|v| v.copied()).collect()
}

// Property: after every operation the load-factor, probe-sequence and
// uniqueness invariants hold, and the contents match a BTreeSet model.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_set_state_machine(ops in arb_ops()) {
        let mut sut: HashSet<u16, ThreeBuckets> = HashSet::new();
        let mut model: BTreeSet<Option<u16>> = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(k) => {
                    prop_assert_eq!(sut.insert_nullable(k), model.insert(k));
                }
                Op::Remove(k) => {
                    prop_assert_eq!(sut.remove_nullable(k.as_ref()), model.remove(&k));
                }
                Op::Contains(k) => {
                    prop_assert_eq!(sut.contains_nullable(k.as_ref()), model.contains(&k));
                }
                Op::CursorRemoveMultiplesOf(n) => {
                    let mut visited = BTreeSet::new();
                    let mut cursor = sut.cursor();
                    while let Ok(value) = cursor.advance() {
                        let value = value.copied();
                        visited.insert(value);
                        if value.is_some_and(|v| v % n == 0) {
                            prop_assert_eq!(cursor.remove(), Ok(value));
                        }
                    }
                    prop_assert_eq!(&visited, &model, "cursor skipped an element");
                    model.retain(|v| !v.is_some_and(|v| v % n == 0));
                }
                Op::Retain(n) => {
                    sut.retain(|v| v.is_none_or(|v| v % n != 0));
                    model.retain(|v| v.is_none_or(|v| v % n != 0));
                }
                Op::Clear => {
                    sut.clear();
                    model.clear();
                }
            }
            sut.assert_invariants();
            prop_assert_eq!(sut.len(), model.len());
        }
        prop_assert_eq!(contents(&sut), model);
    }
}

// Property: the map agrees with a BTreeMap model, including replaced values
// and the null key.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_map_state_machine(
        ops in proptest::collection::vec((arb_key(), any::<i32>(), any::<bool>()), 1..150)
    ) {
        let mut sut: HashMap<u16, i32> = HashMap::new();
        let mut model: BTreeMap<Option<u16>, i32> = BTreeMap::new();

        for (k, v, insert) in ops {
            if insert {
                prop_assert_eq!(sut.insert_nullable(k, v), model.insert(k, v));
            } else {
                prop_assert_eq!(sut.remove_nullable(k.as_ref()), model.remove(&k));
            }
            sut.assert_invariants();
        }
        prop_assert_eq!(sut.len(), model.len());
        for (k, v) in &model {
            prop_assert_eq!(sut.get_nullable(k.as_ref()), Some(v));
        }
    }
}

proptest! {
    // Property: iterating a set built from any key list yields exactly the
    // distinct keys, whatever the insertion order.
    #[test]
    fn prop_round_trip(keys in proptest::collection::vec(any::<u32>(), 0..300)) {
        let set: HashSet<u32> = keys.iter().copied().collect();
        let mut reversed: HashSet<u32> = HashSet::new();
        reversed.extend(keys.iter().rev().copied());

        let expected: BTreeSet<u32> = keys.iter().copied().collect();
        let from_set: BTreeSet<u32> = set.iter().flatten().copied().collect();
        prop_assert_eq!(&from_set, &expected);
        prop_assert_eq!(set.len(), expected.len());
        prop_assert!(set == reversed);
        prop_assert_eq!(set.content_hash(), reversed.content_hash());
    }

    // Property: equal but distinct boxes collapse under value equality and
    // stay apart under identity.
    #[test]
    fn prop_identity_vs_value(count in 1usize..40, value in any::<u64>()) {
        let boxes: Vec<Box<u64>> = (0..count).map(|_| Box::new(value)).collect();

        let by_value: HashSet<&Box<u64>> = boxes.iter().collect();
        prop_assert_eq!(by_value.len(), 1);

        let mut by_identity: IdentityHashSet<&Box<u64>> = IdentityHashSet::new();
        for b in &boxes {
            prop_assert!(by_identity.insert(b));
        }
        prop_assert_eq!(by_identity.len(), count);
        by_identity.assert_invariants();
    }
}
