#![cfg(test)]

// Property tests for Chain kept inside the crate since Chain is private.

use crate::chain::{Chain, PutOutcome};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Put(i32, i32),
    Remove(i32),
    Get(i32),
}

// Small key range so puts, replaces and removes hit the same keys often.
fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let key = -6i32..6;
    let op = prop_oneof![
        3 => (key.clone(), any::<i32>()).prop_map(|(k, v)| Op::Put(k, v)),
        2 => key.clone().prop_map(Op::Remove),
        2 => key.prop_map(Op::Get),
    ];
    proptest::collection::vec(op, 1..80)
}

// Property: state-machine equivalence against an ordered Vec model.
// - Put on a present key replaces in place and reports the old value.
// - Put on an absent key appends to the tail and reports Inserted.
// - Remove unlinks without disturbing the order of the rest.
// - Iteration order always equals the model order; len parity holds.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_chain_matches_ordered_model(ops in arb_ops()) {
        let mut sut: Chain<i32, i32> = Chain::new();
        let mut model: Vec<(i32, i32)> = Vec::new();

        for op in ops {
            match op {
                Op::Put(k, v) => {
                    let got = sut.put(k, v).expect("allocation");
                    match model.iter_mut().find(|(mk, _)| *mk == k) {
                        Some(slot) => {
                            let old = core::mem::replace(&mut slot.1, v);
                            prop_assert_eq!(got, PutOutcome::Replaced(old));
                        }
                        None => {
                            model.push((k, v));
                            prop_assert_eq!(got, PutOutcome::Inserted);
                        }
                    }
                }
                Op::Remove(k) => {
                    let expected = model
                        .iter()
                        .position(|(mk, _)| *mk == k)
                        .map(|i| model.remove(i).1);
                    prop_assert_eq!(sut.remove(&k), expected);
                }
                Op::Get(k) => {
                    let expected = model.iter().find(|(mk, _)| *mk == k).map(|(_, v)| *v);
                    prop_assert_eq!(sut.get(&k), expected);
                }
            }

            let order: Vec<(i32, i32)> = sut.iter().map(|(k, v)| (*k, *v)).collect();
            prop_assert_eq!(&order, &model);
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
        }
    }
}
