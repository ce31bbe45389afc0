#![cfg(test)]

// Property tests for StrSet kept inside the crate so they can check
// internal counters (tombstones) alongside the public surface.

use crate::hasher::HasherRegistry;
use crate::table::{StrSet, Visit};
use crate::KeyHasher;
use proptest::prelude::*;
use std::collections::HashSet;
use std::rc::Rc;

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Add(usize),
    Remove(usize),
    Contains(usize),
    Clear,
    Iterate,
    DrainMatching(usize),
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,6}", 1..=10).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => idx.clone().prop_map(OpI::Add),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Contains),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
            1 => idx.prop_map(OpI::DrainMatching),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Drives one scenario against a std::collections::HashSet model and
// checks parity after every op, plus the structural invariants the
// public surface cannot express:
// - add/remove return values match model membership transitions.
// - `contains` parity for every op's key.
// - iteration yields each live key exactly once (set parity).
// - `each` with a selective RemoveCurrent visitor matches retain on the
//   model, and Stop-free passes visit every live key.
// - live count parity and `live + tombstones <= capacity` after each op.
fn run_scenario(hasher: Rc<dyn KeyHasher>, pool: &[String], ops: &[OpI]) -> Result<(), TestCaseError> {
    let mut sut = StrSet::with_hasher(hasher);
    let mut model: HashSet<String> = HashSet::new();

    for op in ops {
        match op {
            OpI::Add(i) => {
                let key = &pool[*i];
                let added = sut.add(key);
                prop_assert_eq!(added, model.insert(key.clone()));
            }
            OpI::Remove(i) => {
                let key = &pool[*i];
                let removed = sut.remove(key);
                prop_assert_eq!(removed, model.remove(key.as_str()));
            }
            OpI::Contains(i) => {
                let key = &pool[*i];
                prop_assert_eq!(sut.contains(key), model.contains(key.as_str()));
            }
            OpI::Clear => {
                let capacity = sut.capacity();
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.capacity(), capacity, "clear must not shrink");
                prop_assert_eq!(sut.tombstones(), 0);
            }
            OpI::Iterate => {
                let seen: HashSet<String> = sut.iter().map(str::to_owned).collect();
                prop_assert_eq!(&seen, &model);
            }
            OpI::DrainMatching(i) => {
                // Remove every key sharing the probe key's first byte.
                let prefix = pool[*i].as_bytes().first().copied();
                let mut visited = 0usize;
                sut.each(|key| {
                    visited += 1;
                    if key.as_bytes().first().copied() == prefix {
                        Visit::RemoveCurrent
                    } else {
                        Visit::Continue
                    }
                });
                prop_assert_eq!(visited, model.len(), "each must visit every live key");
                model.retain(|key| key.as_bytes().first().copied() != prefix);
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.len() + sut.tombstones() <= sut.capacity());
    }

    // Final membership sweep: both directions.
    for key in pool {
        prop_assert_eq!(sut.contains(key), model.contains(key.as_str()));
    }
    let seen: HashSet<String> = sut.iter().map(str::to_owned).collect();
    prop_assert_eq!(seen, model);
    Ok(())
}

// Property: state-machine equivalence against the model holds for every
// registered hasher. One generated scenario is replayed once per hasher,
// which is the hasher-independence property in executable form.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_every_hasher((pool, ops) in arb_scenario()) {
        let registry = HasherRegistry::with_builtins();
        for name in registry.names().collect::<Vec<_>>() {
            let hasher = registry.get(name).unwrap();
            run_scenario(hasher, &pool, &ops)?;
        }
    }
}

// Worst-case distribution: every key lands in the same home bucket, so
// all collision resolution happens through the linear probe chain and
// tombstone transparency.
struct ConstHasher;
impl KeyHasher for ConstHasher {
    fn hash_key(&self, _key: &[u8]) -> u64 {
        0
    }
}

// Property: the same state-machine invariants hold under a constant
// hasher, stressing probe wraparound and tombstone reuse.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(Rc::new(ConstHasher), &pool, &ops)?;
    }
}

// Property: difference and equality agree with the model's set algebra
// for arbitrary key populations, including across different hashers per
// operand.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_set_algebra_matches_model(
        left in proptest::collection::hash_set("[a-z]{0,5}", 0..40),
        right in proptest::collection::hash_set("[a-z]{0,5}", 0..40),
    ) {
        let registry = HasherRegistry::with_builtins();
        let a = {
            let mut s = StrSet::with_hasher(registry.get("djb2").unwrap());
            s.extend(left.iter().map(String::as_str));
            s
        };
        let b = {
            let mut s = StrSet::with_hasher(registry.get("ahash").unwrap());
            s.extend(right.iter().map(String::as_str));
            s
        };

        let diff = a.difference(&b);
        let model_diff: HashSet<&str> = left.difference(&right).map(String::as_str).collect();
        prop_assert_eq!(diff.len(), model_diff.len());
        for key in &diff {
            prop_assert!(model_diff.contains(key));
        }

        // Equality parity, symmetric.
        prop_assert_eq!(a == b, left == right);
        prop_assert_eq!(b == a, left == right);

        // eq_keys against the model's contents, duplicates included.
        let mut literals: Vec<&str> = left.iter().map(String::as_str).collect();
        literals.extend(left.iter().map(String::as_str)); // duplicate every literal
        prop_assert!(a.eq_keys(&literals));
    }
}
