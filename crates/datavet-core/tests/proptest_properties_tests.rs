#![allow(clippy::unwrap_used, clippy::expect_used)]

use datavet_core::requirement::opcodes::{SequenceMatcher, Tag};
use datavet_core::{
    valid, validate, Acceptance, AcceptedArgs, AcceptedMissing, CombinedAcceptance, Difference,
    Differences, ValidationError, Value, VetError,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn small_values() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(0i64..6, 0..12)
}

fn missing_or_extra() -> impl Strategy<Value = Vec<Difference>> {
    prop::collection::vec(
        (any::<bool>(), 0i64..4).prop_map(|(missing, v)| {
            if missing {
                Difference::missing(v)
            } else {
                Difference::extra(v)
            }
        }),
        1..10,
    )
}

fn leftover(mut accepted: CombinedAcceptance, diffs: &[Difference]) -> Option<Differences> {
    let err = ValidationError::new(diffs.to_vec()).unwrap();
    accepted
        .filter(err)
        .unwrap()
        .map(|remaining| remaining.differences().clone())
}

proptest! {
    /// Replaying the opcodes over `a` rebuilds `b` exactly.
    #[test]
    fn prop_opcodes_transform_a_into_b(a in small_values(), b in small_values()) {
        let ops = SequenceMatcher::new(&a, &b).opcodes();
        let mut rebuilt = Vec::new();
        let mut last_i = 0;
        for op in ops {
            prop_assert_eq!(op.i1, last_i);
            last_i = op.i2;
            match op.tag {
                Tag::Equal => rebuilt.extend_from_slice(&a[op.i1..op.i2]),
                Tag::Delete => {}
                Tag::Insert | Tag::Replace => rebuilt.extend_from_slice(&b[op.j1..op.j2]),
            }
        }
        prop_assert_eq!(last_i, a.len());
        prop_assert_eq!(rebuilt, b);
    }

    /// A sequence always satisfies itself, and every mismatch is reported as
    /// indexed Missing/Extra pairs whose counts balance the lengths.
    #[test]
    fn prop_sequence_differences_balance(a in small_values(), b in small_values()) {
        prop_assert!(valid(a.clone(), Value::from(a.clone())).unwrap());

        match validate(a.clone(), Value::from(b.clone())) {
            Ok(()) => prop_assert_eq!(&a, &b),
            Err(VetError::Validation(err)) => {
                let diffs = err.differences().as_list().unwrap().to_vec();
                let missing = diffs.iter().filter(|d| matches!(d, Difference::Missing(_))).count();
                let extra = diffs.iter().filter(|d| matches!(d, Difference::Extra(_))).count();
                prop_assert_eq!(a.len() + missing, b.len() + extra);
                for diff in &diffs {
                    let (Difference::Missing(Value::Tuple(pair)) | Difference::Extra(Value::Tuple(pair))) = diff else {
                        return Err(TestCaseError::fail(format!("unexpected difference {diff}")));
                    };
                    prop_assert_eq!(pair.len(), 2);
                }
            }
            Err(VetError::Fault(fault)) => {
                return Err(TestCaseError::fail(format!("unexpected fault {fault}")));
            }
        }
    }

    /// Set differences are exactly the two set differences.
    #[test]
    fn prop_set_differences_match_set_algebra(a in small_values(), b in small_values()) {
        let actual: BTreeSet<i64> = a.iter().copied().collect();
        let required: BTreeSet<i64> = b.iter().copied().collect();
        let requirement = Value::set(required.iter().copied());

        match validate(a.clone(), requirement) {
            Ok(()) => prop_assert_eq!(&actual, &required),
            Err(VetError::Validation(err)) => {
                let diffs = err.differences().as_list().unwrap();
                let expected_missing: Vec<Difference> =
                    required.difference(&actual).map(|v| Difference::missing(*v)).collect();
                let expected_extra: Vec<Difference> =
                    actual.difference(&required).map(|v| Difference::extra(*v)).collect();
                let missing: Vec<Difference> =
                    diffs.iter().filter(|d| matches!(d, Difference::Missing(_))).cloned().collect();
                let mut extra: Vec<Difference> =
                    diffs.iter().filter(|d| matches!(d, Difference::Extra(_))).cloned().collect();
                extra.sort();
                prop_assert_eq!(missing, expected_missing);
                prop_assert_eq!(extra, expected_extra);
            }
            Err(VetError::Fault(fault)) => {
                return Err(TestCaseError::fail(format!("unexpected fault {fault}")));
            }
        }
    }

    /// Combining two acceptances gives the same result in either order.
    #[test]
    fn prop_combined_acceptance_is_order_independent(diffs in missing_or_extra()) {
        let small_args = || AcceptedArgs::new(Value::set([0i64, 1]));
        prop_assert_eq!(
            leftover(CombinedAcceptance::union(AcceptedMissing::new(), small_args()), &diffs),
            leftover(CombinedAcceptance::union(small_args(), AcceptedMissing::new()), &diffs)
        );
        prop_assert_eq!(
            leftover(CombinedAcceptance::intersection(AcceptedMissing::new(), small_args()), &diffs),
            leftover(CombinedAcceptance::intersection(small_args(), AcceptedMissing::new()), &diffs)
        );
    }
}
