use crate::predicate::{Outcome, Predicate};
use crate::requirement::group::DiffStream;
use datavet_core_types::{Difference, Value};

/// Applies one predicate to every candidate
#[derive(Clone, Debug)]
pub struct PredicateGroup {
    predicate: Predicate,
}

impl PredicateGroup {
    pub fn new(predicate: Predicate) -> Self {
        Self { predicate }
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn description(&self) -> String {
        self.predicate.description()
    }

    /// One difference per failing candidate, in candidate order.
    ///
    /// A plain failure becomes a [`Difference::make`] against the
    /// predicate's value, or `Invalid(candidate)` when it has none. A
    /// difference returned by the predicate is used as is.
    pub fn filter_false(&self, candidates: Vec<Value>, show_expected: bool) -> DiffStream {
        let predicate = self.predicate.clone();
        let expected = predicate.obj();
        DiffStream::new(candidates.into_iter().filter_map(move |candidate| {
            match predicate.matches(&candidate) {
                Ok(Outcome::Pass) => None,
                Ok(Outcome::Diff(diff)) => Some(Ok(diff)),
                Ok(Outcome::Fail) => Some(Ok(match &expected {
                    Some(expected) => Difference::make(candidate, expected.clone(), show_expected),
                    None => Difference::invalid(candidate),
                })),
                Err(err) => Some(Err(err)),
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(predicate: Predicate, candidates: Vec<Value>) -> Vec<Difference> {
        PredicateGroup::new(predicate)
            .filter_false(candidates, false)
            .try_collect()
            .unwrap()
    }

    #[test]
    fn test_equality_failures() {
        let diffs = run(
            Predicate::from("A"),
            vec![Value::from("A"), Value::from("B"), Value::from("A")],
        );
        assert_eq!(diffs, vec![Difference::invalid("B")]);
    }

    #[test]
    fn test_numeric_failures_become_deviations() {
        let diffs = run(Predicate::from(Value::Int(10)), vec![Value::Int(12), Value::Int(10)]);
        assert_eq!(diffs, vec![Difference::deviation(2, 10)]);
    }

    #[test]
    fn test_function_failures_carry_no_expected_value() {
        let is_even = Predicate::from_fn("is_even", |v| matches!(v, Value::Int(i) if i % 2 == 0));
        let diffs = run(is_even, vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(diffs, vec![Difference::invalid(1)]);
    }
}
