use crate::requirement::group::DiffStream;
use crate::requirement::opcodes::{SequenceMatcher, Tag};
use datavet_core_types::{Difference, Value};

/// Ordered equality against a required sequence
#[derive(Clone, Debug)]
pub struct SequenceGroup {
    required: Vec<Value>,
}

impl SequenceGroup {
    pub fn new(required: Vec<Value>) -> Self {
        Self { required }
    }

    pub fn required(&self) -> &[Value] {
        &self.required
    }

    pub fn description(&self) -> String {
        "does not match required sequence".to_string()
    }

    /// Differences carry `(index, value)` tuples.
    ///
    /// The index of an `Extra` is its position in the candidates; the index
    /// of a `Missing` is the candidate position where the required value
    /// should have appeared.
    pub fn filter_false(&self, candidates: Vec<Value>) -> DiffStream {
        let matcher = SequenceMatcher::new(&candidates, &self.required);
        let mut differences = Vec::new();
        for op in matcher.opcodes() {
            match op.tag {
                Tag::Equal => {}
                Tag::Insert => {
                    for value in &self.required[op.j1..op.j2] {
                        differences.push(Difference::Missing(indexed(op.i1, value)));
                    }
                }
                Tag::Delete => {
                    for (offset, value) in candidates[op.i1..op.i2].iter().enumerate() {
                        differences.push(Difference::Extra(indexed(op.i1 + offset, value)));
                    }
                }
                Tag::Replace => {
                    let actual = &candidates[op.i1..op.i2];
                    let expected = &self.required[op.j1..op.j2];
                    let paired = actual.len().min(expected.len());
                    for (offset, (a, e)) in actual.iter().zip(expected).enumerate() {
                        let index = op.i1 + offset;
                        differences.push(Difference::Missing(indexed(index, e)));
                        differences.push(Difference::Extra(indexed(index, a)));
                    }
                    for value in &expected[paired..] {
                        differences.push(Difference::Missing(indexed(op.i2, value)));
                    }
                    for (offset, value) in actual[paired..].iter().enumerate() {
                        differences.push(Difference::Extra(indexed(op.i1 + paired + offset, value)));
                    }
                }
            }
        }
        DiffStream::from_differences(differences)
    }
}

fn indexed(index: usize, value: &Value) -> Value {
    Value::Tuple(vec![Value::from(index), value.clone()])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diffs(candidates: &[&str], required: &[&str]) -> Vec<Difference> {
        SequenceGroup::new(required.iter().map(|s| Value::from(*s)).collect())
            .filter_false(candidates.iter().map(|s| Value::from(*s)).collect())
            .try_collect()
            .unwrap()
    }

    #[test]
    fn test_equal_sequences_pass() {
        assert!(diffs(&["a", "b"], &["a", "b"]).is_empty());
    }

    #[test]
    fn test_insert_and_delete() {
        assert_eq!(
            diffs(&["a", "b", "c"], &["a", "b", "c", "d"]),
            vec![Difference::missing((3, "d"))]
        );
        assert_eq!(
            diffs(&["a", "x", "b"], &["a", "b"]),
            vec![Difference::extra((1, "x"))]
        );
    }

    #[test]
    fn test_replace_pairs_then_leftovers() {
        assert_eq!(
            diffs(&["a", "x", "d"], &["a", "b", "c", "d"]),
            vec![
                Difference::missing((1, "b")),
                Difference::extra((1, "x")),
                Difference::missing((2, "c")),
            ]
        );
        assert_eq!(
            diffs(&["a", "x", "y", "d"], &["a", "b", "d"]),
            vec![
                Difference::missing((1, "b")),
                Difference::extra((1, "x")),
                Difference::extra((2, "y")),
            ]
        );
    }
}
