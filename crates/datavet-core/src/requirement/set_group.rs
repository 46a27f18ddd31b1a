use crate::requirement::group::DiffStream;
use datavet_core_types::{Difference, Value};
use std::collections::BTreeSet;

/// Set membership: every required value must appear and no other value may
#[derive(Clone, Debug)]
pub struct SetGroup {
    required: BTreeSet<Value>,
}

impl SetGroup {
    pub fn new(required: BTreeSet<Value>) -> Self {
        Self { required }
    }

    pub fn required(&self) -> &BTreeSet<Value> {
        &self.required
    }

    pub fn description(&self) -> String {
        "does not satisfy set membership".to_string()
    }

    /// `Missing` for each uncovered required value, in set order, followed
    /// by one `Extra` per distinct unexpected candidate, in order of first
    /// appearance.
    pub fn filter_false(&self, candidates: Vec<Value>) -> DiffStream {
        let mut matched = BTreeSet::new();
        let mut seen_extra = BTreeSet::new();
        let mut extras = Vec::new();
        for candidate in candidates {
            if self.required.contains(&candidate) {
                matched.insert(candidate);
            } else if seen_extra.insert(candidate.clone()) {
                extras.push(Difference::Extra(candidate));
            }
        }

        let mut differences: Vec<Difference> = self
            .required
            .difference(&matched)
            .cloned()
            .map(Difference::Missing)
            .collect();
        differences.extend(extras);
        DiffStream::from_differences(differences)
    }
}
