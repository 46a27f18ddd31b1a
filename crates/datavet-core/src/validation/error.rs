use crate::errors::{DatavetError, ExError};
use crate::validation::render;
use datavet_core_types::{Difference, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Differences stored under one key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffGroup {
    Single(Difference),
    List(Vec<Difference>),
}

impl DiffGroup {
    pub fn len(&self) -> usize {
        match self {
            DiffGroup::Single(_) => 1,
            DiffGroup::List(diffs) => diffs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Difference> {
        match self {
            DiffGroup::Single(diff) => std::slice::from_ref(diff).iter(),
            DiffGroup::List(diffs) => diffs.iter(),
        }
    }
}

impl From<Difference> for DiffGroup {
    fn from(diff: Difference) -> Self {
        DiffGroup::Single(diff)
    }
}

impl From<Vec<Difference>> for DiffGroup {
    fn from(diffs: Vec<Difference>) -> Self {
        DiffGroup::List(diffs)
    }
}

/// All differences of a failure: a flat list, or groups keyed by the data's
/// mapping keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Differences {
    List(Vec<Difference>),
    Mapping(#[serde(with = "mapping_entries")] BTreeMap<Value, DiffGroup>),
}

impl Differences {
    /// Total number of differences across all groups
    pub fn len(&self) -> usize {
        match self {
            Differences::List(diffs) => diffs.len(),
            Differences::Mapping(groups) => groups.values().map(DiffGroup::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Differences::Mapping(_))
    }

    pub fn as_list(&self) -> Option<&[Difference]> {
        match self {
            Differences::List(diffs) => Some(diffs),
            Differences::Mapping(_) => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<Value, DiffGroup>> {
        match self {
            Differences::Mapping(groups) => Some(groups),
            Differences::List(_) => None,
        }
    }
}

impl From<Difference> for Differences {
    fn from(diff: Difference) -> Self {
        Differences::List(vec![diff])
    }
}

impl From<Vec<Difference>> for Differences {
    fn from(diffs: Vec<Difference>) -> Self {
        Differences::List(diffs)
    }
}

impl From<DiffGroup> for Differences {
    fn from(group: DiffGroup) -> Self {
        match group {
            DiffGroup::Single(diff) => Differences::List(vec![diff]),
            DiffGroup::List(diffs) => Differences::List(diffs),
        }
    }
}

impl From<BTreeMap<Value, DiffGroup>> for Differences {
    fn from(groups: BTreeMap<Value, DiffGroup>) -> Self {
        Differences::Mapping(groups)
    }
}

impl From<BTreeMap<Value, Difference>> for Differences {
    fn from(groups: BTreeMap<Value, Difference>) -> Self {
        Differences::Mapping(
            groups
                .into_iter()
                .map(|(k, d)| (k, DiffGroup::Single(d)))
                .collect(),
        )
    }
}

impl From<BTreeMap<Value, Vec<Difference>>> for Differences {
    fn from(groups: BTreeMap<Value, Vec<Difference>>) -> Self {
        Differences::Mapping(
            groups
                .into_iter()
                .map(|(k, d)| (k, DiffGroup::List(d)))
                .collect(),
        )
    }
}

/// JSON objects only take string keys, so mappings serialize as entry lists.
mod mapping_entries {
    use super::DiffGroup;
    use datavet_core_types::Value;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        groups: &BTreeMap<Value, DiffGroup>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let entries: Vec<(&Value, &DiffGroup)> = groups.iter().collect();
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<Value, DiffGroup>, D::Error> {
        let entries: Vec<(Value, DiffGroup)> = Vec::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

/// Decides after each rendered line whether to stop: receives the number of
/// lines and characters emitted so far.
pub type TruncationFn = dyn Fn(usize, usize) -> bool + Send + Sync;

/// A failed validation: the differences found and what was violated
#[derive(Clone)]
pub struct ValidationError {
    differences: Differences,
    description: Option<String>,
    should_truncate: Option<Arc<TruncationFn>>,
    truncation_notice: Option<String>,
}

impl ValidationError {
    /// # Errors
    ///
    /// Returns `EmptyDifferences` when there is nothing to report or when a
    /// mapping holds an empty group.
    pub fn new(differences: impl Into<Differences>) -> Result<Self, ExError> {
        let differences = differences.into();
        let empty_group = differences
            .as_mapping()
            .is_some_and(|groups| groups.values().any(DiffGroup::is_empty));
        if differences.is_empty() || empty_group {
            return Err(ExError::from(DatavetError::EmptyDifferences).with_op("validation_error"));
        }
        Ok(Self {
            differences,
            description: None,
            should_truncate: None,
            truncation_notice: None,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_truncation<F>(mut self, should_truncate: F) -> Self
    where
        F: Fn(usize, usize) -> bool + Send + Sync + 'static,
    {
        self.should_truncate = Some(Arc::new(should_truncate));
        self
    }

    pub fn with_truncation_notice(mut self, notice: impl Into<String>) -> Self {
        self.truncation_notice = Some(notice.into());
        self
    }

    /// Copy truncation settings from another error.
    pub fn with_truncation_of(mut self, other: &ValidationError) -> Self {
        self.should_truncate = other.should_truncate.clone();
        self.truncation_notice = other.truncation_notice.clone();
        self
    }

    pub fn differences(&self) -> &Differences {
        &self.differences
    }

    pub fn into_differences(self) -> Differences {
        self.differences
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Differences and description, the two construction arguments
    pub fn args(&self) -> (&Differences, Option<&str>) {
        (&self.differences, self.description())
    }

    pub fn truncation(&self) -> Option<&Arc<TruncationFn>> {
        self.should_truncate.as_ref()
    }

    pub fn truncation_notice(&self) -> Option<&str> {
        self.truncation_notice.as_deref()
    }
}

impl PartialEq for ValidationError {
    fn eq(&self, other: &Self) -> bool {
        self.args() == other.args()
    }
}

/// Report form, see the rendering rules on [`render::write_report`].
impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render::write_report(self, f)
    }
}

/// Constructor form: `ValidationError([Missing('A')], 'desc')`.
impl fmt::Debug for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValidationError(")?;
        render::write_differences_repr(&self.differences, f)?;
        if let Some(description) = &self.description {
            write!(f, ", {}", Value::from(description.as_str()))?;
        }
        f.write_str(")")
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

    #[test]
    fn test_single_difference_becomes_list() {
        let err = ValidationError::new(Difference::missing("A")).unwrap();
        assert_eq!(
            err.differences(),
            &Differences::List(vec![Difference::missing("A")])
        );
    }

    #[test]
    fn test_empty_differences_rejected() {
        let err = ValidationError::new(Vec::<Difference>::new()).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::EmptyDifferences);
        assert_eq!(err.message(), "differences container must not be empty");

        let empty_groups: BTreeMap<Value, Vec<Difference>> =
            BTreeMap::from([(Value::from("a"), vec![])]);
        assert!(ValidationError::new(empty_groups).is_err());

        let one_empty: BTreeMap<Value, Vec<Difference>> = BTreeMap::from([
            (Value::from("a"), vec![Difference::missing(1)]),
            (Value::from("b"), vec![]),
        ]);
        assert!(ValidationError::new(one_empty).is_err());
    }

    #[test]
    fn test_debug_repr() {
        let err = ValidationError::new(vec![Difference::missing("A"), Difference::extra("B")])
            .unwrap()
            .with_description("invalid data");
        assert_eq!(
            format!("{err:?}"),
            "ValidationError([Missing('A'), Extra('B')], 'invalid data')"
        );

        let no_description = ValidationError::new(Difference::missing("A")).unwrap();
        assert_eq!(format!("{no_description:?}"), "ValidationError([Missing('A')])");

        let keyed = ValidationError::new(BTreeMap::from([
            (Value::from("a"), DiffGroup::Single(Difference::missing(1))),
            (
                Value::from("b"),
                DiffGroup::List(vec![Difference::extra(2), Difference::missing(3)]),
            ),
        ]))
        .unwrap();
        assert_eq!(
            format!("{keyed:?}"),
            "ValidationError({'a': Missing(1), 'b': [Extra(2), Missing(3)]})"
        );
    }

    #[test]
    fn test_mapping_serde_round_trip() {
        let diffs = Differences::from(BTreeMap::from([
            (Value::from("a"), Difference::missing(1)),
            (Value::from(("b", 2)), Difference::extra(2)),
        ]));
        let json = serde_json::to_string(&diffs).unwrap();
        let back: Differences = serde_json::from_str(&json).unwrap();
        assert_eq!(back, diffs);
    }
}
