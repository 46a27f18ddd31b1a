//! Application of requirements to normalized data
//!
//! Produces the differences and description for a failure, without
//! building the error itself.

use crate::data::Candidates;
use crate::errors::ExError;
use crate::requirement::{GroupMatcher, Requirement, DEFAULT_DESCRIPTION};
use crate::validation::{DiffGroup, Differences};
use datavet_core_types::{Difference, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Where a group's description came from. Synthesized `Missing` groups for
/// absent keys carry no description of their own.
#[derive(Debug, Clone, PartialEq)]
enum Source {
    Described(String),
    AbsentKey,
}

pub(crate) struct Reconciled {
    pub differences: Differences,
    pub description: Option<String>,
}

/// Check one group of candidates.
///
/// A single base element is checked with the expected value shown and its
/// lone difference is unwrapped; a collection yields a list.
pub(crate) fn apply_to_group(
    candidates: Candidates,
    matcher: &GroupMatcher,
) -> Result<Option<(DiffGroup, String)>, ExError> {
    match candidates {
        Candidates::Single(value) => {
            let Some(failure) = matcher.check_with(vec![value], true)? else {
                return Ok(None);
            };
            let mut diffs = failure.differences.try_collect()?;
            let group = if diffs.len() == 1 {
                DiffGroup::Single(diffs.remove(0))
            } else {
                DiffGroup::List(diffs)
            };
            Ok(Some((group, failure.description)))
        }
        Candidates::Many(values) => {
            let Some(failure) = matcher.check_with(values, false)? else {
                return Ok(None);
            };
            let diffs = failure.differences.try_collect()?;
            Ok(Some((DiffGroup::List(diffs), failure.description)))
        }
    }
}

/// Apply one requirement to every value of keyed data.
pub(crate) fn apply_to_mapping(
    items: Vec<(Value, Value)>,
    requirement: Requirement,
) -> Result<Option<Reconciled>, ExError> {
    let matcher = requirement.resolve()?;
    let mut groups = BTreeMap::new();
    let mut sources = Vec::new();
    for (key, value) in items {
        let candidates = Candidates::for_key(value, &key)?;
        let result = apply_to_group(candidates, &matcher).map_err(|e| with_key(e, &key))?;
        if let Some((group, description)) = result {
            groups.insert(key, group);
            sources.push(Source::Described(description));
        }
    }
    Ok(finish(groups, &sources))
}

/// Reconcile keyed data against a mapping requirement.
///
/// Keys present only in the data report their values as `Extra`. Keys
/// present only in the requirement are checked against an empty group; if
/// that passes, the key reports `Missing` of the expected value.
pub(crate) fn apply_mapping_to_mapping(
    items: Vec<(Value, Value)>,
    requirements: BTreeMap<Value, Requirement>,
) -> Result<Option<Reconciled>, ExError> {
    let mut groups = BTreeMap::new();
    let mut sources = Vec::new();
    let mut seen = BTreeSet::new();

    for (key, value) in items {
        let candidates = Candidates::for_key(value, &key)?;
        let result = match requirements.get(&key) {
            Some(requirement) => {
                let matcher = requirement.clone().resolve().map_err(|e| with_key(e, &key))?;
                apply_to_group(candidates, &matcher).map_err(|e| with_key(e, &key))?
            }
            None => unexpected(candidates),
        };
        seen.insert(key.clone());
        if let Some((group, description)) = result {
            groups.insert(key, group);
            sources.push(Source::Described(description));
        }
    }

    for (key, requirement) in requirements {
        if seen.contains(&key) {
            continue;
        }
        let matcher = requirement.resolve().map_err(|e| with_key(e, &key))?;
        match apply_to_group(Candidates::Many(Vec::new()), &matcher)
            .map_err(|e| with_key(e, &key))?
        {
            Some((group, description)) => {
                groups.insert(key, group);
                sources.push(Source::Described(description));
            }
            None => {
                let missing = Difference::Missing(matcher.expected_value());
                groups.insert(key, DiffGroup::Single(missing));
                sources.push(Source::AbsentKey);
            }
        }
    }
    Ok(finish(groups, &sources))
}

fn unexpected(candidates: Candidates) -> Option<(DiffGroup, String)> {
    let group = match candidates {
        Candidates::Single(value) => DiffGroup::Single(Difference::Extra(value)),
        Candidates::Many(values) if values.is_empty() => return None,
        Candidates::Many(values) => {
            DiffGroup::List(values.into_iter().map(Difference::Extra).collect())
        }
    };
    Some((group, DEFAULT_DESCRIPTION.to_string()))
}

fn with_key(err: ExError, key: &Value) -> ExError {
    if err.key().is_some() {
        return err;
    }
    err.with_key(key.to_string())
}

fn finish(groups: BTreeMap<Value, DiffGroup>, sources: &[Source]) -> Option<Reconciled> {
    if groups.is_empty() {
        return None;
    }
    Some(Reconciled {
        differences: Differences::Mapping(groups),
        description: merge_descriptions(sources),
    })
}

/// The shared description of all described groups, or `None` when they
/// disagree or there are none.
fn merge_descriptions(sources: &[Source]) -> Option<String> {
    let mut described = sources.iter().filter_map(|s| match s {
        Source::Described(text) => Some(text),
        Source::AbsentKey => None,
    });
    let first = described.next()?;
    if described.all(|text| text == first) {
        Some(first.clone())
    } else {
        None
    }
}
