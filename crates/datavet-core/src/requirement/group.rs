//! Group matchers
//!
//! A group matcher checks a whole collection of candidate values at once and
//! reports a lazy stream of differences plus a description of the failure.

use crate::errors::ExError;
use crate::requirement::custom::GroupRequirement;
use crate::requirement::predicate_group::PredicateGroup;
use crate::requirement::sequence_group::SequenceGroup;
use crate::requirement::set_group::SetGroup;
use datavet_core_types::{Difference, Value};
use std::fmt;

pub type DiffResult = Result<Difference, ExError>;

/// Lazily produced differences with one item of lookahead.
///
/// Errors raised while producing a difference (e.g. by a user predicate)
/// surface as `Err` items when the stream is consumed.
pub struct DiffStream {
    inner: Box<dyn Iterator<Item = DiffResult>>,
    peeked: Option<DiffResult>,
}

impl DiffStream {
    pub fn new<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = DiffResult>,
        I::IntoIter: 'static,
    {
        Self {
            inner: Box::new(iter.into_iter()),
            peeked: None,
        }
    }

    pub fn from_differences(differences: Vec<Difference>) -> Self {
        Self::new(differences.into_iter().map(Ok))
    }

    /// True when the stream yields nothing. Pulls at most one item.
    pub fn is_empty(&mut self) -> bool {
        if self.peeked.is_none() {
            self.peeked = self.inner.next();
        }
        self.peeked.is_none()
    }

    /// Drain the stream, stopping at the first error.
    pub fn try_collect(self) -> Result<Vec<Difference>, ExError> {
        self.collect()
    }
}

impl Iterator for DiffStream {
    type Item = DiffResult;

    fn next(&mut self) -> Option<DiffResult> {
        self.peeked.take().or_else(|| self.inner.next())
    }
}

impl fmt::Debug for DiffStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiffStream")
            .field("peeked", &self.peeked)
            .finish_non_exhaustive()
    }
}

/// A failed group check
#[derive(Debug)]
pub struct GroupFailure {
    pub differences: DiffStream,
    pub description: String,
}

/// A requirement that applies to a whole group of values
#[derive(Clone, Debug)]
pub enum GroupMatcher {
    /// Every candidate must satisfy the predicate
    Predicate(PredicateGroup),
    /// Candidates must cover the set and contain nothing else
    Set(SetGroup),
    /// Candidates must equal the sequence, in order
    Sequence(SequenceGroup),
    /// User group function
    Custom(GroupRequirement),
}

impl GroupMatcher {
    /// Check a group of candidates. `None` means the group satisfies the
    /// requirement.
    ///
    /// # Errors
    ///
    /// Errors raised eagerly by custom group functions propagate. Errors
    /// raised by predicates surface through the returned stream.
    pub fn check(&self, candidates: Vec<Value>) -> Result<Option<GroupFailure>, ExError> {
        self.check_with(candidates, false)
    }

    /// As [`GroupMatcher::check`]; `show_expected` makes predicate failures
    /// carry the expected value.
    pub fn check_with(
        &self,
        candidates: Vec<Value>,
        show_expected: bool,
    ) -> Result<Option<GroupFailure>, ExError> {
        let (mut differences, description) = match self {
            GroupMatcher::Predicate(group) => (
                group.filter_false(candidates, show_expected),
                group.description(),
            ),
            GroupMatcher::Set(group) => (group.filter_false(candidates), group.description()),
            GroupMatcher::Sequence(group) => {
                (group.filter_false(candidates), group.description())
            }
            GroupMatcher::Custom(group) => return group.check(&candidates),
        };
        if differences.is_empty() {
            return Ok(None);
        }
        Ok(Some(GroupFailure {
            differences,
            description,
        }))
    }

    /// Value reported as `Missing` when a required key has no data at all.
    pub fn expected_value(&self) -> Value {
        match self {
            GroupMatcher::Predicate(group) => {
                let predicate = group.predicate();
                predicate
                    .obj()
                    .unwrap_or_else(|| Value::Str(predicate.to_string()))
            }
            GroupMatcher::Set(group) => Value::Set(group.required().clone()),
            GroupMatcher::Sequence(group) => Value::List(group.required().to_vec()),
            GroupMatcher::Custom(group) => Value::Str(group.name().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

    #[test]
    fn test_stream_is_empty_does_not_lose_items() {
        let mut stream = DiffStream::from_differences(vec![Difference::missing(1)]);
        assert!(!stream.is_empty());
        assert!(!stream.is_empty());
        assert_eq!(stream.try_collect().unwrap(), vec![Difference::missing(1)]);
    }

    #[test]
    fn test_stream_surfaces_errors_on_collect() {
        let items: Vec<DiffResult> = vec![
            Ok(Difference::extra("a")),
            Err(ExError::new(ExErrorKind::PredicateFailed)),
        ];
        let mut stream = DiffStream::new(items);
        assert!(!stream.is_empty());
        let err = stream.try_collect().unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::PredicateFailed);
    }
}
