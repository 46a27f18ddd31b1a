//! Requirements
//!
//! A [`Requirement`] is what data gets checked against. Values convert into
//! requirements by shape: sets check membership, lists check ordered
//! equality, maps reconcile key by key and everything else becomes a
//! [`Predicate`]. Before checking, a requirement is resolved into a
//! [`GroupMatcher`] that can be applied to any collection of values.

pub mod custom;
pub mod group;
pub mod opcodes;
pub mod predicate_group;
pub mod sequence_group;
pub mod set_group;

pub use custom::{GroupOutcome, GroupRequirement};
pub use group::{DiffStream, GroupFailure, GroupMatcher};

use crate::data::Query;
use crate::errors::{DatavetError, ExError};
use crate::predicate::Predicate;
use datavet_core_types::{Value, ValueKind};
use predicate_group::PredicateGroup;
use regex::Regex;
use sequence_group::SequenceGroup;
use set_group::SetGroup;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Description used when a failure carries none of its own
pub const DEFAULT_DESCRIPTION: &str = "does not satisfy requirement";

#[derive(Clone)]
pub enum Requirement {
    Predicate(Predicate),
    Set(BTreeSet<Value>),
    Sequence(Vec<Value>),
    /// Per-key requirements; only valid at the top level
    Mapping(BTreeMap<Value, Requirement>),
    Group(GroupMatcher),
    /// Fetched once, before validation starts
    Deferred(Arc<dyn Query>),
    /// A one-shot iterator; always rejected
    Exhaustible { type_name: String },
}

impl Requirement {
    pub fn mapping<I, K, R>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, R)>,
        K: Into<Value>,
        R: Into<Requirement>,
    {
        Requirement::Mapping(
            entries
                .into_iter()
                .map(|(k, r)| (k.into(), r.into()))
                .collect(),
        )
    }

    pub fn deferred(query: impl Query + 'static) -> Self {
        Requirement::Deferred(Arc::new(query))
    }

    /// Mark a one-shot iterator as a requirement. Validation rejects it,
    /// since it could only be consumed once across all keys.
    pub fn one_shot<I: Iterator>(_iter: I) -> Self {
        Requirement::Exhaustible {
            type_name: std::any::type_name::<I>().to_string(),
        }
    }

    /// Turn this requirement into a group matcher.
    ///
    /// Resolving an already resolved requirement returns it unchanged.
    ///
    /// # Errors
    ///
    /// Mapping, deferred and exhaustible requirements cannot be applied to
    /// a group and are rejected.
    pub fn resolve(self) -> Result<GroupMatcher, ExError> {
        match self {
            Requirement::Group(matcher) => Ok(matcher),
            Requirement::Predicate(predicate) => {
                Ok(GroupMatcher::Predicate(PredicateGroup::new(predicate)))
            }
            Requirement::Set(required) => Ok(GroupMatcher::Set(SetGroup::new(required))),
            Requirement::Sequence(required) => {
                Ok(GroupMatcher::Sequence(SequenceGroup::new(required)))
            }
            Requirement::Mapping(_) => Err(DatavetError::NestedMappingRequirement.into()),
            Requirement::Deferred(query) => Err(DatavetError::UnfetchedRequirement {
                name: query.name().to_string(),
            }
            .into()),
            Requirement::Exhaustible { type_name } => {
                Err(DatavetError::ExhaustibleRequirement { type_name }.into())
            }
        }
    }
}

impl fmt::Debug for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Predicate(p) => write!(f, "Predicate({p})"),
            Requirement::Set(s) => write!(f, "Set({})", Value::Set(s.clone())),
            Requirement::Sequence(v) => write!(f, "Sequence({})", Value::List(v.clone())),
            Requirement::Mapping(m) => f.debug_map().entries(m.iter()).finish(),
            Requirement::Group(g) => write!(f, "Group({g:?})"),
            Requirement::Deferred(q) => write!(f, "Deferred({})", q.name()),
            Requirement::Exhaustible { type_name } => write!(f, "Exhaustible({type_name})"),
        }
    }
}

impl From<Value> for Requirement {
    fn from(value: Value) -> Self {
        match value {
            Value::Set(members) => Requirement::Set(members),
            Value::List(items) => Requirement::Sequence(items),
            Value::Map(entries) => Requirement::Mapping(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Requirement::from(v)))
                    .collect(),
            ),
            other => Requirement::Predicate(Predicate::from(other)),
        }
    }
}

impl From<Predicate> for Requirement {
    fn from(predicate: Predicate) -> Self {
        Requirement::Predicate(predicate)
    }
}

impl From<ValueKind> for Requirement {
    fn from(kind: ValueKind) -> Self {
        Requirement::Predicate(Predicate::Kind(kind))
    }
}

impl From<GroupMatcher> for Requirement {
    fn from(matcher: GroupMatcher) -> Self {
        Requirement::Group(matcher)
    }
}

impl From<GroupRequirement> for Requirement {
    fn from(requirement: GroupRequirement) -> Self {
        Requirement::Group(GroupMatcher::Custom(requirement))
    }
}

impl From<Regex> for Requirement {
    fn from(regex: Regex) -> Self {
        Requirement::Predicate(Predicate::Regex(regex))
    }
}

impl From<BTreeSet<Value>> for Requirement {
    fn from(members: BTreeSet<Value>) -> Self {
        Requirement::Set(members)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Requirement {
    fn from(items: Vec<T>) -> Self {
        Requirement::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<Value, Requirement>> for Requirement {
    fn from(entries: BTreeMap<Value, Requirement>) -> Self {
        Requirement::Mapping(entries)
    }
}

impl From<&str> for Requirement {
    fn from(s: &str) -> Self {
        Requirement::from(Value::from(s))
    }
}

impl From<String> for Requirement {
    fn from(s: String) -> Self {
        Requirement::from(Value::from(s))
    }
}

impl From<i64> for Requirement {
    fn from(i: i64) -> Self {
        Requirement::from(Value::from(i))
    }
}

impl From<i32> for Requirement {
    fn from(i: i32) -> Self {
        Requirement::from(Value::from(i))
    }
}

impl From<f64> for Requirement {
    fn from(f: f64) -> Self {
        Requirement::from(Value::from(f))
    }
}

impl From<bool> for Requirement {
    fn from(b: bool) -> Self {
        Requirement::from(Value::from(b))
    }
}
