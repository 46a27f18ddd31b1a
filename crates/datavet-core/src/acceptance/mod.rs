//! Acceptances
//!
//! An [`Acceptance`] removes expected differences from a
//! [`ValidationError`]. Differences are flattened into `(key, difference)`
//! items, fed through the acceptance's predicate group by group, and the
//! rejected items are rebuilt into a new error. When nothing remains the
//! failure is suppressed.
//!
//! Acceptances compose with [`CombinedAcceptance`]: a union keeps only the
//! items both sides reject, an intersection keeps the items either side
//! rejects.

pub mod accepted;
pub mod combined;
pub mod fuzzy;
pub mod limit;
pub mod specific;
pub mod tolerance;

pub use accepted::{AcceptedArgs, AcceptedExtra, AcceptedInvalid, AcceptedKeys, AcceptedMissing};
pub use combined::{CombinedAcceptance, Combinator};
pub use fuzzy::AcceptedFuzzy;
pub use limit::AcceptedLimit;
pub use specific::{AcceptedSpecific, Selector};
pub use tolerance::{AcceptedDeviation, AcceptedPercent};

use crate::errors::{ExError, VetError};
use crate::validation::{DiffGroup, Differences, ValidationError};
use datavet_core_types::{Difference, Value};
use std::collections::BTreeMap;

pub const DEFAULT_PRIORITY: u32 = 100;
pub const SPECIFIC_PRIORITY: u32 = 200;
pub const LIMIT_PRIORITY: u32 = 300;

/// A flattened difference: its mapping key (`None` for list differences)
/// and the difference itself
pub type Item = (Option<Value>, Difference);

pub trait Acceptance {
    /// Composite acceptances evaluate their lower-priority side first
    fn priority(&self) -> u32 {
        DEFAULT_PRIORITY
    }

    /// Prefix for the description of a filtered failure
    fn msg(&self) -> Option<&str> {
        None
    }

    fn start_collection(&mut self) -> Result<(), ExError> {
        Ok(())
    }

    fn start_group(&mut self, _key: Option<&Value>) -> Result<(), ExError> {
        Ok(())
    }

    /// True when the item is accepted.
    ///
    /// # Errors
    ///
    /// Errors raised by user predicates propagate.
    fn call_predicate(&mut self, item: &Item) -> Result<bool, ExError>;

    fn end_group(&mut self, _key: Option<&Value>) -> Result<(), ExError> {
        Ok(())
    }

    fn end_collection(&mut self) -> Result<(), ExError> {
        Ok(())
    }

    /// Run one pass over `items` and return the rejected ones, in order.
    ///
    /// Consecutive items with equal keys form a group.
    ///
    /// # Errors
    ///
    /// Errors from any hook or predicate abort the pass.
    fn filter_items(&mut self, items: Vec<Item>) -> Result<Vec<Item>, ExError> {
        self.start_collection()?;
        let mut rejected = Vec::new();
        let mut iter = items.into_iter().peekable();
        while let Some(first) = iter.next() {
            let key = first.0.clone();
            self.start_group(key.as_ref())?;
            let mut current = Some(first);
            while let Some(item) = current.take() {
                if !self.call_predicate(&item)? {
                    rejected.push(item);
                }
                current = iter.next_if(|next| next.0 == key);
            }
            self.end_group(key.as_ref())?;
        }
        self.end_collection()?;
        Ok(rejected)
    }

    /// Filter a failure. `None` means every difference was accepted.
    ///
    /// The remaining differences keep the failure's shape: list
    /// differences stay a list, mapping differences regroup by key with a
    /// lone difference stored unwrapped. The description gains this
    /// acceptance's message as a prefix and truncation settings carry over.
    ///
    /// # Errors
    ///
    /// Errors from hooks and predicates propagate.
    fn filter(&mut self, error: ValidationError) -> Result<Option<ValidationError>, ExError> {
        let is_mapping = error.differences().is_mapping();
        let items = flatten(error.differences());
        let total = items.len();
        let remaining = self.filter_items(items)?;
        tracing::debug!(
            component = module_path!(),
            op = "accept",
            accepted = total - remaining.len(),
            remaining = remaining.len(),
            priority = self.priority(),
        );
        if remaining.is_empty() {
            return Ok(None);
        }

        let description = match (self.msg(), error.description()) {
            (Some(msg), Some(original)) => Some(format!("{msg}: {original}")),
            (Some(msg), None) => Some(msg.to_string()),
            (None, original) => original.map(str::to_string),
        };
        let mut filtered = ValidationError::new(regroup(remaining, is_mapping))?
            .with_truncation_of(&error);
        if let Some(description) = description {
            filtered = filtered.with_description(description);
        }
        Ok(Some(filtered))
    }

    /// Run `f` and filter any validation failure it returns.
    ///
    /// Faults pass through untouched.
    ///
    /// # Errors
    ///
    /// The filtered failure when differences remain, or any fault.
    fn scope<F>(&mut self, f: F) -> Result<(), VetError>
    where
        F: FnOnce() -> Result<(), VetError>,
        Self: Sized,
    {
        match f() {
            Ok(()) => Ok(()),
            Err(VetError::Validation(err)) => match self.filter(err)? {
                Some(remaining) => Err(VetError::Validation(remaining)),
                None => Ok(()),
            },
            Err(fault) => Err(fault),
        }
    }
}

impl<A: Acceptance + ?Sized> Acceptance for Box<A> {
    fn priority(&self) -> u32 {
        (**self).priority()
    }

    fn msg(&self) -> Option<&str> {
        (**self).msg()
    }

    fn start_collection(&mut self) -> Result<(), ExError> {
        (**self).start_collection()
    }

    fn start_group(&mut self, key: Option<&Value>) -> Result<(), ExError> {
        (**self).start_group(key)
    }

    fn call_predicate(&mut self, item: &Item) -> Result<bool, ExError> {
        (**self).call_predicate(item)
    }

    fn end_group(&mut self, key: Option<&Value>) -> Result<(), ExError> {
        (**self).end_group(key)
    }

    fn end_collection(&mut self) -> Result<(), ExError> {
        (**self).end_collection()
    }
}

/// Flatten differences into items, keys in order.
pub fn flatten(differences: &Differences) -> Vec<Item> {
    match differences {
        Differences::List(diffs) => diffs.iter().map(|d| (None, d.clone())).collect(),
        Differences::Mapping(groups) => groups
            .iter()
            .flat_map(|(key, group)| group.iter().map(move |d| (Some(key.clone()), d.clone())))
            .collect(),
    }
}

/// Rebuild differences from items.
pub fn regroup(items: Vec<Item>, is_mapping: bool) -> Differences {
    if !is_mapping {
        return Differences::List(items.into_iter().map(|(_, d)| d).collect());
    }
    let mut groups: BTreeMap<Value, Vec<Difference>> = BTreeMap::new();
    for (key, diff) in items {
        groups.entry(key.unwrap_or(Value::Null)).or_default().push(diff);
    }
    Differences::Mapping(
        groups
            .into_iter()
            .map(|(key, mut diffs)| {
                let group = if diffs.len() == 1 {
                    DiffGroup::Single(diffs.remove(0))
                } else {
                    DiffGroup::List(diffs)
                };
                (key, group)
            })
            .collect(),
    )
}
