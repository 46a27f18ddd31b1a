//! Acceptance of an explicit catalogue of differences
//!
//! A list catalogue applies to every group afresh. A keyed catalogue maps
//! selectors to lists: an exact key selector applies to its own group
//! only, while a matching selector holds one budget shared by every group
//! whose key it matches. Catalogues are multisets: each listed difference
//! accepts one occurrence.

use crate::acceptance::{Acceptance, Item, SPECIFIC_PRIORITY};
use crate::errors::{DatavetError, ExError};
use crate::predicate::Predicate;
use crate::validation::{DiffGroup, Differences};
use datavet_core_types::{Difference, Value};
use std::collections::BTreeMap;

/// Chooses which groups a keyed catalogue entry applies to
#[derive(Debug, Clone)]
pub enum Selector {
    Key(Value),
    Matching(Predicate),
}

impl Selector {
    pub fn key(key: impl Into<Value>) -> Self {
        Selector::Key(key.into())
    }

    pub fn matching(predicate: impl Into<Predicate>) -> Self {
        Selector::Matching(predicate.into())
    }

    /// Matches every key
    pub fn any() -> Self {
        Selector::Matching(Predicate::Any)
    }
}

#[derive(Debug, Clone)]
enum Catalogue {
    List(Vec<Difference>),
    Keyed {
        exact: BTreeMap<Value, Vec<Difference>>,
        matching: Vec<(Predicate, Vec<Difference>)>,
    },
}

/// Which budget the current group draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Budget {
    Nothing,
    Local,
    Shared(usize),
}

#[derive(Debug, Clone)]
pub struct AcceptedSpecific {
    catalogue: Catalogue,
    local: Vec<Difference>,
    shared: Vec<Vec<Difference>>,
    current: Budget,
    msg: Option<String>,
}

impl AcceptedSpecific {
    /// A list catalogue, applied to each group separately.
    pub fn new(differences: impl IntoIterator<Item = Difference>) -> Self {
        Self::with_catalogue(Catalogue::List(differences.into_iter().collect()))
    }

    /// A keyed catalogue.
    pub fn keyed<I, D>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Selector, D)>,
        D: IntoIterator<Item = Difference>,
    {
        let mut exact = BTreeMap::new();
        let mut matching = Vec::new();
        for (selector, differences) in entries {
            let differences: Vec<Difference> = differences.into_iter().collect();
            match selector {
                Selector::Key(key) => {
                    exact.insert(key, differences);
                }
                Selector::Matching(predicate) => matching.push((predicate, differences)),
            }
        }
        Self::with_catalogue(Catalogue::Keyed { exact, matching })
    }

    /// Accept exactly the differences of an earlier failure: a list
    /// becomes a list catalogue, a mapping a keyed one.
    pub fn from_differences(differences: Differences) -> Self {
        match differences {
            Differences::List(diffs) => Self::new(diffs),
            Differences::Mapping(groups) => Self::keyed(groups.into_iter().map(|(key, group)| {
                let diffs = match group {
                    DiffGroup::Single(diff) => vec![diff],
                    DiffGroup::List(diffs) => diffs,
                };
                (Selector::Key(key), diffs)
            })),
        }
    }

    fn with_catalogue(catalogue: Catalogue) -> Self {
        Self {
            catalogue,
            local: Vec::new(),
            shared: Vec::new(),
            current: Budget::Nothing,
            msg: None,
        }
    }

    pub fn with_msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }

    fn budget_for(&self, key: Option<&Value>) -> Result<Budget, ExError> {
        let Catalogue::Keyed { exact, matching } = &self.catalogue else {
            return Ok(Budget::Local);
        };
        let Some(key) = key else {
            return Err(DatavetError::CatalogueShape.into());
        };
        if exact.contains_key(key) {
            return Ok(Budget::Local);
        }
        let mut hits = Vec::new();
        for (index, (predicate, _)) in matching.iter().enumerate() {
            if predicate.matches(key)?.is_pass() {
                hits.push(index);
            }
        }
        match hits.as_slice() {
            [] => Ok(Budget::Nothing),
            [index] => Ok(Budget::Shared(*index)),
            _ => Err(DatavetError::KeyCollision {
                key: key.to_string(),
                predicates: hits.iter().map(|&i| matching[i].0.to_string()).collect(),
            }
            .into()),
        }
    }
}

impl From<Difference> for AcceptedSpecific {
    fn from(difference: Difference) -> Self {
        Self::new([difference])
    }
}

impl Acceptance for AcceptedSpecific {
    fn priority(&self) -> u32 {
        SPECIFIC_PRIORITY
    }

    fn msg(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    fn start_collection(&mut self) -> Result<(), ExError> {
        self.shared = match &self.catalogue {
            Catalogue::Keyed { matching, .. } => {
                matching.iter().map(|(_, diffs)| diffs.clone()).collect()
            }
            Catalogue::List(_) => Vec::new(),
        };
        Ok(())
    }

    fn start_group(&mut self, key: Option<&Value>) -> Result<(), ExError> {
        self.current = self.budget_for(key)?;
        self.local = match (&self.catalogue, self.current) {
            (Catalogue::List(diffs), _) => diffs.clone(),
            (Catalogue::Keyed { exact, .. }, Budget::Local) => {
                key.and_then(|k| exact.get(k)).cloned().unwrap_or_default()
            }
            _ => Vec::new(),
        };
        Ok(())
    }

    fn call_predicate(&mut self, item: &Item) -> Result<bool, ExError> {
        let budget = match self.current {
            Budget::Nothing => return Ok(false),
            Budget::Local => &mut self.local,
            Budget::Shared(index) => match self.shared.get_mut(index) {
                Some(budget) => budget,
                None => return Ok(false),
            },
        };
        match budget.iter().position(|d| d == &item.1) {
            Some(position) => {
                budget.remove(position);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn end_group(&mut self, _key: Option<&Value>) -> Result<(), ExError> {
        self.current = Budget::Nothing;
        self.local.clear();
        Ok(())
    }
}
