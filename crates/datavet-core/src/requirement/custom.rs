use crate::errors::ExError;
use crate::requirement::group::{DiffStream, GroupFailure};
use crate::requirement::DEFAULT_DESCRIPTION;
use datavet_core_types::{Difference, Value};
use std::fmt;
use std::sync::Arc;

/// What a custom group function reports
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupOutcome {
    differences: Vec<Difference>,
    description: Option<String>,
}

impl GroupOutcome {
    /// No differences
    pub fn pass() -> Self {
        Self::default()
    }

    pub fn new(differences: Vec<Difference>) -> Self {
        Self {
            differences,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl From<Vec<Difference>> for GroupOutcome {
    fn from(differences: Vec<Difference>) -> Self {
        Self::new(differences)
    }
}

pub type GroupFn = dyn Fn(&[Value]) -> Result<GroupOutcome, ExError> + Send + Sync;

/// A named user function that checks a whole group of values
#[derive(Clone)]
pub struct GroupRequirement {
    name: String,
    func: Arc<GroupFn>,
}

impl GroupRequirement {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<GroupOutcome, ExError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when both handles wrap the same function object
    pub fn same_as(&self, other: &GroupRequirement) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }

    /// # Errors
    ///
    /// Errors raised by the group function propagate unchanged.
    pub fn check(&self, candidates: &[Value]) -> Result<Option<GroupFailure>, ExError> {
        let outcome = (self.func)(candidates)?;
        if outcome.differences.is_empty() {
            return Ok(None);
        }
        Ok(Some(GroupFailure {
            differences: DiffStream::from_differences(outcome.differences),
            description: outcome
                .description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        }))
    }
}

impl fmt::Debug for GroupRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupRequirement")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn require_two() -> GroupRequirement {
        GroupRequirement::new("require_two", |values| {
            if values.len() == 2 {
                Ok(GroupOutcome::pass())
            } else {
                Ok(GroupOutcome::new(vec![Difference::invalid(values.len())])
                    .with_description("needs exactly two values"))
            }
        })
    }

    #[test]
    fn test_custom_description_is_kept() {
        let failure = require_two()
            .check(&[Value::Int(1)])
            .unwrap()
            .expect("one value should fail");
        assert_eq!(failure.description, "needs exactly two values");
        assert_eq!(
            failure.differences.try_collect().unwrap(),
            vec![Difference::invalid(1)]
        );
    }

    #[test]
    fn test_passing_group() {
        assert!(require_two()
            .check(&[Value::Int(1), Value::Int(2)])
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_identity() {
        let a = require_two();
        let b = a.clone();
        assert!(a.same_as(&b));
        assert!(!a.same_as(&require_two()));
    }
}
