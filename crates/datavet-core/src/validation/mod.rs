//! Validation entry points
//!
//! [`validate`] normalizes the data and requirement, picks the
//! reconciliation strategy from their shapes and raises a
//! [`ValidationError`] listing every difference found.

pub mod error;
mod render;

pub use error::{DiffGroup, Differences, TruncationFn, ValidationError};

use crate::data::{normalize_data, Candidates, Data, Shape};
use crate::errors::{DatavetError, ExError, VetError};
use crate::reconcile::{self, Reconciled};
use crate::requirement::{Requirement, DEFAULT_DESCRIPTION};
use crate::{log_op_end, log_op_error, log_op_start};
use datavet_core_types::schema::{OUTCOME_INVALID, OUTCOME_VALID};
use std::time::Instant;

/// Check `data` against `requirement`.
///
/// # Errors
///
/// - [`VetError::Validation`] listing the differences when the data does
///   not satisfy the requirement
/// - [`VetError::Fault`] for misuse (an exhaustible requirement, a mapping
///   requirement against unkeyed data, nested maps) and for errors raised by
///   user predicates or queries
pub fn validate(
    data: impl Into<Data>,
    requirement: impl Into<Requirement>,
) -> Result<(), VetError> {
    validate_with_message(data, requirement, None)
}

/// As [`validate`], with `msg` replacing the failure description.
///
/// # Errors
///
/// See [`validate`].
pub fn validate_with_message(
    data: impl Into<Data>,
    requirement: impl Into<Requirement>,
    msg: Option<&str>,
) -> Result<(), VetError> {
    let start = Instant::now();
    log_op_start!("validate");

    let result = run(data.into(), requirement.into(), msg);
    let duration_ms = start.elapsed().as_millis() as u64;

    match &result {
        Ok(()) => {
            log_op_end!("validate", duration_ms = duration_ms, outcome = OUTCOME_VALID);
        }
        Err(VetError::Validation(err)) => {
            log_op_end!(
                "validate",
                duration_ms = duration_ms,
                outcome = OUTCOME_INVALID,
                diff_count = err.differences().len()
            );
        }
        Err(VetError::Fault(err)) => {
            log_op_error!("validate", err.clone(), duration_ms = duration_ms);
        }
    }
    result
}

/// True when `data` satisfies `requirement`.
///
/// # Errors
///
/// Faults propagate; only validation failures are turned into `false`.
pub fn valid(data: impl Into<Data>, requirement: impl Into<Requirement>) -> Result<bool, ExError> {
    match validate(data, requirement) {
        Ok(()) => Ok(true),
        Err(VetError::Validation(_)) => Ok(false),
        Err(VetError::Fault(err)) => Err(err),
    }
}

fn run(data: Data, requirement: Requirement, msg: Option<&str>) -> Result<(), VetError> {
    let shape = normalize_data(data)?;
    let requirement = normalize_requirement(requirement)?;

    let reconciled = match (shape, requirement) {
        (Shape::Keyed(items), Requirement::Mapping(requirements)) => {
            reconcile::apply_mapping_to_mapping(items, requirements)?
        }
        (_, Requirement::Mapping(_)) => return Err(DatavetError::DataNotMapping.into()),
        (Shape::Keyed(items), requirement) => reconcile::apply_to_mapping(items, requirement)?,
        (Shape::Group(values), requirement) => {
            apply_direct(Candidates::Many(values), requirement)?
        }
        (Shape::Single(value), requirement) => {
            apply_direct(Candidates::Single(value), requirement)?
        }
    };

    let Some(Reconciled {
        differences,
        description,
    }) = reconciled
    else {
        return Ok(());
    };
    let description = msg
        .map(str::to_string)
        .or(description)
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
    Err(ValidationError::new(differences)?
        .with_description(description)
        .into())
}

fn apply_direct(
    candidates: Candidates,
    requirement: Requirement,
) -> Result<Option<Reconciled>, ExError> {
    let matcher = requirement.resolve()?;
    Ok(
        reconcile::apply_to_group(candidates, &matcher)?.map(|(group, description)| Reconciled {
            differences: Differences::from(group),
            description: Some(description),
        }),
    )
}

/// Fetch deferred requirements and reject one-shot iterators.
fn normalize_requirement(requirement: Requirement) -> Result<Requirement, ExError> {
    match requirement {
        Requirement::Deferred(query) => Ok(Requirement::from(query.execute()?)),
        Requirement::Exhaustible { type_name } => {
            Err(DatavetError::ExhaustibleRequirement { type_name }.into())
        }
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FnQuery;
    use datavet_core_types::{Difference, Value};

    #[test]
    fn test_message_overrides_description() {
        let err = validate_with_message(vec!["a", "b"], Value::set(["a"]), Some("custom"))
            .unwrap_err()
            .into_validation()
            .unwrap();
        assert_eq!(err.description(), Some("custom"));
    }

    #[test]
    fn test_deferred_requirement_is_fetched() {
        let requirement = Requirement::deferred(FnQuery::new("letters", || Ok(Value::set(["a", "b"]))));
        assert!(validate(vec!["a", "b"], requirement).is_ok());
    }

    #[test]
    fn test_single_element_against_set() {
        let err = validate("x", Value::set(["a"]))
            .unwrap_err()
            .into_validation()
            .unwrap();
        assert_eq!(
            err.differences(),
            &Differences::List(vec![Difference::missing("a"), Difference::extra("x")])
        );
    }
}
