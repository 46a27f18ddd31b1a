use datavet_core::{DiffGroup, Difference, Differences, ExError, Value, ValidationError, VetError};
use std::collections::BTreeMap;

/// Unwrap the validation failure from a validation result
#[allow(dead_code)]
pub fn failure(result: Result<(), VetError>) -> ValidationError {
    match result {
        Err(VetError::Validation(err)) => err,
        Err(VetError::Fault(fault)) => panic!("expected a validation failure, got fault: {fault}"),
        Ok(()) => panic!("expected a validation failure, got success"),
    }
}

/// Unwrap the fault from a validation result
#[allow(dead_code)]
pub fn fault(result: Result<(), VetError>) -> ExError {
    match result {
        Err(VetError::Fault(fault)) => fault,
        Err(VetError::Validation(err)) => panic!("expected a fault, got failure: {err}"),
        Ok(()) => panic!("expected a fault, got success"),
    }
}

/// Keyed differences from `(key, group)` pairs
#[allow(dead_code)]
pub fn keyed<K, G>(entries: Vec<(K, G)>) -> Differences
where
    K: Into<Value>,
    G: Into<DiffGroup>,
{
    Differences::Mapping(
        entries
            .into_iter()
            .map(|(k, g)| (k.into(), g.into()))
            .collect::<BTreeMap<_, _>>(),
    )
}

/// A validation error over keyed differences
#[allow(dead_code)]
pub fn keyed_error<K, G>(entries: Vec<(K, G)>) -> ValidationError
where
    K: Into<Value>,
    G: Into<DiffGroup>,
{
    ValidationError::new(keyed(entries)).expect("keyed differences should not be empty")
}

/// A validation error over list differences
#[allow(dead_code)]
pub fn list_error(diffs: Vec<Difference>) -> ValidationError {
    ValidationError::new(diffs).expect("differences should not be empty")
}
