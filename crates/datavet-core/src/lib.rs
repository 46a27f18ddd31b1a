//! Datavet Core - requirement matching and difference reconciliation
//!
//! This crate checks data against requirements and reports every
//! discrepancy as a [`Difference`]:
//! - Predicate, set, sequence and mapping requirements
//! - Custom group requirements with their own descriptions
//! - Keyed reconciliation of mapping data against mapping requirements
//! - Truncating, deterministically sorted failure reports
//! - Acceptances that filter expected differences out of a failure
//!
//! Validation never panics on bad data: misuse surfaces as an [`ExError`]
//! and discrepancies as a [`ValidationError`].

pub mod acceptance;
pub mod config;
pub mod data;
pub mod errors;
pub mod logging_facility;
pub mod predicate;
mod reconcile;
pub mod requirement;
pub mod validation;

// Re-export commonly used types
pub use acceptance::{
    AcceptedArgs, AcceptedDeviation, AcceptedExtra, AcceptedFuzzy, AcceptedInvalid,
    AcceptedKeys, AcceptedLimit, AcceptedMissing, AcceptedPercent, AcceptedSpecific, Acceptance,
    CombinedAcceptance,
};
pub use config::ReportConfig;
pub use data::{Data, Query};
pub use datavet_core_types::{schema, Difference, Value, ValueKind};
pub use errors::{DatavetError, ExError, ExErrorKind, Result, VetError};
pub use predicate::{Outcome, Predicate};
pub use requirement::{GroupOutcome, GroupRequirement, Requirement};
pub use validation::{valid, validate, validate_with_message, DiffGroup, Differences, ValidationError};
