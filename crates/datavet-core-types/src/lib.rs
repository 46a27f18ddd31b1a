//! Core types shared across datavet facilities
//!
//! - **Values**: `Value`, the dynamic data model with total ordering and
//!   structural hashing
//! - **Differences**: `Difference`, the four discrepancy records
//! - **Schema constants**: canonical logging field keys and event names

pub mod difference;
pub mod schema;
pub mod value;

pub use difference::Difference;
pub use value::{safe_cmp_slices, Value, ValueKind};
