//! Structured logging facility for datavet
//!
//! - Single initialization point via `init(profile)`
//! - Operation boundary macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions on emitted events
//!
//! # Usage
//!
//! ```rust
//! use datavet_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```
//!
//! `validate` owns the `validate` operation boundary; acceptance filtering
//! emits one `debug` event per pass with accepted and remaining counts.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
