//! Canonical schema constants for structured logging
//!
//! These constants keep field keys and event names consistent across the
//! validation and acceptance layers.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Validation outcome
pub const FIELD_OUTCOME: &str = "outcome";
pub const FIELD_DIFF_COUNT: &str = "diff_count";
pub const FIELD_KEY_COUNT: &str = "key_count";

// Acceptance filtering
pub const FIELD_ACCEPTED: &str = "accepted";
pub const FIELD_REMAINING: &str = "remaining";
pub const FIELD_PRIORITY: &str = "priority";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Outcome values
pub const OUTCOME_VALID: &str = "valid";
pub const OUTCOME_INVALID: &str = "invalid";
