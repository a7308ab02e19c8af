//! Canonical schema constants for structured logging
//!
//! These constants keep the field names emitted by the diff engine stable so
//! that log pipelines and test assertions can rely on them.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Entity identifiers
pub const FIELD_SHAPE_ID: &str = "shape_id";
pub const FIELD_EVENT_ID: &str = "event_id";
pub const FIELD_EVALUATOR: &str = "evaluator";

// Collection sizes
pub const FIELD_ADDED: &str = "added";
pub const FIELD_REMOVED: &str = "removed";
pub const FIELD_MATCHED: &str = "matched";
pub const FIELD_EVENT_COUNT: &str = "event_count";
pub const FIELD_SUPPRESSED_COUNT: &str = "suppressed_count";

// Verdict
pub const FIELD_HAS_ERRORS: &str = "has_errors";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
