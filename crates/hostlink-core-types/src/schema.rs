//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names consistent across every crate that logs.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_CONFIG_WARNING: &str = "config_warning";
pub const EVENT_RECOVERED: &str = "recovered";
pub const EVENT_UNTESTED_VERSION: &str = "untested_version";

// Broadcast sent to the host once app-init completes
pub const BROADCAST_ENGINE_READY: &str = "ENGINE_READY";
