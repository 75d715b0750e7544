//! Structured logging facility
//!
//! This module provides the canonical logging setup for the integration:
//! - Single initialization point via `init(profile)`
//! - Optional forwarding of every log record to the host console through a
//!   `ConsoleSink` (`init_with_host_console`)
//! - Structured logging macros (`log_op_start!`, `log_op_end!`,
//!   `log_op_error!`, `log_config_warning!`, `log_recovered!`)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use hostlink_core::logging_facility::{init, Profile};
//!
//! // Initialize once when the plugin is loaded
//! init(Profile::Development);
//! ```

pub mod host_console;
pub mod init;
pub mod macros;
pub mod test_capture;

pub use host_console::{format_console_line, ConsoleSink, HostConsoleLayer};
pub use init::{init, init_with_host_console, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
