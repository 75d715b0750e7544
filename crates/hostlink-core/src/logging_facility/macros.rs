//! Canonical logging macros
//!
//! These macros provide a structured, consistent way to log engine
//! operations. Callers need `tracing` in their own dependencies.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use hostlink_core::log_op_start;
/// log_op_start!("pre_init");
/// log_op_start!("pre_init", host_version = "6.2");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use hostlink_core::log_op_end;
/// log_op_end!("app_init", duration_ms = 12);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// # Example
///
/// ```
/// # use hostlink_core::{log_op_error, errors::EngineError};
/// let err = EngineError::UnsupportedPlatform { platform: "solaris".to_string() };
/// log_op_error!("pre_init", err, duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let err: &$crate::errors::EngineError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?err.kind(),
            err.code = err.code(),
            "{}",
            err
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let err: &$crate::errors::EngineError = &$err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?err.kind(),
            err.code = err.code(),
            $($field)*,
            "{}",
            err
        );
    }};
}

/// Log a non-fatal error that was caught and downgraded to a warning
///
/// # Example
///
/// ```
/// # use hostlink_core::{log_config_warning, errors::EngineError};
/// let err = EngineError::CommandNotFound { name: "Publish".to_string() };
/// log_config_warning!("toolbar_populate", err, command = "Publish");
/// ```
#[macro_export]
macro_rules! log_config_warning {
    ($op:expr, $err:expr) => {{
        let err: &$crate::errors::EngineError = &$err;
        tracing::warn!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_CONFIG_WARNING,
            err.kind = ?err.kind(),
            err.code = err.code(),
            "{}",
            err
        );
    }};
    ($op:expr, $err:expr, $($field:tt)*) => {{
        let err: &$crate::errors::EngineError = &$err;
        tracing::warn!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_CONFIG_WARNING,
            err.kind = ?err.kind(),
            err.code = err.code(),
            $($field)*,
            "{}",
            err
        );
    }};
}

/// Log a context or UI failure the engine recovered from
///
/// # Example
///
/// ```
/// # use hostlink_core::{log_recovered, errors::EngineError};
/// let err = EngineError::host_refused("close_window", "window is busy");
/// log_recovered!("close_all", err, window = "window:4");
/// ```
#[macro_export]
macro_rules! log_recovered {
    ($op:expr, $err:expr) => {{
        let err: &$crate::errors::EngineError = &$err;
        tracing::warn!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_RECOVERED,
            err.kind = ?err.kind(),
            err.code = err.code(),
            "{}",
            err
        );
    }};
    ($op:expr, $err:expr, $($field:tt)*) => {{
        let err: &$crate::errors::EngineError = &$err;
        tracing::warn!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_RECOVERED,
            err.kind = ?err.kind(),
            err.code = err.code(),
            $($field)*,
            "{}",
            err
        );
    }};
}
