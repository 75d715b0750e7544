//! Isolated callback invocation
//!
//! One misbehaving command must never take the integration down with it.
//! Callbacks run behind `catch_unwind`; both returned errors and panics come
//! back as `CommandFailed`.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::errors::{EngineError, Result};

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "callback panicked".to_string()
    }
}

/// Run a callback, converting errors and panics into `CommandFailed`
///
/// # Errors
///
/// Returns `CommandFailed` naming `name` when the callback fails.
pub fn invoke_isolated(name: &str, callback: &dyn Fn() -> anyhow::Result<()>) -> Result<()> {
    match panic::catch_unwind(AssertUnwindSafe(callback)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(EngineError::CommandFailed {
            name: name.to_string(),
            reason: format!("{:#}", err),
        }),
        Err(payload) => Err(EngineError::CommandFailed {
            name: name.to_string(),
            reason: format!("panicked: {}", panic_message(payload.as_ref())),
        }),
    }
}
