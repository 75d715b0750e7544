//! App modules
//!
//! Apps are the platform-side modules that contribute commands. Each engine
//! session asks every app to register its commands into a fresh registry.

use crate::errors::Result;
use crate::registry::CommandRegistry;

/// A platform-side module contributing commands
pub trait App {
    /// Unique instance name, used by `run_at_startup` entries
    fn instance_name(&self) -> &str;

    /// Register this app's commands
    ///
    /// Descriptors should be tagged with `instance_name()` as owning app.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCommand` when a command name is already taken.
    fn register_commands(&self, registry: &mut CommandRegistry) -> Result<()>;
}
