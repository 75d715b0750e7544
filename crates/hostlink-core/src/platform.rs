//! Pipeline platform boundary
//!
//! The pipeline platform owns the notion of "what is the user working on".
//! The engine only needs to compare contexts and to ask the platform to
//! resolve new ones.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by the pipeline platform
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct PlatformError(pub String);

impl PlatformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Opaque project/entity context supplied by the pipeline platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Context {
    id: String,
    display_name: String,
    project: Option<String>,
}

impl Context {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            project: None,
        }
    }

    /// Attach the project this context belongs to
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human readable name shown at the top of the menu
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }
}

/// Host-specific compatibility workaround requested by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workaround {
    /// Do not load the web-engine widgets module; it deadlocks untested
    /// host builds on Windows
    SkipWebEngineWidgets,
}

/// Services the engine consumes from the pipeline platform
pub trait PipelinePlatform {
    /// Resolve the context a file belongs to
    fn context_from_path(
        &self,
        path: &Path,
        previous: Option<&Context>,
    ) -> std::result::Result<Context, PlatformError>;

    /// Resolve the project-level context enclosing `current`
    fn project_context(&self, current: &Context) -> std::result::Result<Context, PlatformError>;

    /// Run the configured process-wide startup hook
    fn run_startup_hook(&self) -> std::result::Result<(), PlatformError> {
        Ok(())
    }

    /// Apply a compatibility workaround before apps are loaded
    fn apply_workaround(&self, _workaround: Workaround) {}
}
