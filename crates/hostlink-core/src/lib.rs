//! hostlink core - engine-independent building blocks
//!
//! This crate holds everything the engine lifecycle needs that does not touch
//! live host UI state:
//! - Error taxonomy with stable codes
//! - Structured logging facility (tracing based)
//! - Host version normalization and compatibility gating
//! - Typed engine settings loaded from YAML
//! - Command registry, startup runner and isolated callback invocation
//! - Tool actions contributed by plugin providers
//! - The host, pipeline-platform and app boundary traits

pub mod app;
pub mod errors;
pub mod host;
pub mod invoke;
pub mod launcher;
pub mod logging_facility;
pub mod platform;
pub mod registry;
pub mod settings;
pub mod startup;
pub mod tool_action;
pub mod version;

pub use hostlink_core_types as core_types;

// Re-export commonly used types
pub use app::App;
pub use errors::{EngineError, ErrorKind, Result};
pub use host::{ActionSpec, ConsoleLevel, HostPlatform, HostUi, MessageLevel, WindowKind, WindowSpec};
pub use platform::{Context, PipelinePlatform, Workaround};
pub use registry::{CommandDescriptor, CommandRegistry, Placement};
pub use settings::{EngineSettings, StartupEntry};
pub use startup::{StartupReport, StartupRunner};
pub use tool_action::{ToolAction, ToolActionCatalog, ToolActionProvider, ToolActionSource};
pub use version::{normalize, Compatibility, VersionGate, VersionValue};
