use thiserror::Error;

/// Result type alias using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

/// Canonical error kind taxonomy
///
/// Every error raised by the integration falls into one of these kinds. The
/// kind decides how far an error may travel: only `FatalStartup` is allowed to
/// abort initialization, every other kind is caught by the component that
/// detects it and downgraded to a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // Propagation classes
    FatalStartup,
    RecoverableContext,
    ConfigurationWarning,
    UiResourceFailure,
    PluginContributionFailure,

    // Registry
    DuplicateCommand,
    NotFound,
    CommandFailed,

    // Lifecycle
    InvalidState,

    // Input
    InvalidVersion,
    InvalidSettings,

    // Integration/IO
    Io,

    // Internal
    Internal,
}

impl ErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::FatalStartup => "ERR_FATAL_STARTUP",
            ErrorKind::RecoverableContext => "ERR_RECOVERABLE_CONTEXT",
            ErrorKind::ConfigurationWarning => "ERR_CONFIGURATION_WARNING",
            ErrorKind::UiResourceFailure => "ERR_UI_RESOURCE_FAILURE",
            ErrorKind::PluginContributionFailure => "ERR_PLUGIN_CONTRIBUTION_FAILURE",
            ErrorKind::DuplicateCommand => "ERR_DUPLICATE_COMMAND",
            ErrorKind::NotFound => "ERR_NOT_FOUND",
            ErrorKind::CommandFailed => "ERR_COMMAND_FAILED",
            ErrorKind::InvalidState => "ERR_INVALID_STATE",
            ErrorKind::InvalidVersion => "ERR_INVALID_VERSION",
            ErrorKind::InvalidSettings => "ERR_INVALID_SETTINGS",
            ErrorKind::Io => "ERR_IO",
            ErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether errors of this kind must stop the integration from starting
    pub fn is_fatal(&self) -> bool {
        matches!(self, ErrorKind::FatalStartup)
    }
}

/// Error taxonomy for engine operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    // ===== Fatal Startup =====
    /// Host runs on a platform the integration does not support
    #[error("The current platform '{platform}' is not supported! Supported platforms are Mac, Linux 64 and Windows 64")]
    UnsupportedPlatform { platform: String },

    /// Host version is older than the minimum supported version
    #[error("Integration is not compatible with host version {version}; the minimum supported version is {minimum}")]
    UnsupportedVersion { version: String, minimum: String },

    // ===== Context =====
    /// The pipeline platform could not resolve a context for a path
    #[error("Could not resolve a context from '{path}': {reason}")]
    ContextUnresolved { path: String, reason: String },

    /// The project-level fallback context could not be resolved either
    #[error("Could not resolve the project context: {reason}")]
    ProjectContextUnresolved { reason: String },

    // ===== Configuration =====
    /// Configuration references an app instance that is not installed
    #[error("Configuration setting '{setting}' requests app '{app_instance}' that is not installed")]
    UnknownApp {
        setting: String,
        app_instance: String,
    },

    /// Configuration references a command that is not registered
    #[error("Configuration setting '{setting}' requests unknown command '{command}'. Known commands: {known:?}")]
    UnknownCommand {
        setting: String,
        command: String,
        known: Vec<String>,
    },

    // ===== Registry =====
    /// A command with this name is already registered in this session
    #[error("Command already registered: {name}")]
    DuplicateCommand { name: String },

    /// No command with this name is registered
    #[error("Command not found: {name}")]
    CommandNotFound { name: String },

    /// A command callback returned an error or panicked
    #[error("Command '{name}' failed: {reason}")]
    CommandFailed { name: String, reason: String },

    // ===== UI Resources =====
    /// The host refused to create, modify or close a UI element
    #[error("Host refused '{op}': {reason}")]
    HostRefused { op: String, reason: String },

    /// A toolbar handle was requested while one is still live
    #[error("A toolbar handle is already live: {toolbar}")]
    ToolbarAlreadyLive { toolbar: String },

    // ===== Plugins =====
    /// A tool-action provider failed to contribute its actions
    #[error("Tool action provider '{provider}' failed: {reason}")]
    PluginContribution { provider: String, reason: String },

    // ===== Lifecycle =====
    /// An operation was requested in a state that does not allow it
    #[error("Cannot {op} while engine is {state}")]
    InvalidTransition { op: String, state: String },

    /// Another engine session of this process is still running
    #[error("Cannot {op}: engine session {session} is already running")]
    EngineAlreadyRunning { op: String, session: String },

    // ===== Input =====
    /// A version string could not be parsed into comparable components
    #[error("Unparseable version string: '{raw}'")]
    UnparseableVersion { raw: String },

    /// Settings failed to parse or validate
    #[error("Invalid settings: {reason}")]
    InvalidSettings { reason: String },

    // ===== Generic Errors =====
    /// IO error (settings files, log folders)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EngineError {
    /// Get the canonical kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::UnsupportedPlatform { .. } | EngineError::UnsupportedVersion { .. } => {
                ErrorKind::FatalStartup
            }
            EngineError::ContextUnresolved { .. } | EngineError::ProjectContextUnresolved { .. } => {
                ErrorKind::RecoverableContext
            }
            EngineError::UnknownApp { .. } | EngineError::UnknownCommand { .. } => {
                ErrorKind::ConfigurationWarning
            }
            EngineError::DuplicateCommand { .. } => ErrorKind::DuplicateCommand,
            EngineError::CommandNotFound { .. } => ErrorKind::NotFound,
            EngineError::CommandFailed { .. } => ErrorKind::CommandFailed,
            EngineError::HostRefused { .. } | EngineError::ToolbarAlreadyLive { .. } => {
                ErrorKind::UiResourceFailure
            }
            EngineError::PluginContribution { .. } => ErrorKind::PluginContributionFailure,
            EngineError::InvalidTransition { .. } | EngineError::EngineAlreadyRunning { .. } => {
                ErrorKind::InvalidState
            }
            EngineError::UnparseableVersion { .. } => ErrorKind::InvalidVersion,
            EngineError::InvalidSettings { .. } => ErrorKind::InvalidSettings,
            EngineError::Io { .. } => ErrorKind::Io,
            EngineError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Shorthand for a host refusal during `op`
    pub fn host_refused(op: impl Into<String>, reason: impl ToString) -> Self {
        EngineError::HostRefused {
            op: op.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Io {
            message: err.to_string(),
        }
    }
}
