//! Host application boundary
//!
//! Everything the integration needs from the host application's native UI is
//! expressed through the `HostUi` trait. The host hands out opaque handles for
//! the elements it creates; the engine owns the handles and is responsible for
//! releasing them.

use std::path::PathBuf;

use hostlink_core_types::{ActionHandle, MenuHandle, ToolbarHandle, WindowHandle};
use thiserror::Error;

/// Failure reported by the host for a single UI request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Result type for host UI requests
pub type HostResult<T> = std::result::Result<T, HostError>;

/// Operating system family the host is running on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostPlatform {
    Mac,
    Windows,
    Linux,
    Other(String),
}

impl HostPlatform {
    /// Platform of the current process
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS identifier (`std::env::consts::OS` style) to a platform
    pub fn from_os(os: &str) -> Self {
        match os {
            "macos" | "darwin" | "mac" => HostPlatform::Mac,
            "windows" | "win32" => HostPlatform::Windows,
            "linux" | "linux64" => HostPlatform::Linux,
            other => HostPlatform::Other(other.to_string()),
        }
    }

    /// Whether the integration can run on this platform
    pub fn is_supported(&self) -> bool {
        !matches!(self, HostPlatform::Other(_))
    }

    pub fn name(&self) -> &str {
        match self {
            HostPlatform::Mac => "mac",
            HostPlatform::Windows => "windows",
            HostPlatform::Linux => "linux",
            HostPlatform::Other(name) => name,
        }
    }
}

/// Severity of a line written to the host console
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConsoleLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl From<tracing::Level> for ConsoleLevel {
    fn from(level: tracing::Level) -> Self {
        if level == tracing::Level::ERROR {
            ConsoleLevel::Error
        } else if level == tracing::Level::WARN {
            ConsoleLevel::Warning
        } else if level == tracing::Level::INFO {
            ConsoleLevel::Info
        } else {
            ConsoleLevel::Debug
        }
    }
}

/// Severity of a user-visible message dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

/// Visual description of a clickable action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSpec {
    pub label: String,
    pub icon: Option<PathBuf>,
    pub tooltip: String,
    pub enabled: bool,
}

impl ActionSpec {
    /// An enabled action whose tooltip repeats its label
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            tooltip: label.clone(),
            label,
            icon: None,
            enabled: true,
        }
    }

    /// A non-clickable informational entry
    pub fn disabled_label(label: impl Into<String>) -> Self {
        Self {
            enabled: false,
            ..Self::new(label)
        }
    }

    pub fn with_icon(mut self, icon: Option<PathBuf>) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }
}

/// Kind of window the integration can open
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowKind {
    /// Free-floating dialog; every request creates a new instance
    Dialog,
    /// Dockable panel, unique per panel id
    Panel { id: String },
}

/// Request to open a window in the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSpec {
    pub title: String,
    pub kind: WindowKind,
    pub modal: bool,
}

impl WindowSpec {
    pub fn dialog(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: WindowKind::Dialog,
            modal: false,
        }
    }

    pub fn modal_dialog(title: impl Into<String>) -> Self {
        Self {
            modal: true,
            ..Self::dialog(title)
        }
    }

    pub fn panel(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: WindowKind::Panel { id: id.into() },
            modal: false,
        }
    }

    /// Panel id when this is a panel request
    pub fn panel_id(&self) -> Option<&str> {
        match &self.kind {
            WindowKind::Panel { id } => Some(id),
            WindowKind::Dialog => None,
        }
    }
}

/// Native UI services of the host application
///
/// All methods are called on the host's UI thread.
pub trait HostUi {
    // ===== Application =====
    /// Raw host version string, `None` when the host cannot report it
    fn application_version(&self) -> Option<String>;

    /// Operating system family the host runs on
    fn platform(&self) -> HostPlatform;

    /// Main window used as parent for dialogs
    fn main_window(&self) -> Option<WindowHandle>;

    // ===== Menus =====
    fn create_menu(&mut self, title: &str) -> HostResult<MenuHandle>;

    /// Attach a top-level menu to the host's menu bar
    fn attach_menu(&mut self, menu: MenuHandle) -> HostResult<()>;

    /// Whether a menu created earlier still exists in the host
    fn menu_alive(&self, menu: MenuHandle) -> bool;

    /// Remove every item and submenu of a menu
    fn clear_menu(&mut self, menu: MenuHandle) -> HostResult<()>;

    fn add_submenu(&mut self, parent: MenuHandle, title: &str) -> HostResult<MenuHandle>;

    fn add_menu_item(&mut self, menu: MenuHandle, spec: &ActionSpec) -> HostResult<ActionHandle>;

    fn add_menu_separator(&mut self, menu: MenuHandle) -> HostResult<ActionHandle>;

    /// Pop the menu up, optionally at a position in host coordinates
    fn show_menu(&mut self, menu: MenuHandle, position: Option<(i32, i32)>) -> HostResult<()>;

    fn destroy_menu(&mut self, menu: MenuHandle) -> HostResult<()>;

    // ===== Toolbars =====
    fn create_toolbar(&mut self, title: &str, object_name: &str) -> HostResult<ToolbarHandle>;

    /// Create a new action owned by the engine and place it on a toolbar
    fn add_toolbar_action(
        &mut self,
        toolbar: ToolbarHandle,
        spec: &ActionSpec,
    ) -> HostResult<ActionHandle>;

    fn add_toolbar_divider(&mut self, toolbar: ToolbarHandle) -> HostResult<ActionHandle>;

    /// Place an action created by someone else on a toolbar
    fn attach_toolbar_action(
        &mut self,
        toolbar: ToolbarHandle,
        action: ActionHandle,
    ) -> HostResult<()>;

    /// Take an action off a toolbar without destroying it
    fn detach_action(&mut self, toolbar: ToolbarHandle, action: ActionHandle) -> HostResult<()>;

    /// Destroy an action the engine created
    fn release_action(&mut self, action: ActionHandle) -> HostResult<()>;

    fn destroy_toolbar(&mut self, toolbar: ToolbarHandle) -> HostResult<()>;

    // ===== Windows =====
    fn create_window(
        &mut self,
        spec: &WindowSpec,
        parent: Option<WindowHandle>,
    ) -> HostResult<WindowHandle>;

    /// Ask the host to report user-initiated closes of this window
    fn watch_close(&mut self, window: WindowHandle) -> HostResult<()>;

    fn close_window(&mut self, window: WindowHandle) -> HostResult<()>;

    // ===== Messaging =====
    /// Broadcast a named event to the host and its other plugins
    fn broadcast(&mut self, event: &str) -> HostResult<()>;

    /// Write a line to the host's script console
    fn console(&mut self, level: ConsoleLevel, line: &str);

    /// Show a user-visible message dialog
    fn show_message(&mut self, level: MessageLevel, title: &str, text: &str);
}
