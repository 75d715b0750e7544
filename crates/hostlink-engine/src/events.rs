//! Host notifications routed into the engine

use std::path::PathBuf;

use hostlink_core_types::{ActionHandle, WindowHandle};

/// A notification raised by the host application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// An existing project file was opened
    ProjectOpened { path: PathBuf },
    /// A new project was created; the path may be empty while untitled
    NewProjectCreated { path: PathBuf },
    /// The host is about to quit
    Quit,
    /// The host asks for the integration menu to pop up
    DisplayMenu { position: Option<(i32, i32)> },
    /// A menu item or toolbar button was clicked
    ActionTriggered(ActionHandle),
    /// The user closed a window the engine opened
    WindowClosed(WindowHandle),
}
