//! Window manager
//!
//! Tracks every dialog and panel the engine opened so that shutdown can close
//! them before the menu and toolbar go away. Dock panels are unique per panel
//! id; dialogs are not.

use std::collections::HashMap;

use hostlink_core::errors::{EngineError, Result};
use hostlink_core::host::{HostUi, WindowSpec};
use hostlink_core::log_recovered;
use hostlink_core_types::WindowHandle;

#[derive(Debug, Default)]
pub struct WindowManager {
    open: Vec<WindowHandle>,
    panels: HashMap<String, WindowHandle>,
}

impl WindowManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn contains(&self, window: WindowHandle) -> bool {
        self.open.contains(&window)
    }

    /// Open windows in opening order
    pub fn handles(&self) -> &[WindowHandle] {
        &self.open
    }

    /// Parent for new dialogs
    pub fn parent(&self, host: &dyn HostUi) -> Option<WindowHandle> {
        host.main_window()
    }

    /// Open a dialog or panel
    ///
    /// Re-opening a panel that is still open returns its existing handle.
    ///
    /// # Errors
    ///
    /// Returns `HostRefused` if the host cannot create the window.
    pub fn open(&mut self, host: &mut dyn HostUi, spec: &WindowSpec) -> Result<WindowHandle> {
        if let Some(id) = spec.panel_id() {
            if let Some(existing) = self.panels.get(id) {
                tracing::debug!(panel = id, window = %existing, "panel already open");
                return Ok(*existing);
            }
        }

        let parent = self.parent(host);
        let window = host
            .create_window(spec, parent)
            .map_err(|e| EngineError::host_refused("create_window", e))?;

        if let Err(e) = host.watch_close(window) {
            // Without the observer the handle is only released by close_all
            let err = EngineError::host_refused("watch_close", e);
            log_recovered!("open_window", err, window = %window);
        }

        self.open.push(window);
        if let Some(id) = spec.panel_id() {
            self.panels.insert(id.to_string(), window);
        }
        Ok(window)
    }

    /// Forget a window the user closed
    ///
    /// Returns `false` for handles that are not tracked.
    pub fn notify_closed(&mut self, window: WindowHandle) -> bool {
        let before = self.open.len();
        self.open.retain(|open| *open != window);
        self.panels.retain(|_, open| *open != window);
        self.open.len() != before
    }

    /// Close every tracked window
    ///
    /// Every handle leaves the set, including those the host failed to close.
    /// The failures are logged and returned.
    pub fn close_all(&mut self, host: &mut dyn HostUi) -> Vec<EngineError> {
        let snapshot = std::mem::take(&mut self.open);
        self.panels.clear();

        let mut failures = Vec::new();
        for window in snapshot {
            if let Err(e) = host.close_window(window) {
                let err = EngineError::host_refused("close_window", e);
                log_recovered!("close_all", err, window = %window);
                failures.push(err);
            }
        }
        failures
    }
}
