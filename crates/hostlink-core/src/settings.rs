//! Engine settings
//!
//! Typed view of the integration's configuration options. Every field has a
//! default, so an empty document is a valid configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};
use crate::version::normalize;

/// Menu title used by default
pub const DEFAULT_MENU_NAME: &str = "Pipeline";

/// Menu title used when `use_alternate_menu_name` is set, for hosts where the
/// default title clashes with another plugin
pub const ALTERNATE_MENU_NAME: &str = "Toolkit";

/// One `run_at_startup` entry
///
/// An empty `name` runs every command of the app instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupEntry {
    pub app_instance: String,
    #[serde(default)]
    pub name: String,
}

impl StartupEntry {
    pub fn all_commands(app_instance: impl Into<String>) -> Self {
        Self {
            app_instance: app_instance.into(),
            name: String::new(),
        }
    }

    pub fn command(app_instance: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            app_instance: app_instance.into(),
            name: name.into(),
        }
    }

    /// Command name, `None` when the entry targets the whole app
    pub fn command_name(&self) -> Option<&str> {
        let name = self.name.trim();
        (!name.is_empty()).then_some(name)
    }
}

/// Configuration options of the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    pub use_alternate_menu_name: bool,
    pub automatic_context_switch: bool,
    /// Command names placed on the toolbar, in this order
    pub toolbar_commands: Vec<String>,
    pub run_at_startup: Vec<StartupEntry>,
    pub change_context_on_new_project: bool,
    pub minimum_version: String,
    pub last_tested_version: String,
    /// Raw major version from which the untested-version dialog is shown
    pub compatibility_dialog_min_version: u64,
    pub log_folder: Option<PathBuf>,
    /// Launcher allow-list of raw host versions; empty allows all
    pub versions: Vec<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            use_alternate_menu_name: false,
            automatic_context_switch: true,
            toolbar_commands: Vec::new(),
            run_at_startup: Vec::new(),
            change_context_on_new_project: true,
            minimum_version: "6.2".to_string(),
            last_tested_version: "6.2".to_string(),
            compatibility_dialog_min_version: 0,
            log_folder: None,
            versions: Vec::new(),
        }
    }
}

impl EngineSettings {
    /// Parse settings from a YAML document
    ///
    /// # Errors
    ///
    /// Returns `InvalidSettings` on malformed YAML or failed validation.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let settings: EngineSettings = if content.trim().is_empty() {
            EngineSettings::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| EngineError::InvalidSettings {
                reason: format!("YAML parse error: {}", e),
            })?
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a YAML file
    ///
    /// # Errors
    ///
    /// Returns `Io` when the file cannot be read and `InvalidSettings` when
    /// it does not parse or validate.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| EngineError::Io {
            message: format!("Failed to read settings file {}: {}", path.display(), e),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns `InvalidSettings` describing the first violation.
    pub fn validate(&self) -> Result<()> {
        for (setting, raw) in [
            ("minimum_version", &self.minimum_version),
            ("last_tested_version", &self.last_tested_version),
        ] {
            normalize(raw).map_err(|_| EngineError::InvalidSettings {
                reason: format!("{} '{}' is not a valid version", setting, raw),
            })?;
        }

        for (index, entry) in self.run_at_startup.iter().enumerate() {
            if entry.app_instance.trim().is_empty() {
                return Err(EngineError::InvalidSettings {
                    reason: format!("run_at_startup entry {} has no app_instance", index),
                });
            }
        }

        for name in &self.toolbar_commands {
            if name.trim().is_empty() {
                return Err(EngineError::InvalidSettings {
                    reason: "toolbar_commands contains an empty command name".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Title of the integration's top-level menu
    pub fn menu_name(&self) -> &'static str {
        if self.use_alternate_menu_name {
            ALTERNATE_MENU_NAME
        } else {
            DEFAULT_MENU_NAME
        }
    }

    /// Title of the integration's toolbar
    pub fn toolbar_name(&self) -> String {
        format!("{} Toolbar", self.menu_name())
    }
}
