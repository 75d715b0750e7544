//! Launcher support check
//!
//! Decides whether a discovered host executable may be launched with the
//! integration, given its raw version string.

use crate::version::{normalize, UNKNOWN_VERSION};

/// Result of a launcher support check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Support {
    Supported,
    Unsupported { reason: String },
}

impl Support {
    pub fn is_supported(&self) -> bool {
        matches!(self, Support::Supported)
    }
}

/// Version limitations of the launcher
#[derive(Debug, Clone, Default)]
pub struct LauncherPolicy {
    /// Raw minimum version; `None` disables the minimum check
    pub minimum_version: Option<String>,
    /// Raw versions allowed to launch; empty allows every version
    pub versions: Vec<String>,
}

impl LauncherPolicy {
    pub fn new(minimum_version: Option<String>, versions: Vec<String>) -> Self {
        Self {
            minimum_version,
            versions,
        }
    }

    /// Check one executable version
    ///
    /// Executables whose version could not be determined are accepted.
    pub fn check(&self, executable: &str, raw_version: &str) -> Support {
        let raw = raw_version.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(UNKNOWN_VERSION) {
            return Support::Supported;
        }

        // An unparseable executable version cannot be ordered; accept it like
        // an unknown one and leave the decision to the allow-list.
        if let (Some(minimum), Ok(version)) = (&self.minimum_version, normalize(raw)) {
            if let Ok(min_version) = normalize(minimum) {
                if version < min_version {
                    return Support::Unsupported {
                        reason: format!(
                            "Executable '{}' didn't meet the version requirements, {} is older than the minimum supported {}",
                            executable, raw, minimum
                        ),
                    };
                }
            }
        }

        if self.versions.is_empty() || self.versions.iter().any(|v| v == raw) {
            Support::Supported
        } else {
            Support::Unsupported {
                reason: format!(
                    "Executable '{}' didn't meet the version requirements ({} not in {:?})",
                    executable, raw, self.versions
                ),
            }
        }
    }
}
