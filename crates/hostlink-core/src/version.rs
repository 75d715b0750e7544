//! Host version normalization and compatibility gating
//!
//! The host vendor moved from year-based versions (`2017.1`, `2018.3.1`) to a
//! sequential scheme that continued where the years left off (`2020.1` became
//! `6.1`). Normalized values compare correctly across both schemes but cannot
//! be turned back into a display string; keep the raw string for messages.

use std::cmp::Ordering;

use crate::errors::{EngineError, Result};

/// First year-based release
const RENUMBERING_THRESHOLD: [u64; 2] = [2017, 1];

/// Subtracted from the leading component of year-based versions
const RENUMBERING_OFFSET: u64 = 2014;

/// Raw value reported by launchers that could not read the executable version
pub const UNKNOWN_VERSION: &str = "unknown";

/// Single component of a version value
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Component {
    /// Numeric component; orders before any text component
    Number(u64),
    Text(String),
}

/// Comparison-only version value
///
/// Deliberately has no `Display` impl.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionValue {
    components: Vec<Component>,
}

impl VersionValue {
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    fn at_or_above_threshold(&self) -> bool {
        let threshold: Vec<Component> = RENUMBERING_THRESHOLD
            .iter()
            .map(|n| Component::Number(*n))
            .collect();
        self.components.as_slice() >= threshold.as_slice()
    }
}

/// Split a raw string into loose components
///
/// Runs of digits and runs of letters become components; everything else
/// separates them.
fn split_components(raw: &str) -> Vec<Component> {
    let mut components = Vec::new();
    let mut current = String::new();

    let flush = |current: &mut String, components: &mut Vec<Component>| {
        if current.is_empty() {
            return;
        }
        let token = std::mem::take(current);
        match token.parse::<u64>() {
            Ok(n) => components.push(Component::Number(n)),
            Err(_) => components.push(Component::Text(token.to_ascii_lowercase())),
        }
    };

    for ch in raw.trim().chars() {
        if ch.is_ascii_digit() {
            if current.chars().next().is_some_and(|c| !c.is_ascii_digit()) {
                flush(&mut current, &mut components);
            }
            current.push(ch);
        } else if ch.is_alphabetic() {
            if current.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                flush(&mut current, &mut components);
            }
            current.push(ch);
        } else {
            flush(&mut current, &mut components);
        }
    }
    flush(&mut current, &mut components);

    components
}

/// Normalize a raw host version string
///
/// # Errors
///
/// Returns `UnparseableVersion` for empty strings, `"unknown"`, and strings
/// whose leading component is not numeric. Callers treat this as
/// "compatibility unknown".
pub fn normalize(raw: &str) -> Result<VersionValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNKNOWN_VERSION) {
        return Err(EngineError::UnparseableVersion {
            raw: raw.to_string(),
        });
    }

    let mut value = VersionValue {
        components: split_components(trimmed),
    };

    if !matches!(value.components.first(), Some(Component::Number(_))) {
        return Err(EngineError::UnparseableVersion {
            raw: raw.to_string(),
        });
    }

    if value.at_or_above_threshold() {
        if let Some(Component::Number(major)) = value.components.first_mut() {
            *major -= RENUMBERING_OFFSET;
        }
    }

    Ok(value)
}

/// Compare two raw version strings after normalization
///
/// # Errors
///
/// Fails if either side is unparseable.
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering> {
    Ok(normalize(a)?.cmp(&normalize(b)?))
}

/// Leading integer of the raw (not normalized) version string
pub fn major_component(raw: &str) -> Option<u64> {
    match split_components(raw).first() {
        Some(Component::Number(n)) => Some(*n),
        _ => None,
    }
}

/// Outcome of checking a host version against the supported range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compatibility {
    /// Version could not be determined; treated as supported
    Unknown,
    Supported,
    /// Newer than the last tested version; runs with a warning
    Untested,
    /// Older than the minimum supported version
    Unsupported,
}

impl Compatibility {
    /// Whether the integration may start with this version
    pub fn is_supported(&self) -> bool {
        !matches!(self, Compatibility::Unsupported)
    }
}

/// Supported version range of the integration
#[derive(Debug, Clone)]
pub struct VersionGate {
    minimum: VersionValue,
    minimum_raw: String,
    last_tested: VersionValue,
}

impl VersionGate {
    /// Build a gate from raw minimum and last-tested versions
    ///
    /// # Errors
    ///
    /// Fails if either bound is unparseable.
    pub fn new(minimum: &str, last_tested: &str) -> Result<Self> {
        Ok(Self {
            minimum: normalize(minimum)?,
            minimum_raw: minimum.to_string(),
            last_tested: normalize(last_tested)?,
        })
    }

    pub fn minimum_raw(&self) -> &str {
        &self.minimum_raw
    }

    /// Classify a raw host version
    pub fn assess(&self, raw: &str) -> Compatibility {
        match normalize(raw) {
            Err(_) => Compatibility::Unknown,
            Ok(version) if version < self.minimum => Compatibility::Unsupported,
            Ok(version) if version > self.last_tested => Compatibility::Untested,
            Ok(_) => Compatibility::Supported,
        }
    }
}
