//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.

use std::sync::{Arc, Once};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

use super::host_console::{ConsoleSink, HostConsoleLayer};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

static INIT_ONCE: Once = Once::new();

fn filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initialize the logging facility
///
/// This function should be called once when the integration is loaded.
/// It sets up the tracing subscriber based on the selected profile.
///
/// # Profiles
///
/// - **Development**: Human-readable logs with debug level
/// - **Production**: JSON structured logs with info level
/// - **Test**: Capture mode for test assertions
pub fn init(profile: Profile) {
    install(profile, None);
}

/// Initialize the logging facility and mirror every record to the host console
///
/// Records are handed to `sink` from whichever thread emitted them; the sink
/// is responsible for getting them onto the host's UI thread.
pub fn init_with_host_console(profile: Profile, sink: Arc<dyn ConsoleSink>) {
    install(profile, Some(HostConsoleLayer::new(sink)));
}

fn install(profile: Profile, console: Option<HostConsoleLayer>) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::registry()
                .with(filter_or("hostlink=debug"))
                .with(tracing_subscriber::fmt::layer())
                .with(console)
                .init();
        }
        Profile::Production => {
            tracing_subscriber::registry()
                .with(filter_or("hostlink=info"))
                .with(tracing_subscriber::fmt::layer().json())
                .with(console)
                .init();
        }
        Profile::Test => {
            // Test capture is initialized separately via init_test_capture()
            tracing_subscriber::registry().with(console).init();
        }
    });
}
