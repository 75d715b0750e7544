//! Host console forwarding
//!
//! The host application shows integration messages in its own script console.
//! `HostConsoleLayer` turns every tracing event into a single console line and
//! hands it to a `ConsoleSink`. Events can be emitted from worker threads, so
//! sinks must not touch host UI directly; the engine's main-thread dispatcher
//! is the production sink.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::Subscriber;
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

use crate::host::ConsoleLevel;

/// Destination for formatted console lines
pub trait ConsoleSink: Send + Sync {
    /// Accept one formatted line; must not block
    fn emit(&self, level: ConsoleLevel, line: String);
}

/// Format a console line the way the host console expects it
///
/// Debug records carry an explicit `Debug:` prefix because the host console
/// has no severity column of its own.
pub fn format_console_line(level: ConsoleLevel, basename: &str, message: &str) -> String {
    match level {
        ConsoleLevel::Debug => format!("Debug: Pipeline {}: {}", basename, message),
        _ => format!("Pipeline {}: {}", basename, message),
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    extra: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.extra, " {}={:?}", field.name(), value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.extra, " {}={}", field.name(), value);
        }
    }
}

/// Layer forwarding every event to a `ConsoleSink`
pub struct HostConsoleLayer {
    sink: Arc<dyn ConsoleSink>,
}

impl HostConsoleLayer {
    pub fn new(sink: Arc<dyn ConsoleSink>) -> Self {
        Self { sink }
    }
}

impl<S> Layer<S> for HostConsoleLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let target = metadata.target();
        let basename = target.rsplit("::").next().unwrap_or(target);
        let level = ConsoleLevel::from(*metadata.level());

        let body = if visitor.message.is_empty() {
            visitor.extra.trim_start().to_string()
        } else {
            visitor.message
        };

        self.sink
            .emit(level, format_console_line(level, basename, &body));
    }
}
