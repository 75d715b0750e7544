//! Startup runner
//!
//! Executes the commands listed in the `run_at_startup` setting once, at the
//! end of initialization. Configuration mistakes and failing commands are
//! reported and skipped; the runner itself never fails.

use std::time::Instant;

use crate::errors::EngineError;
use crate::invoke::invoke_isolated;
use crate::registry::CommandRegistry;
use crate::settings::StartupEntry;
use crate::{log_config_warning, log_op_end, log_op_error, log_op_start};

const SETTING: &str = "run_at_startup";

/// What happened during a startup run
#[derive(Debug, Default)]
pub struct StartupReport {
    /// Commands that ran to completion, in execution order
    pub executed: Vec<String>,
    /// Commands that returned an error or panicked
    pub failed: Vec<EngineError>,
    /// Configuration references that could not be resolved
    pub warnings: Vec<EngineError>,
}

impl StartupReport {
    /// Number of commands attempted
    pub fn attempted(&self) -> usize {
        self.executed.len() + self.failed.len()
    }
}

/// Runs configured startup commands against a registry
pub struct StartupRunner<'a> {
    registry: &'a CommandRegistry,
}

impl<'a> StartupRunner<'a> {
    pub fn new(registry: &'a CommandRegistry) -> Self {
        Self { registry }
    }

    /// Run every entry in order
    pub fn run(&self, entries: &[StartupEntry]) -> StartupReport {
        let start = Instant::now();
        log_op_start!("run_at_startup", entries = entries.len());

        let mut report = StartupReport::default();
        for entry in entries {
            self.run_entry(entry, &mut report);
        }

        log_op_end!(
            "run_at_startup",
            duration_ms = start.elapsed().as_millis() as u64,
            executed = report.executed.len(),
            failed = report.failed.len(),
            warnings = report.warnings.len()
        );
        report
    }

    fn run_entry(&self, entry: &StartupEntry, report: &mut StartupReport) {
        let app_commands = self.registry.commands_of(&entry.app_instance);
        if app_commands.is_empty() {
            let err = EngineError::UnknownApp {
                setting: SETTING.to_string(),
                app_instance: entry.app_instance.clone(),
            };
            log_config_warning!("run_at_startup", err, app_instance = %entry.app_instance);
            report.warnings.push(err);
            return;
        }

        match entry.command_name() {
            None => {
                for name in app_commands {
                    self.execute(&entry.app_instance, name, report);
                }
            }
            Some(name) if app_commands.contains(&name) => {
                self.execute(&entry.app_instance, name, report);
            }
            Some(name) => {
                let err = EngineError::UnknownCommand {
                    setting: SETTING.to_string(),
                    command: name.to_string(),
                    known: app_commands.iter().map(|c| c.to_string()).collect(),
                };
                log_config_warning!("run_at_startup", err, app_instance = %entry.app_instance);
                report.warnings.push(err);
            }
        }
    }

    fn execute(&self, app_instance: &str, name: &str, report: &mut StartupReport) {
        let callback = match self.registry.lookup(name) {
            Ok(descriptor) => descriptor.callback(),
            Err(err) => {
                log_config_warning!("run_at_startup", err, app_instance = %app_instance);
                report.warnings.push(err);
                return;
            }
        };

        tracing::debug!(app_instance, command = name, "startup running command");
        let start = Instant::now();
        match invoke_isolated(name, callback.as_ref()) {
            Ok(()) => report.executed.push(name.to_string()),
            Err(err) => {
                log_op_error!(
                    "run_at_startup",
                    err,
                    duration_ms = start.elapsed().as_millis() as u64,
                    app_instance = %app_instance
                );
                report.failed.push(err);
            }
        }
    }
}
