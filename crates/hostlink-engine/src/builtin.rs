//! Commands the engine registers on its own behalf

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use hostlink_core::errors::Result;
use hostlink_core::registry::{CommandDescriptor, CommandRegistry};

use crate::dispatch::{MainThreadSender, MainThreadTask};

pub const OPEN_LOG_FOLDER: &str = "Open Log Folder";
pub const RELOAD_APPS: &str = "Reload Apps";

fn open_log_folder(folder: Option<&Path>) -> anyhow::Result<()> {
    let folder = folder.context("no log folder is configured")?;
    if !folder.is_dir() {
        anyhow::bail!("log folder {} does not exist", folder.display());
    }
    tracing::info!(folder = %folder.display(), "opening log folder");
    open::that(folder).with_context(|| format!("failed to open {}", folder.display()))
}

fn open_log_folder_command(log_folder: Option<PathBuf>) -> CommandDescriptor {
    CommandDescriptor::new(move || open_log_folder(log_folder.as_deref()))
        .with_tooltip("Show the log folder in the file browser")
        .context_menu()
}

fn reload_apps_command(sender: MainThreadSender) -> CommandDescriptor {
    CommandDescriptor::new(move || {
        sender.post(MainThreadTask::ReloadApps);
        Ok(())
    })
    .with_tooltip("Reload every app and rebuild the menu")
    .context_menu()
}

/// Register the built-in commands
///
/// # Errors
///
/// Returns `DuplicateCommand` if a built-in name is already taken.
pub fn register(
    registry: &mut CommandRegistry,
    log_folder: Option<PathBuf>,
    sender: MainThreadSender,
) -> Result<()> {
    registry.register(OPEN_LOG_FOLDER, open_log_folder_command(log_folder))?;
    registry.register(RELOAD_APPS, reload_apps_command(sender))?;
    Ok(())
}

/// Register whichever built-in commands are missing
///
/// Returns how many were added.
pub fn ensure(
    registry: &mut CommandRegistry,
    log_folder: Option<PathBuf>,
    sender: MainThreadSender,
) -> usize {
    let mut added = 0;
    if !registry.contains(OPEN_LOG_FOLDER)
        && registry
            .register(OPEN_LOG_FOLDER, open_log_folder_command(log_folder))
            .is_ok()
    {
        added += 1;
    }
    if !registry.contains(RELOAD_APPS)
        && registry
            .register(RELOAD_APPS, reload_apps_command(sender))
            .is_ok()
    {
        added += 1;
    }
    added
}
