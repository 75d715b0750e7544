//! Command registry
//!
//! Append-only mapping from command name to descriptor for one engine
//! session. A fresh registry is built on every initialization and on
//! "Reload Apps"; nothing is ever removed from a live registry.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use crate::errors::{EngineError, Result};

/// Zero-argument command callback
pub type CommandCallback = Rc<dyn Fn() -> anyhow::Result<()>>;

/// Where a command shows up in the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    #[default]
    Standard,
    /// Listed under the context header at the top of the menu
    ContextMenu,
}

/// Registered command and its display metadata
#[derive(Clone)]
pub struct CommandDescriptor {
    callback: CommandCallback,
    icon: Option<PathBuf>,
    tooltip: String,
    short_name: Option<String>,
    app: Option<String>,
    placement: Placement,
}

impl CommandDescriptor {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + 'static,
    {
        Self {
            callback: Rc::new(callback),
            icon: None,
            tooltip: String::new(),
            short_name: None,
            app: None,
            placement: Placement::Standard,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<PathBuf>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = Some(short_name.into());
        self
    }

    /// Tag the command with its owning app instance
    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = Some(app.into());
        self
    }

    pub fn context_menu(mut self) -> Self {
        self.placement = Placement::ContextMenu;
        self
    }

    pub fn callback(&self) -> CommandCallback {
        Rc::clone(&self.callback)
    }

    pub fn icon(&self) -> Option<&PathBuf> {
        self.icon.as_ref()
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    pub fn short_name(&self) -> Option<&str> {
        self.short_name.as_deref()
    }

    pub fn app(&self) -> Option<&str> {
        self.app.as_deref()
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("icon", &self.icon)
            .field("tooltip", &self.tooltip)
            .field("short_name", &self.short_name)
            .field("app", &self.app)
            .field("placement", &self.placement)
            .finish_non_exhaustive()
    }
}

/// Insertion-ordered command registry
#[derive(Debug, Default)]
pub struct CommandRegistry {
    order: Vec<String>,
    commands: HashMap<String, CommandDescriptor>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under a session-unique name
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCommand` if the name is already registered; the
    /// existing descriptor is left untouched.
    pub fn register(&mut self, name: impl Into<String>, descriptor: CommandDescriptor) -> Result<()> {
        let name = name.into();
        if self.commands.contains_key(&name) {
            return Err(EngineError::DuplicateCommand { name });
        }
        self.order.push(name.clone());
        self.commands.insert(name, descriptor);
        Ok(())
    }

    /// Look up a command by name
    ///
    /// # Errors
    ///
    /// Returns `CommandNotFound` if no such command is registered.
    pub fn lookup(&self, name: &str) -> Result<&CommandDescriptor> {
        self.commands
            .get(name)
            .ok_or_else(|| EngineError::CommandNotFound {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// All commands in registration order
    pub fn all(&self) -> impl Iterator<Item = (&str, &CommandDescriptor)> + '_ {
        self.order
            .iter()
            .filter_map(|name| self.commands.get(name).map(|d| (name.as_str(), d)))
    }

    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Commands grouped by owning app
    ///
    /// Apps appear in the order their first command was registered, commands
    /// in registration order. Commands without an owning app are not included.
    pub fn by_app(&self) -> Vec<(&str, Vec<&str>)> {
        let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
        for (name, descriptor) in self.all() {
            let Some(app) = descriptor.app() else {
                continue;
            };
            match groups.iter_mut().find(|(existing, _)| *existing == app) {
                Some((_, commands)) => commands.push(name),
                None => groups.push((app, vec![name])),
            }
        }
        groups
    }

    /// Command names owned by one app, in registration order
    pub fn commands_of(&self, app: &str) -> Vec<&str> {
        self.all()
            .filter(|(_, d)| d.app() == Some(app))
            .map(|(name, _)| name)
            .collect()
    }
}
