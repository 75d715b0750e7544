//! Menu builder
//!
//! Projects the command registry into the integration's top-level host menu.
//!
//! Layout, top to bottom:
//! - disabled header showing the current context
//! - separator
//! - context-menu commands
//! - separator
//! - standard commands; an app with more than one command gets a submenu,
//!   single commands and commands without an app go top-level
//!
//! Registry order is kept inside every group.

use std::collections::HashMap;
use std::fmt;

use hostlink_core::errors::{EngineError, Result};
use hostlink_core::host::{ActionSpec, HostUi};
use hostlink_core::log_recovered;
use hostlink_core::platform::Context;
use hostlink_core::registry::{CommandDescriptor, CommandRegistry, Placement};
use hostlink_core_types::{ActionHandle, MenuHandle};

/// Predicate deciding which registered commands appear in the menu
pub type MenuFilter = Box<dyn Fn(&str, &CommandDescriptor) -> bool>;

const NO_CONTEXT_LABEL: &str = "No context";

/// Top-level group of standard commands
enum Section<'a> {
    Single(&'a str, &'a CommandDescriptor),
    App(&'a str, Vec<(&'a str, &'a CommandDescriptor)>),
}

fn sections<'a>(commands: &[(&'a str, &'a CommandDescriptor)]) -> Vec<Section<'a>> {
    let mut sections: Vec<Section<'a>> = Vec::new();
    for &(name, descriptor) in commands {
        let Some(app) = descriptor.app() else {
            sections.push(Section::Single(name, descriptor));
            continue;
        };
        let existing = sections.iter_mut().find_map(|section| match section {
            Section::App(owner, members) if *owner == app => Some(members),
            _ => None,
        });
        match existing {
            Some(members) => members.push((name, descriptor)),
            None => sections.push(Section::App(app, vec![(name, descriptor)])),
        }
    }
    sections
        .into_iter()
        .map(|section| match section {
            Section::App(_, mut members) if members.len() == 1 => {
                let (name, descriptor) = members.remove(0);
                Section::Single(name, descriptor)
            }
            other => other,
        })
        .collect()
}

fn command_spec(name: &str, descriptor: &CommandDescriptor) -> ActionSpec {
    let tooltip = if descriptor.tooltip().is_empty() {
        name
    } else {
        descriptor.tooltip()
    };
    ActionSpec::new(name)
        .with_icon(descriptor.icon().cloned())
        .with_tooltip(tooltip)
}

/// Builds and owns the integration's top-level menu
pub struct MenuBuilder {
    title: String,
    handle: Option<MenuHandle>,
    entries: HashMap<ActionHandle, String>,
    disabled: bool,
    filter: Option<MenuFilter>,
}

impl fmt::Debug for MenuBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuBuilder")
            .field("title", &self.title)
            .field("handle", &self.handle)
            .field("entries", &self.entries.len())
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

impl MenuBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            handle: None,
            entries: HashMap::new(),
            disabled: false,
            filter: None,
        }
    }

    /// Restrict the commands shown in the menu
    pub fn with_filter(mut self, filter: MenuFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn handle(&self) -> Option<MenuHandle> {
        self.handle
    }

    pub fn is_created(&self) -> bool {
        self.handle.is_some()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Number of clickable entries
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Command bound to a menu action
    pub fn command_for(&self, action: ActionHandle) -> Option<&str> {
        self.entries.get(&action).map(String::as_str)
    }

    /// Whether the menu exists and the host still has it
    pub fn is_attached(&self, host: &dyn HostUi) -> bool {
        self.handle.is_some_and(|menu| host.menu_alive(menu))
    }

    /// Create the menu, or clear and repopulate it when it already exists
    ///
    /// # Errors
    ///
    /// Returns `HostRefused` when the host will not create, attach or clear
    /// the menu. Failures of single entries are logged and skipped.
    pub fn create(
        &mut self,
        host: &mut dyn HostUi,
        registry: &CommandRegistry,
        context: Option<&Context>,
        disabled: bool,
    ) -> Result<()> {
        self.build(host, registry, context, disabled)
    }

    /// Repopulate with the current disabled flag
    ///
    /// # Errors
    ///
    /// See [`MenuBuilder::create`].
    pub fn rebuild(
        &mut self,
        host: &mut dyn HostUi,
        registry: &CommandRegistry,
        context: Option<&Context>,
    ) -> Result<()> {
        let disabled = self.disabled;
        self.create(host, registry, context, disabled)
    }

    /// Re-create a menu the host tore down behind our back
    ///
    /// Returns `true` when the menu had to be re-created. A menu that was
    /// never created is left alone.
    ///
    /// # Errors
    ///
    /// See [`MenuBuilder::create`].
    pub fn ensure_attached(
        &mut self,
        host: &mut dyn HostUi,
        registry: &CommandRegistry,
        context: Option<&Context>,
    ) -> Result<bool> {
        match self.handle {
            Some(menu) if !host.menu_alive(menu) => {
                tracing::debug!(menu = %menu, "menu was removed by the host, re-creating");
                let disabled = self.disabled;
                self.build(host, registry, context, disabled)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Pop the menu up at an optional host position
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` before the menu is created and
    /// `HostRefused` when the host cannot show it.
    pub fn show(&self, host: &mut dyn HostUi, position: Option<(i32, i32)>) -> Result<()> {
        let menu = self.handle.ok_or_else(|| EngineError::InvalidTransition {
            op: "show menu".to_string(),
            state: "not created".to_string(),
        })?;
        host.show_menu(menu, position)
            .map_err(|e| EngineError::host_refused("show_menu", e))
    }

    /// Remove the menu from the host
    pub fn cleanup(&mut self, host: &mut dyn HostUi) {
        self.entries.clear();
        self.disabled = false;
        let Some(menu) = self.handle.take() else {
            return;
        };
        if !host.menu_alive(menu) {
            return;
        }
        if let Err(e) = host.destroy_menu(menu) {
            let err = EngineError::host_refused("destroy_menu", e);
            log_recovered!("menu_cleanup", err, menu = %menu);
        }
    }

    fn build(
        &mut self,
        host: &mut dyn HostUi,
        registry: &CommandRegistry,
        context: Option<&Context>,
        disabled: bool,
    ) -> Result<()> {
        let menu = match self.handle {
            Some(menu) if host.menu_alive(menu) => {
                host.clear_menu(menu)
                    .map_err(|e| EngineError::host_refused("clear_menu", e))?;
                menu
            }
            _ => self.acquire(host)?,
        };

        self.entries.clear();
        self.disabled = disabled;
        if disabled {
            self.add_label(host, menu, &format!("{} is disabled", self.title));
            return Ok(());
        }

        let header = context.map_or(NO_CONTEXT_LABEL, Context::display_name);
        self.add_label(host, menu, header);
        self.add_separator(host, menu);

        let visible: Vec<(&str, &CommandDescriptor)> = registry
            .all()
            .filter(|(name, descriptor)| {
                self.filter
                    .as_ref()
                    .map_or(true, |filter| filter(*name, *descriptor))
            })
            .collect();

        let (context_commands, standard): (Vec<_>, Vec<_>) = visible
            .into_iter()
            .partition(|(_, d)| d.placement() == Placement::ContextMenu);

        for (name, descriptor) in &context_commands {
            self.add_command(host, menu, name, descriptor);
        }
        self.add_separator(host, menu);

        for section in sections(&standard) {
            match section {
                Section::Single(name, descriptor) => self.add_command(host, menu, name, descriptor),
                Section::App(app, members) => {
                    let submenu = match host.add_submenu(menu, app) {
                        Ok(submenu) => submenu,
                        Err(e) => {
                            let err = EngineError::host_refused("add_submenu", e);
                            log_recovered!("menu_populate", err, app_instance = app);
                            continue;
                        }
                    };
                    for (name, descriptor) in members {
                        self.add_command(host, submenu, name, descriptor);
                    }
                }
            }
        }

        Ok(())
    }

    fn acquire(&mut self, host: &mut dyn HostUi) -> Result<MenuHandle> {
        let menu = host
            .create_menu(&self.title)
            .map_err(|e| EngineError::host_refused("create_menu", e))?;
        if let Err(e) = host.attach_menu(menu) {
            // The handle is useless without a menu bar slot
            if let Err(destroy_err) = host.destroy_menu(menu) {
                let err = EngineError::host_refused("destroy_menu", destroy_err);
                log_recovered!("menu_acquire", err, menu = %menu);
            }
            return Err(EngineError::host_refused("attach_menu", e));
        }
        self.handle = Some(menu);
        Ok(menu)
    }

    fn add_label(&mut self, host: &mut dyn HostUi, menu: MenuHandle, label: &str) {
        if let Err(e) = host.add_menu_item(menu, &ActionSpec::disabled_label(label)) {
            let err = EngineError::host_refused("add_menu_item", e);
            log_recovered!("menu_populate", err, label = label);
        }
    }

    fn add_separator(&mut self, host: &mut dyn HostUi, menu: MenuHandle) {
        if let Err(e) = host.add_menu_separator(menu) {
            let err = EngineError::host_refused("add_menu_separator", e);
            log_recovered!("menu_populate", err);
        }
    }

    fn add_command(
        &mut self,
        host: &mut dyn HostUi,
        menu: MenuHandle,
        name: &str,
        descriptor: &CommandDescriptor,
    ) {
        match host.add_menu_item(menu, &command_spec(name, descriptor)) {
            Ok(action) => {
                self.entries.insert(action, name.to_string());
            }
            Err(e) => {
                let err = EngineError::host_refused("add_menu_item", e);
                log_recovered!("menu_populate", err, command = name);
            }
        }
    }
}
