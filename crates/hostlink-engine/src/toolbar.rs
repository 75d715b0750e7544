//! Toolbar builder
//!
//! Places allow-listed platform commands and provider tool actions on the
//! integration's toolbar. Every action placed is remembered together with who
//! owns it, so cleanup releases exactly what the engine created and only
//! detaches what providers own.

use hostlink_core::errors::{EngineError, Result};
use hostlink_core::host::{ActionSpec, HostUi};
use hostlink_core::registry::{CommandCallback, CommandRegistry};
use hostlink_core::tool_action::{group_actions, ToolAction, ToolActionSource};
use hostlink_core::{log_config_warning, log_recovered};
use hostlink_core_types::{ActionHandle, ToolbarHandle};

const SETTING: &str = "toolbar_commands";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    Engine,
    Provider,
}

/// What a toolbar action does when clicked
#[derive(Clone)]
pub enum ToolbarBinding {
    /// Runs a registered command
    Command(String),
    /// Runs a provider tool action
    Tool { id: String, callback: CommandCallback },
    Divider,
}

struct Placed {
    action: ActionHandle,
    owner: Owner,
    binding: ToolbarBinding,
}

/// Builds and owns the integration's toolbar
pub struct ToolbarBuilder {
    title: String,
    object_name: String,
    commands: Vec<String>,
    handle: Option<ToolbarHandle>,
    placed: Vec<Placed>,
    warnings: Vec<EngineError>,
}

impl ToolbarBuilder {
    /// `commands` is the allow-list of platform commands, in display order
    pub fn new(title: impl Into<String>, commands: Vec<String>) -> Self {
        let title = title.into();
        Self {
            object_name: title.to_ascii_lowercase().replace(' ', "_"),
            title,
            commands,
            handle: None,
            placed: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn handle(&self) -> Option<ToolbarHandle> {
        self.handle
    }

    pub fn is_live(&self) -> bool {
        self.handle.is_some()
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    /// Actions and dividers currently placed
    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    /// Configuration warnings of the last build
    pub fn warnings(&self) -> &[EngineError] {
        &self.warnings
    }

    /// Binding of a toolbar action
    pub fn binding_for(&self, action: ActionHandle) -> Option<ToolbarBinding> {
        self.placed
            .iter()
            .find(|placed| placed.action == action)
            .map(|placed| placed.binding.clone())
    }

    /// Acquire the host toolbar handle
    ///
    /// # Errors
    ///
    /// Returns `ToolbarAlreadyLive` if a handle is already held, and
    /// `HostRefused` if the host will not create the toolbar.
    pub fn acquire(&mut self, host: &mut dyn HostUi) -> Result<ToolbarHandle> {
        if let Some(toolbar) = self.handle {
            return Err(EngineError::ToolbarAlreadyLive {
                toolbar: toolbar.to_string(),
            });
        }
        let toolbar = host
            .create_toolbar(&self.title, &self.object_name)
            .map_err(|e| EngineError::host_refused("create_toolbar", e))?;
        self.handle = Some(toolbar);
        Ok(toolbar)
    }

    /// Build the toolbar, rebuilding in place when it is already live
    ///
    /// No toolbar is created when there is nothing to show.
    ///
    /// # Errors
    ///
    /// Returns `HostRefused` when the host will not create the toolbar.
    pub fn create(
        &mut self,
        host: &mut dyn HostUi,
        registry: &CommandRegistry,
        tool_actions: Vec<ToolAction>,
    ) -> Result<()> {
        let toolbar = match self.handle {
            Some(toolbar) => {
                self.remove_placed(host, toolbar);
                toolbar
            }
            None if self.commands.is_empty() && tool_actions.is_empty() => {
                tracing::debug!("no toolbar commands or tool actions, toolbar not created");
                return Ok(());
            }
            None => self.acquire(host)?,
        };

        self.warnings.clear();
        self.populate(host, toolbar, registry, tool_actions);
        Ok(())
    }

    /// Remove every placed action and release the toolbar
    pub fn cleanup(&mut self, host: &mut dyn HostUi) {
        let Some(toolbar) = self.handle.take() else {
            return;
        };
        self.remove_placed(host, toolbar);
        if let Err(e) = host.destroy_toolbar(toolbar) {
            let err = EngineError::host_refused("destroy_toolbar", e);
            log_recovered!("toolbar_cleanup", err, toolbar = %toolbar);
        }
    }

    fn populate(
        &mut self,
        host: &mut dyn HostUi,
        toolbar: ToolbarHandle,
        registry: &CommandRegistry,
        tool_actions: Vec<ToolAction>,
    ) {
        let mut platform_count = 0;
        for name in self.commands.clone() {
            let descriptor = match registry.lookup(&name) {
                Ok(descriptor) => descriptor,
                Err(_) => {
                    let err = EngineError::UnknownCommand {
                        setting: SETTING.to_string(),
                        command: name.clone(),
                        known: registry.names(),
                    };
                    log_config_warning!("toolbar_populate", err, command = %name);
                    self.warnings.push(err);
                    continue;
                }
            };

            let spec = ActionSpec::new(name.as_str())
                .with_icon(descriptor.icon().cloned())
                .with_tooltip(name.as_str());
            if self.place_engine_action(host, toolbar, &spec, ToolbarBinding::Command(name)) {
                platform_count += 1;
            }
        }

        let groups = group_actions(tool_actions);
        if groups.is_empty() {
            return;
        }

        if platform_count > 0 {
            self.place_divider(host, toolbar);
        }
        for (index, (group, actions)) in groups.into_iter().enumerate() {
            if index > 0 {
                self.place_divider(host, toolbar);
            }
            tracing::debug!(group = %group, count = actions.len(), "placing tool actions");
            for action in actions {
                self.place_tool_action(host, toolbar, action);
            }
        }
        if platform_count > 0 {
            self.place_divider(host, toolbar);
        }
    }

    fn place_engine_action(
        &mut self,
        host: &mut dyn HostUi,
        toolbar: ToolbarHandle,
        spec: &ActionSpec,
        binding: ToolbarBinding,
    ) -> bool {
        match host.add_toolbar_action(toolbar, spec) {
            Ok(action) => {
                self.placed.push(Placed {
                    action,
                    owner: Owner::Engine,
                    binding,
                });
                true
            }
            Err(e) => {
                let err = EngineError::host_refused("add_toolbar_action", e);
                log_recovered!("toolbar_populate", err, label = %spec.label);
                false
            }
        }
    }

    fn place_divider(&mut self, host: &mut dyn HostUi, toolbar: ToolbarHandle) {
        match host.add_toolbar_divider(toolbar) {
            Ok(action) => self.placed.push(Placed {
                action,
                owner: Owner::Engine,
                binding: ToolbarBinding::Divider,
            }),
            Err(e) => {
                let err = EngineError::host_refused("add_toolbar_divider", e);
                log_recovered!("toolbar_populate", err);
            }
        }
    }

    fn place_tool_action(&mut self, host: &mut dyn HostUi, toolbar: ToolbarHandle, tool: ToolAction) {
        let binding = ToolbarBinding::Tool {
            id: tool.id.clone(),
            callback: tool.callback.clone(),
        };
        match tool.source {
            ToolActionSource::EngineCreated => {
                let spec = ActionSpec::new(tool.id.as_str())
                    .with_icon(tool.icon.clone())
                    .with_tooltip(tool.tooltip.as_str());
                self.place_engine_action(host, toolbar, &spec, binding);
            }
            ToolActionSource::Provided(action) => match host.attach_toolbar_action(toolbar, action) {
                Ok(()) => self.placed.push(Placed {
                    action,
                    owner: Owner::Provider,
                    binding,
                }),
                Err(e) => {
                    let err = EngineError::host_refused("attach_toolbar_action", e);
                    log_recovered!("toolbar_populate", err, tool_action = %tool.id);
                }
            },
        }
    }

    fn remove_placed(&mut self, host: &mut dyn HostUi, toolbar: ToolbarHandle) {
        for placed in self.placed.drain(..) {
            let (op, outcome) = match placed.owner {
                Owner::Engine => ("release_action", host.release_action(placed.action)),
                Owner::Provider => ("detach_action", host.detach_action(toolbar, placed.action)),
            };
            if let Err(e) = outcome {
                let err = EngineError::host_refused(op, e);
                log_recovered!("toolbar_clear", err, action = %placed.action);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_name_derived_from_title() {
        let toolbar = ToolbarBuilder::new("Pipeline Toolbar", vec![]);
        assert_eq!(toolbar.object_name(), "pipeline_toolbar");
        assert!(!toolbar.is_live());
        assert_eq!(toolbar.placed_count(), 0);
    }
}
