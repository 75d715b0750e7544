//! Tool actions contributed by plugin providers
//!
//! Besides platform commands, the toolbar shows actions offered by third
//! party plugins. Providers are registered explicitly with the catalog; a
//! provider that fails only loses its own contribution.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::rc::Rc;

use hostlink_core_types::ActionHandle;

use crate::errors::EngineError;
use crate::log_config_warning;
use crate::registry::CommandCallback;

/// Who owns the host action behind a tool action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolActionSource {
    /// The engine creates the host action and releases it on cleanup
    EngineCreated,
    /// The provider already owns this host action; the engine only attaches
    /// and detaches it
    Provided(ActionHandle),
}

/// One toolbar action offered by a provider
#[derive(Clone)]
pub struct ToolAction {
    pub id: String,
    pub callback: CommandCallback,
    pub icon: Option<PathBuf>,
    pub tooltip: String,
    pub group: String,
    pub source: ToolActionSource,
}

impl ToolAction {
    pub fn new<F>(id: impl Into<String>, group: impl Into<String>, callback: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + 'static,
    {
        let id = id.into();
        Self {
            tooltip: id.clone(),
            id,
            callback: Rc::new(callback),
            icon: None,
            group: group.into(),
            source: ToolActionSource::EngineCreated,
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

    /// Mark the action as backed by a host action the provider owns
    pub fn provided(mut self, action: ActionHandle) -> Self {
        self.source = ToolActionSource::Provided(action);
        self
    }
}

impl fmt::Debug for ToolAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolAction")
            .field("id", &self.id)
            .field("group", &self.group)
            .field("tooltip", &self.tooltip)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// A plugin module contributing toolbar actions
pub trait ToolActionProvider {
    fn name(&self) -> &str;

    /// Actions this provider wants on the toolbar
    ///
    /// # Errors
    ///
    /// Any error drops this provider's contribution for the current build.
    fn list_tool_actions(&self) -> anyhow::Result<Vec<ToolAction>>;
}

/// Explicitly registered tool-action providers
#[derive(Default)]
pub struct ToolActionCatalog {
    providers: Vec<Box<dyn ToolActionProvider>>,
}

impl ToolActionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Box<dyn ToolActionProvider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Collect the actions of every provider, in registration order
    ///
    /// A provider returning an error or panicking contributes nothing; the
    /// failure is logged as `PluginContributionFailure`.
    pub fn discover(&self) -> Vec<ToolAction> {
        let mut actions = Vec::new();
        for provider in &self.providers {
            let listed = panic::catch_unwind(AssertUnwindSafe(|| provider.list_tool_actions()));
            let reason = match listed {
                Ok(Ok(mut contributed)) => {
                    tracing::debug!(
                        provider = provider.name(),
                        count = contributed.len(),
                        "collected tool actions"
                    );
                    actions.append(&mut contributed);
                    continue;
                }
                Ok(Err(err)) => format!("{:#}", err),
                Err(_) => "provider panicked while listing tool actions".to_string(),
            };

            let err = EngineError::PluginContribution {
                provider: provider.name().to_string(),
                reason,
            };
            log_config_warning!("discover_tool_actions", err, provider = provider.name());
        }
        actions
    }
}

/// Group actions by their group tag, keeping first-seen group order
pub fn group_actions(actions: Vec<ToolAction>) -> Vec<(String, Vec<ToolAction>)> {
    let mut groups: Vec<(String, Vec<ToolAction>)> = Vec::new();
    for action in actions {
        match groups.iter_mut().find(|(group, _)| *group == action.group) {
            Some((_, members)) => members.push(action),
            None => groups.push((action.group.clone(), vec![action])),
        }
    }
    groups
}
