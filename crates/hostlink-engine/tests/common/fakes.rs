//! Recording fakes of the host and pipeline-platform boundaries
//!
//! The fakes share their state through `Rc<RefCell<..>>`: keep a clone
//! before boxing one into an engine and inspect it afterwards.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use hostlink_core::errors::Result;
use hostlink_core::host::{
    ActionSpec, ConsoleLevel, HostError, HostPlatform, HostResult, HostUi, MessageLevel, WindowSpec,
};
use hostlink_core::platform::{Context, PipelinePlatform, PlatformError, Workaround};
use hostlink_core::registry::{CommandDescriptor, CommandRegistry, Placement};
use hostlink_core::tool_action::{ToolAction, ToolActionProvider};
use hostlink_core::App;
use hostlink_core_types::{ActionHandle, MenuHandle, ToolbarHandle, WindowHandle};

/// Shared record of invoked callbacks
pub type CallLog = Rc<RefCell<Vec<String>>>;

pub fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// One entry of a fake host menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeMenuEntry {
    Item {
        label: String,
        enabled: bool,
        action: ActionHandle,
    },
    Separator,
    Submenu {
        title: String,
        menu: MenuHandle,
    },
}

#[derive(Debug)]
struct FakeHostState {
    next_id: u64,
    version: Option<String>,
    platform: HostPlatform,
    main_window: WindowHandle,
    menus: HashMap<MenuHandle, Vec<FakeMenuEntry>>,
    menu_titles: HashMap<MenuHandle, String>,
    attached_menus: Vec<MenuHandle>,
    shown_menus: Vec<(MenuHandle, Option<(i32, i32)>)>,
    toolbars: HashMap<ToolbarHandle, Vec<ActionHandle>>,
    toolbars_created: usize,
    engine_actions: HashSet<ActionHandle>,
    provided_actions: HashSet<ActionHandle>,
    released_provided: usize,
    windows: HashMap<WindowHandle, WindowSpec>,
    watched: HashSet<WindowHandle>,
    fail_close: HashSet<WindowHandle>,
    refused: HashSet<String>,
    calls: HashMap<String, usize>,
    broadcasts: Vec<String>,
    messages: Vec<(MessageLevel, String, String)>,
    console: Vec<(ConsoleLevel, String)>,
}

impl FakeHostState {
    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Count a call of `op` and fail it when the test refused it
    fn check(&mut self, op: &str) -> HostResult<()> {
        *self.calls.entry(op.to_string()).or_default() += 1;
        if self.refused.contains(op) {
            Err(HostError::new(format!("{} refused by test", op)))
        } else {
            Ok(())
        }
    }

    fn menu_mut(&mut self, menu: MenuHandle) -> HostResult<&mut Vec<FakeMenuEntry>> {
        self.menus
            .get_mut(&menu)
            .ok_or_else(|| HostError::new(format!("{} does not exist", menu)))
    }

    fn toolbar_mut(&mut self, toolbar: ToolbarHandle) -> HostResult<&mut Vec<ActionHandle>> {
        self.toolbars
            .get_mut(&toolbar)
            .ok_or_else(|| HostError::new(format!("{} does not exist", toolbar)))
    }

    /// Drop a menu and all of its submenus
    fn remove_menu_tree(&mut self, menu: MenuHandle) {
        if let Some(entries) = self.menus.remove(&menu) {
            for entry in entries {
                if let FakeMenuEntry::Submenu { menu, .. } = entry {
                    self.remove_menu_tree(menu);
                }
            }
        }
        self.attached_menus.retain(|m| *m != menu);
    }
}

/// In-memory host with live-handle accounting and injectable failures
#[derive(Debug, Clone)]
pub struct FakeHost {
    state: Rc<RefCell<FakeHostState>>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHost {
    /// Linux host reporting version 6.2
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(FakeHostState {
                next_id: 1,
                version: Some("6.2".to_string()),
                platform: HostPlatform::Linux,
                main_window: WindowHandle::new(1),
                menus: HashMap::new(),
                menu_titles: HashMap::new(),
                attached_menus: Vec::new(),
                shown_menus: Vec::new(),
                toolbars: HashMap::new(),
                toolbars_created: 0,
                engine_actions: HashSet::new(),
                provided_actions: HashSet::new(),
                released_provided: 0,
                windows: HashMap::new(),
                watched: HashSet::new(),
                fail_close: HashSet::new(),
                refused: HashSet::new(),
                calls: HashMap::new(),
                broadcasts: Vec::new(),
                messages: Vec::new(),
                console: Vec::new(),
            })),
        }
    }

    pub fn with_version(self, version: Option<&str>) -> Self {
        self.state.borrow_mut().version = version.map(str::to_string);
        self
    }

    pub fn with_platform(self, platform: HostPlatform) -> Self {
        self.state.borrow_mut().platform = platform;
        self
    }

    /// Make a host operation fail, by `HostUi` method name
    pub fn refuse(&self, op: &str) {
        self.state.borrow_mut().refused.insert(op.to_string());
    }

    /// Simulate the host (or another plugin) removing a menu
    pub fn kill_menu(&self, menu: MenuHandle) {
        self.state.borrow_mut().remove_menu_tree(menu);
    }

    /// Make closing this window fail
    pub fn fail_close_for(&self, window: WindowHandle) {
        self.state.borrow_mut().fail_close.insert(window);
    }

    /// Simulate the user closing a window; returns whether it was open
    pub fn user_closes(&self, window: WindowHandle) -> bool {
        self.state.borrow_mut().windows.remove(&window).is_some()
    }

    /// Create an action owned by a plugin, not by the engine
    pub fn provide_action(&self) -> ActionHandle {
        let mut state = self.state.borrow_mut();
        let action = ActionHandle::new(state.next());
        state.provided_actions.insert(action);
        action
    }

    // ===== Inspection =====

    /// Menus attached to the menu bar that still exist
    pub fn attached_menus(&self) -> Vec<MenuHandle> {
        self.state.borrow().attached_menus.clone()
    }

    /// Menus and submenus that exist, attached or not
    pub fn live_menu_count(&self) -> usize {
        self.state.borrow().menus.len()
    }

    pub fn menu_title(&self, menu: MenuHandle) -> Option<String> {
        self.state.borrow().menu_titles.get(&menu).cloned()
    }

    pub fn menu_entries(&self, menu: MenuHandle) -> Vec<FakeMenuEntry> {
        self.state
            .borrow()
            .menus
            .get(&menu)
            .cloned()
            .unwrap_or_default()
    }

    /// Flattened menu layout: labels, `---` for separators, `>title` for
    /// submenus followed by their indented content
    pub fn menu_outline(&self, menu: MenuHandle) -> Vec<String> {
        let mut lines = Vec::new();
        self.outline_into(menu, "", &mut lines);
        lines
    }

    fn outline_into(&self, menu: MenuHandle, indent: &str, lines: &mut Vec<String>) {
        for entry in self.menu_entries(menu) {
            match entry {
                FakeMenuEntry::Item { label, .. } => lines.push(format!("{}{}", indent, label)),
                FakeMenuEntry::Separator => lines.push(format!("{}---", indent)),
                FakeMenuEntry::Submenu { title, menu } => {
                    lines.push(format!("{}>{}", indent, title));
                    self.outline_into(menu, &format!("{}  ", indent), lines);
                }
            }
        }
    }

    /// Clickable item with this label, searched through submenus
    pub fn find_menu_action(&self, menu: MenuHandle, label: &str) -> Option<ActionHandle> {
        for entry in self.menu_entries(menu) {
            match entry {
                FakeMenuEntry::Item {
                    label: l,
                    enabled: true,
                    action,
                } if l == label => return Some(action),
                FakeMenuEntry::Submenu { menu, .. } => {
                    if let Some(action) = self.find_menu_action(menu, label) {
                        return Some(action);
                    }
                }
                _ => {}
            }
        }
        None
    }

    pub fn shown_menus(&self) -> Vec<(MenuHandle, Option<(i32, i32)>)> {
        self.state.borrow().shown_menus.clone()
    }

    /// Number of calls of a `HostUi` method, by method name
    pub fn call_count(&self, op: &str) -> usize {
        self.state.borrow().calls.get(op).copied().unwrap_or(0)
    }

    pub fn live_toolbars(&self) -> Vec<ToolbarHandle> {
        self.state.borrow().toolbars.keys().copied().collect()
    }

    pub fn toolbars_created(&self) -> usize {
        self.state.borrow().toolbars_created
    }

    pub fn toolbar_actions(&self, toolbar: ToolbarHandle) -> Vec<ActionHandle> {
        self.state
            .borrow()
            .toolbars
            .get(&toolbar)
            .cloned()
            .unwrap_or_default()
    }

    /// Engine-created toolbar actions not yet released
    pub fn live_action_count(&self) -> usize {
        self.state.borrow().engine_actions.len()
    }

    /// Times the engine tried to release an action a plugin owns
    pub fn released_provided_count(&self) -> usize {
        self.state.borrow().released_provided
    }

    pub fn open_windows(&self) -> Vec<WindowHandle> {
        self.state.borrow().windows.keys().copied().collect()
    }

    pub fn is_watched(&self, window: WindowHandle) -> bool {
        self.state.borrow().watched.contains(&window)
    }

    pub fn broadcasts(&self) -> Vec<String> {
        self.state.borrow().broadcasts.clone()
    }

    pub fn messages(&self) -> Vec<(MessageLevel, String, String)> {
        self.state.borrow().messages.clone()
    }

    pub fn messages_at(&self, level: MessageLevel) -> usize {
        self.state
            .borrow()
            .messages
            .iter()
            .filter(|(l, _, _)| *l == level)
            .count()
    }

    pub fn console_lines(&self) -> Vec<(ConsoleLevel, String)> {
        self.state.borrow().console.clone()
    }
}

impl HostUi for FakeHost {
    fn application_version(&self) -> Option<String> {
        self.state.borrow().version.clone()
    }

    fn platform(&self) -> HostPlatform {
        self.state.borrow().platform.clone()
    }

    fn main_window(&self) -> Option<WindowHandle> {
        Some(self.state.borrow().main_window)
    }

    fn create_menu(&mut self, title: &str) -> HostResult<MenuHandle> {
        let mut state = self.state.borrow_mut();
        state.check("create_menu")?;
        let menu = MenuHandle::new(state.next());
        state.menus.insert(menu, Vec::new());
        state.menu_titles.insert(menu, title.to_string());
        Ok(menu)
    }

    fn attach_menu(&mut self, menu: MenuHandle) -> HostResult<()> {
        let mut state = self.state.borrow_mut();
        state.check("attach_menu")?;
        state.menu_mut(menu)?;
        state.attached_menus.push(menu);
        Ok(())
    }

    fn menu_alive(&self, menu: MenuHandle) -> bool {
        self.state.borrow().menus.contains_key(&menu)
    }

    fn clear_menu(&mut self, menu: MenuHandle) -> HostResult<()> {
        let mut state = self.state.borrow_mut();
        state.check("clear_menu")?;
        let entries = std::mem::take(state.menu_mut(menu)?);
        for entry in entries {
            if let FakeMenuEntry::Submenu { menu, .. } = entry {
                state.remove_menu_tree(menu);
            }
        }
        Ok(())
    }

    fn add_submenu(&mut self, parent: MenuHandle, title: &str) -> HostResult<MenuHandle> {
        let mut state = self.state.borrow_mut();
        state.check("add_submenu")?;
        let submenu = MenuHandle::new(state.next());
        state.menu_mut(parent)?.push(FakeMenuEntry::Submenu {
            title: title.to_string(),
            menu: submenu,
        });
        state.menus.insert(submenu, Vec::new());
        state.menu_titles.insert(submenu, title.to_string());
        Ok(submenu)
    }

    fn add_menu_item(&mut self, menu: MenuHandle, spec: &ActionSpec) -> HostResult<ActionHandle> {
        let mut state = self.state.borrow_mut();
        state.check("add_menu_item")?;
        let action = ActionHandle::new(state.next());
        state.menu_mut(menu)?.push(FakeMenuEntry::Item {
            label: spec.label.clone(),
            enabled: spec.enabled,
            action,
        });
        Ok(action)
    }

    fn add_menu_separator(&mut self, menu: MenuHandle) -> HostResult<ActionHandle> {
        let mut state = self.state.borrow_mut();
        let action = ActionHandle::new(state.next());
        state.menu_mut(menu)?.push(FakeMenuEntry::Separator);
        Ok(action)
    }

    fn show_menu(&mut self, menu: MenuHandle, position: Option<(i32, i32)>) -> HostResult<()> {
        let mut state = self.state.borrow_mut();
        state.menu_mut(menu)?;
        state.shown_menus.push((menu, position));
        Ok(())
    }

    fn destroy_menu(&mut self, menu: MenuHandle) -> HostResult<()> {
        let mut state = self.state.borrow_mut();
        state.check("destroy_menu")?;
        state.menu_mut(menu)?;
        state.remove_menu_tree(menu);
        Ok(())
    }

    fn create_toolbar(&mut self, _title: &str, _object_name: &str) -> HostResult<ToolbarHandle> {
        let mut state = self.state.borrow_mut();
        state.check("create_toolbar")?;
        let toolbar = ToolbarHandle::new(state.next());
        state.toolbars.insert(toolbar, Vec::new());
        state.toolbars_created += 1;
        Ok(toolbar)
    }

    fn add_toolbar_action(
        &mut self,
        toolbar: ToolbarHandle,
        _spec: &ActionSpec,
    ) -> HostResult<ActionHandle> {
        let mut state = self.state.borrow_mut();
        state.check("add_toolbar_action")?;
        let action = ActionHandle::new(state.next());
        state.toolbar_mut(toolbar)?.push(action);
        state.engine_actions.insert(action);
        Ok(action)
    }

    fn add_toolbar_divider(&mut self, toolbar: ToolbarHandle) -> HostResult<ActionHandle> {
        let mut state = self.state.borrow_mut();
        let action = ActionHandle::new(state.next());
        state.toolbar_mut(toolbar)?.push(action);
        state.engine_actions.insert(action);
        Ok(action)
    }

    fn attach_toolbar_action(
        &mut self,
        toolbar: ToolbarHandle,
        action: ActionHandle,
    ) -> HostResult<()> {
        let mut state = self.state.borrow_mut();
        if !state.provided_actions.contains(&action) {
            return Err(HostError::new(format!("{} does not exist", action)));
        }
        state.toolbar_mut(toolbar)?.push(action);
        Ok(())
    }

    fn detach_action(&mut self, toolbar: ToolbarHandle, action: ActionHandle) -> HostResult<()> {
        let mut state = self.state.borrow_mut();
        state.toolbar_mut(toolbar)?.retain(|a| *a != action);
        Ok(())
    }

    fn release_action(&mut self, action: ActionHandle) -> HostResult<()> {
        let mut state = self.state.borrow_mut();
        if state.provided_actions.contains(&action) {
            state.released_provided += 1;
            return Err(HostError::new(format!("{} is owned by a plugin", action)));
        }
        if !state.engine_actions.remove(&action) {
            return Err(HostError::new(format!("{} does not exist", action)));
        }
        for actions in state.toolbars.values_mut() {
            actions.retain(|a| *a != action);
        }
        Ok(())
    }

    fn destroy_toolbar(&mut self, toolbar: ToolbarHandle) -> HostResult<()> {
        let mut state = self.state.borrow_mut();
        state
            .toolbars
            .remove(&toolbar)
            .map(|_| ())
            .ok_or_else(|| HostError::new(format!("{} does not exist", toolbar)))
    }

    fn create_window(
        &mut self,
        spec: &WindowSpec,
        _parent: Option<WindowHandle>,
    ) -> HostResult<WindowHandle> {
        let mut state = self.state.borrow_mut();
        state.check("create_window")?;
        let window = WindowHandle::new(state.next());
        state.windows.insert(window, spec.clone());
        Ok(window)
    }

    fn watch_close(&mut self, window: WindowHandle) -> HostResult<()> {
        let mut state = self.state.borrow_mut();
        state.check("watch_close")?;
        state.watched.insert(window);
        Ok(())
    }

    fn close_window(&mut self, window: WindowHandle) -> HostResult<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_close.contains(&window) {
            return Err(HostError::new(format!("{} refused to close", window)));
        }
        state.windows.remove(&window);
        state.watched.remove(&window);
        Ok(())
    }

    fn broadcast(&mut self, event: &str) -> HostResult<()> {
        let mut state = self.state.borrow_mut();
        state.check("broadcast")?;
        state.broadcasts.push(event.to_string());
        Ok(())
    }

    fn console(&mut self, level: ConsoleLevel, line: &str) {
        self.state.borrow_mut().console.push((level, line.to_string()));
    }

    fn show_message(&mut self, level: MessageLevel, title: &str, text: &str) {
        self.state
            .borrow_mut()
            .messages
            .push((level, title.to_string(), text.to_string()));
    }
}

#[derive(Debug, Default)]
struct FakePlatformState {
    contexts: HashMap<PathBuf, Context>,
    fail_project_context: bool,
    fail_startup_hook: bool,
    startup_hook_calls: usize,
    workarounds: Vec<Workaround>,
}

/// In-memory pipeline platform resolving contexts from a path table
#[derive(Debug, Clone, Default)]
pub struct FakePlatform {
    state: Rc<RefCell<FakePlatformState>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `path` to `context`
    pub fn with_context(self, path: impl Into<PathBuf>, context: Context) -> Self {
        self.state.borrow_mut().contexts.insert(path.into(), context);
        self
    }

    pub fn fail_project_context(&self) {
        self.state.borrow_mut().fail_project_context = true;
    }

    pub fn fail_startup_hook(&self) {
        self.state.borrow_mut().fail_startup_hook = true;
    }

    pub fn startup_hook_calls(&self) -> usize {
        self.state.borrow().startup_hook_calls
    }

    pub fn workarounds(&self) -> Vec<Workaround> {
        self.state.borrow().workarounds.clone()
    }
}

impl PipelinePlatform for FakePlatform {
    fn context_from_path(
        &self,
        path: &Path,
        _previous: Option<&Context>,
    ) -> std::result::Result<Context, PlatformError> {
        self.state
            .borrow()
            .contexts
            .get(path)
            .cloned()
            .ok_or_else(|| PlatformError::new(format!("no context for {}", path.display())))
    }

    fn project_context(&self, current: &Context) -> std::result::Result<Context, PlatformError> {
        if self.state.borrow().fail_project_context {
            return Err(PlatformError::new("project lookup failed"));
        }
        current
            .project()
            .map(|project| Context::new(project, project).with_project(project))
            .ok_or_else(|| PlatformError::new("context has no project"))
    }

    fn run_startup_hook(&self) -> std::result::Result<(), PlatformError> {
        let mut state = self.state.borrow_mut();
        state.startup_hook_calls += 1;
        if state.fail_startup_hook {
            return Err(PlatformError::new("startup hook raised"));
        }
        Ok(())
    }

    fn apply_workaround(&self, workaround: Workaround) {
        self.state.borrow_mut().workarounds.push(workaround);
    }
}

/// App registering a fixed list of commands that record their invocation
pub struct RecordingApp {
    instance: String,
    commands: Vec<(String, Placement)>,
    failing: HashSet<String>,
    log: CallLog,
}

impl RecordingApp {
    pub fn new(instance: &str, commands: &[&str], log: CallLog) -> Self {
        Self {
            instance: instance.to_string(),
            commands: commands
                .iter()
                .map(|c| (c.to_string(), Placement::Standard))
                .collect(),
            failing: HashSet::new(),
            log,
        }
    }

    pub fn with_context_command(mut self, name: &str) -> Self {
        self.commands.push((name.to_string(), Placement::ContextMenu));
        self
    }

    /// Make a command's callback return an error
    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }
}

impl App for RecordingApp {
    fn instance_name(&self) -> &str {
        &self.instance
    }

    fn register_commands(&self, registry: &mut CommandRegistry) -> Result<()> {
        for (name, placement) in &self.commands {
            let log = Rc::clone(&self.log);
            let tag = name.clone();
            let fails = self.failing.contains(name);
            let mut descriptor = CommandDescriptor::new(move || {
                log.borrow_mut().push(tag.clone());
                if fails {
                    anyhow::bail!("{} failed", tag);
                }
                Ok(())
            })
            .with_app(self.instance.as_str());
            if *placement == Placement::ContextMenu {
                descriptor = descriptor.context_menu();
            }
            registry.register(name.as_str(), descriptor)?;
        }
        Ok(())
    }
}

/// Provider returning a fixed set of tool actions
pub struct StaticToolActions {
    name: String,
    actions: Vec<(String, String, Option<ActionHandle>)>,
    log: CallLog,
}

impl StaticToolActions {
    pub fn new(name: &str, log: CallLog) -> Self {
        Self {
            name: name.to_string(),
            actions: Vec::new(),
            log,
        }
    }

    /// Action the engine creates
    pub fn action(mut self, id: &str, group: &str) -> Self {
        self.actions.push((id.to_string(), group.to_string(), None));
        self
    }

    /// Action backed by a host action the provider owns
    pub fn provided(mut self, id: &str, group: &str, action: ActionHandle) -> Self {
        self.actions
            .push((id.to_string(), group.to_string(), Some(action)));
        self
    }
}

impl ToolActionProvider for StaticToolActions {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_tool_actions(&self) -> anyhow::Result<Vec<ToolAction>> {
        Ok(self
            .actions
            .iter()
            .map(|(id, group, provided)| {
                let log = Rc::clone(&self.log);
                let tag = id.clone();
                let action = ToolAction::new(id.as_str(), group.as_str(), move || {
                    log.borrow_mut().push(tag.clone());
                    Ok(())
                });
                match provided {
                    Some(handle) => action.provided(*handle),
                    None => action,
                }
            })
            .collect())
    }
}

/// Provider that fails every time it is asked
pub struct FailingProvider {
    panics: bool,
}

impl FailingProvider {
    pub fn erroring() -> Self {
        Self { panics: false }
    }

    pub fn panicking() -> Self {
        Self { panics: true }
    }
}

impl ToolActionProvider for FailingProvider {
    fn name(&self) -> &str {
        if self.panics {
            "panicking-provider"
        } else {
            "erroring-provider"
        }
    }

    fn list_tool_actions(&self) -> anyhow::Result<Vec<ToolAction>> {
        if self.panics {
            panic!("provider crashed while listing actions");
        }
        anyhow::bail!("malformed tool action table")
    }
}
