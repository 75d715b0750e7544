//! Engine lifecycle
//!
//! State machine of one integration session:
//!
//! ```text
//! Uninitialized --pre_init--> PreInitialized --app_init--> Running
//! Running --on_context_changed--> Running
//! any --destroy--> ShuttingDown --> Destroyed
//! ```
//!
//! Only `FatalStartup` errors stop the integration. Everything else is
//! recovered at the component that detects it and logged.

use std::fmt;
use std::path::Path;
use std::time::Instant;

use hostlink_core::core_types::schema::{BROADCAST_ENGINE_READY, EVENT_UNTESTED_VERSION};
use hostlink_core::errors::{EngineError, Result};
use hostlink_core::host::{HostPlatform, HostUi, MessageLevel, WindowSpec};
use hostlink_core::invoke::invoke_isolated;
use hostlink_core::platform::{Context, PipelinePlatform, Workaround};
use hostlink_core::registry::CommandRegistry;
use hostlink_core::settings::EngineSettings;
use hostlink_core::startup::{StartupReport, StartupRunner};
use hostlink_core::tool_action::{ToolActionCatalog, ToolActionProvider};
use hostlink_core::version::{major_component, Compatibility, VersionGate};
use hostlink_core::{log_config_warning, log_op_end, log_op_error, log_op_start, log_recovered};
use hostlink_core::App;
use hostlink_core_types::{ActionHandle, SessionId, WindowHandle};

use crate::builtin;
use crate::dispatch::{MainThreadDispatcher, MainThreadSender, MainThreadTask};
use crate::events::HostEvent;
use crate::menu::{MenuBuilder, MenuFilter};
use crate::slot::EngineSlot;
use crate::toolbar::{ToolbarBinding, ToolbarBuilder};
use crate::windows::WindowManager;

const DIALOG_TITLE: &str = "Pipeline";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    PreInitialized,
    Running,
    ShuttingDown,
    Destroyed,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineState::Uninitialized => "uninitialized",
            EngineState::PreInitialized => "pre-initialized",
            EngineState::Running => "running",
            EngineState::ShuttingDown => "shutting down",
            EngineState::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Assembles an engine from its collaborators
pub struct EngineBuilder {
    host: Box<dyn HostUi>,
    platform: Box<dyn PipelinePlatform>,
    context: Option<Context>,
    settings: EngineSettings,
    apps: Vec<Box<dyn App>>,
    catalog: ToolActionCatalog,
    slot: EngineSlot,
    dispatcher: Option<MainThreadDispatcher>,
    menu_filter: Option<MenuFilter>,
}

impl EngineBuilder {
    pub fn new(
        host: Box<dyn HostUi>,
        platform: Box<dyn PipelinePlatform>,
        context: Option<Context>,
    ) -> Self {
        Self {
            host,
            platform,
            context,
            settings: EngineSettings::default(),
            apps: Vec::new(),
            catalog: ToolActionCatalog::new(),
            slot: EngineSlot::new(),
            dispatcher: None,
            menu_filter: None,
        }
    }

    pub fn settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn app(mut self, app: Box<dyn App>) -> Self {
        self.apps.push(app);
        self
    }

    pub fn tool_action_provider(mut self, provider: Box<dyn ToolActionProvider>) -> Self {
        self.catalog.register(provider);
        self
    }

    /// Share the current-engine slot with other engines of this process
    pub fn slot(mut self, slot: EngineSlot) -> Self {
        self.slot = slot;
        self
    }

    /// Use a dispatcher whose sender is already wired into logging
    pub fn dispatcher(mut self, dispatcher: MainThreadDispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn menu_filter(mut self, filter: MenuFilter) -> Self {
        self.menu_filter = Some(filter);
        self
    }

    pub fn build(self) -> Engine {
        let menu_name = self.settings.menu_name();
        let mut menu = MenuBuilder::new(menu_name);
        if let Some(filter) = self.menu_filter {
            menu = menu.with_filter(filter);
        }
        let toolbar = ToolbarBuilder::new(
            self.settings.toolbar_name(),
            self.settings.toolbar_commands.clone(),
        );

        Engine {
            session: SessionId::new(),
            state: EngineState::Uninitialized,
            host: self.host,
            platform: self.platform,
            context: self.context,
            settings: self.settings,
            apps: self.apps,
            catalog: self.catalog,
            registry: CommandRegistry::new(),
            menu,
            toolbar,
            windows: WindowManager::new(),
            slot: self.slot,
            dispatcher: self.dispatcher.unwrap_or_default(),
            fatal: None,
            startup_report: None,
            shutting_down: false,
        }
    }
}

/// One integration session inside the host
pub struct Engine {
    session: SessionId,
    state: EngineState,
    host: Box<dyn HostUi>,
    platform: Box<dyn PipelinePlatform>,
    context: Option<Context>,
    settings: EngineSettings,
    apps: Vec<Box<dyn App>>,
    catalog: ToolActionCatalog,
    registry: CommandRegistry,
    menu: MenuBuilder,
    toolbar: ToolbarBuilder,
    windows: WindowManager,
    slot: EngineSlot,
    dispatcher: MainThreadDispatcher,
    fatal: Option<EngineError>,
    startup_report: Option<StartupReport>,
    shutting_down: bool,
}

impl Engine {
    // ===== Accessors =====

    pub fn session(&self) -> &SessionId {
        &self.session
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn menu(&self) -> &MenuBuilder {
        &self.menu
    }

    pub fn toolbar(&self) -> &ToolbarBuilder {
        &self.toolbar
    }

    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    pub fn host(&self) -> &dyn HostUi {
        self.host.as_ref()
    }

    pub fn slot(&self) -> &EngineSlot {
        &self.slot
    }

    /// Sender for posting work to this engine's UI thread
    pub fn sender(&self) -> MainThreadSender {
        self.dispatcher.sender()
    }

    /// The fatal error that stopped initialization, if any
    pub fn fatal_error(&self) -> Option<&EngineError> {
        self.fatal.as_ref()
    }

    pub fn startup_report(&self) -> Option<&StartupReport> {
        self.startup_report.as_ref()
    }

    fn expect_state(&self, op: &str, expected: EngineState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(EngineError::InvalidTransition {
                op: op.to_string(),
                state: self.state.to_string(),
            })
        }
    }

    /// Refuse to start while another session owns the slot
    fn expect_free_slot(&self, op: &str) -> Result<()> {
        match self.slot.current() {
            Some(session) if session != self.session => Err(EngineError::EngineAlreadyRunning {
                op: op.to_string(),
                session: session.to_string(),
            }),
            _ => Ok(()),
        }
    }

    // ===== Initialization =====

    /// Validate platform and host version
    ///
    /// On a fatal error the menu is still shown, disabled, and an error
    /// dialog is raised.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedPlatform` or `UnsupportedVersion` (both
    /// `FatalStartup`), `InvalidTransition` outside `Uninitialized`, and
    /// `EngineAlreadyRunning` while another session is current.
    pub fn pre_init(&mut self) -> Result<()> {
        self.expect_state("pre_init", EngineState::Uninitialized)?;
        self.expect_free_slot("pre_init")?;

        log_op_start!("pre_init", session_id = %self.session);
        let start = Instant::now();

        let result = self.pre_init_impl();

        match &result {
            Ok(()) => {
                self.state = EngineState::PreInitialized;
                log_op_end!("pre_init", duration_ms = elapsed_ms(start));
            }
            Err(err) => {
                log_op_error!("pre_init", err, duration_ms = elapsed_ms(start));
                if err.kind().is_fatal() {
                    self.disable_after_fatal(err.clone());
                }
            }
        }

        result
    }

    fn pre_init_impl(&mut self) -> Result<()> {
        let platform = self.host.platform();
        if !platform.is_supported() {
            return Err(EngineError::UnsupportedPlatform {
                platform: platform.name().to_string(),
            });
        }

        let gate = VersionGate::new(
            &self.settings.minimum_version,
            &self.settings.last_tested_version,
        )?;
        let raw = self.host.application_version().unwrap_or_default();
        tracing::info!(host_version = %raw, platform = platform.name(), "host detected");

        match gate.assess(&raw) {
            Compatibility::Unknown => {
                tracing::warn!(
                    host_version = %raw,
                    "could not determine the host version, assuming it is supported"
                );
            }
            Compatibility::Supported => {}
            Compatibility::Unsupported => {
                return Err(EngineError::UnsupportedVersion {
                    version: raw,
                    minimum: gate.minimum_raw().to_string(),
                });
            }
            Compatibility::Untested => self.handle_untested_version(&raw, &platform),
        }

        Ok(())
    }

    fn handle_untested_version(&mut self, raw: &str, platform: &HostPlatform) {
        let message = format!(
            "The pipeline integration has not yet been fully tested with host version {}. \
             You can continue to use it but you may experience bugs or instability.",
            raw
        );

        // The dialog is shown at most once per process, and only from the
        // configured major version on
        let first_time = self.slot.mark_compat_dialog_shown();
        let dialog_allowed = major_component(raw)
            .map_or(true, |major| major >= self.settings.compatibility_dialog_min_version);
        if first_time && dialog_allowed {
            self.host
                .show_message(MessageLevel::Info, DIALOG_TITLE, &message);
        }

        tracing::warn!(
            event = EVENT_UNTESTED_VERSION,
            session_id = %self.session,
            host_version = raw,
            "{}",
            message
        );

        if *platform == HostPlatform::Windows {
            tracing::debug!("host on Windows can deadlock loading web engine widgets, skipping them");
            self.platform.apply_workaround(Workaround::SkipWebEngineWidgets);
        }
    }

    fn disable_after_fatal(&mut self, err: EngineError) {
        self.host
            .show_message(MessageLevel::Error, DIALOG_TITLE, &err.to_string());
        if let Err(menu_err) = self.menu.create(
            self.host.as_mut(),
            &self.registry,
            self.context.as_ref(),
            true,
        ) {
            log_recovered!("pre_init", menu_err);
        }
        self.fatal = Some(err);
    }

    /// Load apps and build the UI
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `PreInitialized` and
    /// `EngineAlreadyRunning` while another session is current. Failures of
    /// single apps, commands or UI elements are logged, never returned.
    pub fn app_init(&mut self) -> Result<()> {
        self.expect_state("app_init", EngineState::PreInitialized)?;
        self.expect_free_slot("app_init")?;

        log_op_start!("app_init", session_id = %self.session);
        let start = Instant::now();

        self.registry = self.build_registry();

        if let Err(e) = self.platform.run_startup_hook() {
            let err = EngineError::Internal {
                message: format!("startup hook failed: {}", e),
            };
            log_recovered!("app_init", err);
        }

        self.build_ui(false);

        let report = StartupRunner::new(&self.registry).run(&self.settings.run_at_startup);
        self.startup_report = Some(report);

        self.slot.set(self.session.clone());
        if let Err(e) = self.host.broadcast(BROADCAST_ENGINE_READY) {
            let err = EngineError::host_refused("broadcast", e);
            log_recovered!("app_init", err);
        }

        self.state = EngineState::Running;
        log_op_end!(
            "app_init",
            duration_ms = elapsed_ms(start),
            commands = self.registry.len()
        );
        Ok(())
    }

    fn build_registry(&self) -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        if let Err(err) = builtin::register(
            &mut registry,
            self.settings.log_folder.clone(),
            self.dispatcher.sender(),
        ) {
            log_recovered!("register_commands", err);
        }

        for app in &self.apps {
            if let Err(err) = app.register_commands(&mut registry) {
                log_config_warning!("register_commands", err, app_instance = app.instance_name());
            }
        }
        registry
    }

    /// Create or rebuild menu and toolbar from the current registry
    fn build_ui(&mut self, disabled: bool) {
        if let Err(err) = self.menu.create(
            self.host.as_mut(),
            &self.registry,
            self.context.as_ref(),
            disabled,
        ) {
            log_recovered!("build_menu", err);
        }

        let tool_actions = self.catalog.discover();
        if let Err(err) = self
            .toolbar
            .create(self.host.as_mut(), &self.registry, tool_actions)
        {
            log_recovered!("build_toolbar", err);
        }
    }

    // ===== Context =====

    /// React to a context switch
    ///
    /// Built-in commands and a menu torn down by the host are always
    /// restored. Menu and toolbar are rebuilt only when the context really
    /// changed and automatic switching is on.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless running.
    pub fn on_context_changed(
        &mut self,
        old: Option<&Context>,
        new: Option<&Context>,
    ) -> Result<()> {
        self.expect_state("on_context_changed", EngineState::Running)?;
        self.context = new.cloned();

        let added = builtin::ensure(
            &mut self.registry,
            self.settings.log_folder.clone(),
            self.dispatcher.sender(),
        );
        if added > 0 {
            tracing::debug!(added, "re-registered built-in commands");
        }

        match self
            .menu
            .ensure_attached(self.host.as_mut(), &self.registry, self.context.as_ref())
        {
            Ok(true) => tracing::debug!("menu re-attached"),
            Ok(false) => {}
            Err(err) => log_recovered!("on_context_changed", err),
        }

        if old == new {
            return Ok(());
        }
        if !self.settings.automatic_context_switch {
            tracing::debug!("automatic context switch disabled, menu kept");
            return Ok(());
        }

        tracing::info!(
            context = new.map_or("none", Context::display_name),
            "context changed, rebuilding menu and toolbar"
        );
        self.build_ui(false);
        Ok(())
    }

    /// Switch to a new context; a no-op when it is the current one
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless running.
    pub fn change_context(&mut self, new: Context) -> Result<()> {
        if self.context.as_ref() == Some(&new) {
            return Ok(());
        }
        let old = self.context.clone();
        self.on_context_changed(old.as_ref(), Some(&new))
    }

    /// Context change after a project event that resolved a context
    ///
    /// A menu disabled by an earlier unresolvable project is rebuilt enabled,
    /// even when the context did not change.
    fn enter_context(&mut self, old: Option<&Context>, new: Option<&Context>) -> Result<()> {
        self.on_context_changed(old, new)?;
        if self.menu.is_disabled() {
            tracing::info!("project context known again, re-enabling menu");
            self.build_ui(false);
        }
        Ok(())
    }

    fn refresh_context_from_path(&mut self, path: &Path) -> Result<()> {
        let previous = self.context.clone();
        let resolved = self.platform.context_from_path(path, previous.as_ref());

        let resolution_err = match resolved {
            Ok(context) => return self.enter_context(previous.as_ref(), Some(&context)),
            Err(e) => EngineError::ContextUnresolved {
                path: path.display().to_string(),
                reason: e.to_string(),
            },
        };
        log_recovered!("refresh_context", resolution_err, path = %path.display());

        let project = match previous.as_ref() {
            Some(current) => self.platform.project_context(current).map_err(|e| {
                EngineError::ProjectContextUnresolved {
                    reason: e.to_string(),
                }
            }),
            None => Err(EngineError::ProjectContextUnresolved {
                reason: "no current context".to_string(),
            }),
        };

        match project {
            Ok(project) => {
                self.host.show_message(
                    MessageLevel::Warning,
                    DIALOG_TITLE,
                    &format!(
                        "The pipeline context could not be determined from {}. \
                         Menus will be reset to the project context.",
                        path.display()
                    ),
                );
                self.enter_context(previous.as_ref(), Some(&project))
            }
            Err(err) => {
                log_recovered!("refresh_context", err);
                self.host.show_message(
                    MessageLevel::Error,
                    DIALOG_TITLE,
                    &format!(
                        "The pipeline context could not be determined from {}. \
                         The menu is disabled until a known project is loaded.",
                        path.display()
                    ),
                );
                self.build_ui(true);
                Ok(())
            }
        }
    }

    // ===== Host events =====

    /// Route a host notification
    ///
    /// # Errors
    ///
    /// Returns the error of the routed operation, and `InvalidTransition`
    /// for project events unless running. Context resolution failures are
    /// recovered and do not surface here.
    pub fn handle_host_event(&mut self, event: HostEvent) -> Result<()> {
        tracing::debug!(?event, "host event");
        match event {
            HostEvent::ProjectOpened { path } => {
                self.expect_state("refresh_context", EngineState::Running)?;
                self.refresh_context_from_path(&path)
            }
            HostEvent::NewProjectCreated { path } => {
                self.expect_state("refresh_context", EngineState::Running)?;
                if self.settings.change_context_on_new_project && !path.as_os_str().is_empty() {
                    self.refresh_context_from_path(&path)
                } else {
                    let current = self.context.clone();
                    self.enter_context(current.as_ref(), current.as_ref())
                }
            }
            HostEvent::Quit => {
                self.host_quit();
                Ok(())
            }
            HostEvent::DisplayMenu { position } => self.menu.show(self.host.as_mut(), position),
            HostEvent::ActionTriggered(action) => self.trigger_action(action),
            HostEvent::WindowClosed(window) => {
                if !self.windows.notify_closed(window) {
                    tracing::debug!(window = %window, "close notification for untracked window");
                }
                Ok(())
            }
        }
    }

    /// Run whatever a menu or toolbar action is bound to
    ///
    /// # Errors
    ///
    /// Returns `CommandNotFound` for unknown actions and `CommandFailed` when
    /// the callback errors or panics.
    pub fn trigger_action(&mut self, action: ActionHandle) -> Result<()> {
        if let Some(name) = self.menu.command_for(action).map(str::to_string) {
            return self.run_command(&name);
        }

        match self.toolbar.binding_for(action) {
            Some(ToolbarBinding::Command(name)) => self.run_command(&name),
            Some(ToolbarBinding::Tool { id, callback }) => {
                self.run_isolated(&id, callback.as_ref())
            }
            Some(ToolbarBinding::Divider) | None => Err(EngineError::CommandNotFound {
                name: action.to_string(),
            }),
        }
    }

    /// Run a registered command by name
    ///
    /// # Errors
    ///
    /// Returns `CommandNotFound` or `CommandFailed`.
    pub fn run_command(&mut self, name: &str) -> Result<()> {
        let callback = self.registry.lookup(name)?.callback();
        self.run_isolated(name, callback.as_ref())
    }

    fn run_isolated(&self, name: &str, callback: &dyn Fn() -> anyhow::Result<()>) -> Result<()> {
        log_op_start!("run_command", command = name);
        let start = Instant::now();
        let result = invoke_isolated(name, callback);
        match &result {
            Ok(()) => log_op_end!("run_command", duration_ms = elapsed_ms(start)),
            Err(err) => log_op_error!(
                "run_command",
                err,
                duration_ms = elapsed_ms(start),
                command = name
            ),
        }
        result
    }

    // ===== Windows =====

    /// Open a dialog or panel tracked for shutdown
    ///
    /// # Errors
    ///
    /// Returns `HostRefused` if the host cannot create the window.
    pub fn open_window(&mut self, spec: &WindowSpec) -> Result<WindowHandle> {
        self.windows.open(self.host.as_mut(), spec)
    }

    // ===== Main thread =====

    /// Execute queued main-thread tasks
    ///
    /// Returns the number of tasks handled.
    pub fn pump(&mut self) -> usize {
        let tasks = self.dispatcher.drain();
        let count = tasks.len();
        for task in tasks {
            match task {
                MainThreadTask::Console { level, line } => self.host.console(level, &line),
                MainThreadTask::Message { level, title, text } => {
                    self.host.show_message(level, &title, &text)
                }
                MainThreadTask::ReloadApps => {
                    if let Err(err) = self.reload_apps() {
                        log_recovered!("reload_apps", err);
                    }
                }
            }
        }
        count
    }

    /// Rebuild the registry from the apps and refresh the UI
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless running.
    pub fn reload_apps(&mut self) -> Result<()> {
        self.expect_state("reload_apps", EngineState::Running)?;

        log_op_start!("reload_apps", session_id = %self.session);
        let start = Instant::now();
        self.registry = self.build_registry();
        self.build_ui(false);
        log_op_end!(
            "reload_apps",
            duration_ms = elapsed_ms(start),
            commands = self.registry.len()
        );
        Ok(())
    }

    // ===== Teardown =====

    /// Tear down windows, menu and toolbar, in that order
    ///
    /// Calling it again is a no-op.
    pub fn destroy(&mut self) {
        if matches!(self.state, EngineState::ShuttingDown | EngineState::Destroyed) {
            return;
        }

        log_op_start!("destroy", session_id = %self.session);
        let start = Instant::now();
        self.state = EngineState::ShuttingDown;

        let failures = self.windows.close_all(self.host.as_mut());
        self.menu.cleanup(self.host.as_mut());
        self.toolbar.cleanup(self.host.as_mut());
        self.slot.clear(&self.session);

        self.state = EngineState::Destroyed;
        log_op_end!(
            "destroy",
            duration_ms = elapsed_ms(start),
            window_close_failures = failures.len()
        );
    }

    /// The host is quitting; tear down exactly once
    pub fn host_quit(&mut self) {
        if self.shutting_down {
            return;
        }
        self.shutting_down = true;
        self.destroy();
    }
}
