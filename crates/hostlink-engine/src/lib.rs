//! hostlink engine - lifecycle and UI registry
//!
//! Owns the live host UI state of one integration session:
//! - Engine lifecycle state machine (`pre_init`, `app_init`, context changes,
//!   `destroy`)
//! - Menu and toolbar projection of the command registry
//! - Window tracking and teardown
//! - Main-thread dispatch of log lines and deferred requests
//! - The explicit current-engine slot
//!
//! ## Logging Ownership
//!
//! The lifecycle owns start/end/error logging of its operations. Builders
//! log only the warnings they recover from.

pub mod builtin;
pub mod dispatch;
pub mod events;
pub mod lifecycle;
pub mod menu;
pub mod slot;
pub mod toolbar;
pub mod windows;

pub use dispatch::{MainThreadDispatcher, MainThreadSender, MainThreadTask};
pub use events::HostEvent;
pub use lifecycle::{Engine, EngineBuilder, EngineState};
pub use menu::{MenuBuilder, MenuFilter};
pub use slot::EngineSlot;
pub use toolbar::ToolbarBuilder;
pub use windows::WindowManager;
