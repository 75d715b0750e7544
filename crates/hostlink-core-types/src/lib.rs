//! Core types shared across the hostlink crates
//!
//! This crate provides foundational types used by the engine and its
//! collaborators:
//!
//! - **Handles**: opaque identifiers issued by the host for menus, toolbars,
//!   actions and windows
//! - **Session identity**: SessionId for the current engine session
//! - **Schema constants**: Canonical field keys and event names for logging

pub mod handles;
pub mod schema;
pub mod session;

pub use handles::{ActionHandle, MenuHandle, ToolbarHandle, WindowHandle};
pub use session::SessionId;
