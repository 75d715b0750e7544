//! Host-issued handle types
//!
//! The host application hands out opaque numeric identifiers for every UI
//! element it creates on behalf of the engine. Each kind of element gets its
//! own newtype so a toolbar handle can never be passed where a window is
//! expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! host_handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw host identifier
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Get the raw host identifier
            pub const fn raw(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

host_handle!(
    /// Handle to a host menu or submenu
    MenuHandle,
    "menu"
);
host_handle!(
    /// Handle to a host toolbar
    ToolbarHandle,
    "toolbar"
);
host_handle!(
    /// Handle to a clickable action (menu item, toolbar button or divider)
    ActionHandle,
    "action"
);
host_handle!(
    /// Handle to a dialog or dock panel
    WindowHandle,
    "window"
);
