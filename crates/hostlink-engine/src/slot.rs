//! Current-engine slot
//!
//! Process-wide record of which engine session is live. The slot is created
//! by whoever embeds the integration and handed to every engine it builds;
//! only the engine lifecycle writes to it.

use std::cell::RefCell;
use std::rc::Rc;

use hostlink_core_types::SessionId;

#[derive(Debug, Default)]
struct SlotState {
    current: Option<SessionId>,
    compat_dialog_shown: bool,
}

/// Shared handle to the current-engine record
#[derive(Debug, Clone, Default)]
pub struct EngineSlot {
    inner: Rc<RefCell<SlotState>>,
}

impl EngineSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session of the engine that is currently live
    pub fn current(&self) -> Option<SessionId> {
        self.inner.borrow().current.clone()
    }

    pub fn is_current(&self, session: &SessionId) -> bool {
        self.inner.borrow().current.as_ref() == Some(session)
    }

    pub fn is_occupied(&self) -> bool {
        self.inner.borrow().current.is_some()
    }

    pub(crate) fn set(&self, session: SessionId) {
        self.inner.borrow_mut().current = Some(session);
    }

    /// Clear the slot if `session` still owns it
    pub(crate) fn clear(&self, session: &SessionId) {
        let mut state = self.inner.borrow_mut();
        if state.current.as_ref() == Some(session) {
            state.current = None;
        }
    }

    /// Record that the untested-version dialog was shown
    ///
    /// Returns `true` only for the first call in the process.
    pub(crate) fn mark_compat_dialog_shown(&self) -> bool {
        let mut state = self.inner.borrow_mut();
        !std::mem::replace(&mut state.compat_dialog_shown, true)
    }

    pub fn compat_dialog_shown(&self) -> bool {
        self.inner.borrow().compat_dialog_shown
    }
}
