//! Session-extension scheduling.
//!
//! While the widget is visible and a chat is open, the user's authentication
//! session is renewed periodically. Every change to the message list
//! restarts the countdown; losing any activating condition stops it.

use crate::state::WidgetState;

/// What to do with the extension timer after a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerChange {
    /// Start (or restart) the countdown from zero.
    Arm,
    Disarm,
    Keep,
}

#[derive(Debug, Default)]
pub struct SessionExtensionScheduler {
    armed: bool,
    armed_at_revision: u64,
}

impl SessionExtensionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visible, chat open, and a chat id present.
    pub fn is_active(state: &WidgetState) -> bool {
        state.visible && state.chat.is_open() && state.chat.chat_id.is_some()
    }

    pub fn reconcile(&mut self, state: &WidgetState) -> TimerChange {
        if !Self::is_active(state) {
            if self.armed {
                self.armed = false;
                return TimerChange::Disarm;
            }
            return TimerChange::Keep;
        }

        if self.armed && self.armed_at_revision == state.messages_revision {
            return TimerChange::Keep;
        }

        self.armed = true;
        self.armed_at_revision = state.messages_revision;
        TimerChange::Arm
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}
