//! Central widget state container.
//!
//! All orchestrator state lives in one [`WidgetState`] value mutated only by
//! typed [`Action`]s through [`reduce`]. [`StateStore`] wraps it in a
//! `tokio::sync::watch` channel so renderers can subscribe to changes.

pub mod action;
pub mod store;

use std::time::Duration;

use serde::Serialize;

use chatdock_types::chat::{ChatSession, Message};
use chatdock_types::widget::{EmergencyNotice, Loadable, OnlineStatus, WidgetConfig, WidgetSurface};

pub use action::{reduce, Action, CollaboratorAction, FetchKind};
pub use store::StateStore;

/// Snapshot of everything the orchestrator knows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetState {
    /// Derived: persisted session present OR inside office hours.
    pub visible: bool,
    pub online_status: OnlineStatus,
    /// Current reachability poll period.
    pub polling_interval: Duration,
    pub chat: ChatSession,
    pub messages: Vec<Message>,
    /// Bumped on every change to `messages`.
    pub messages_revision: u64,
    pub emergency_notice: Loadable<EmergencyNotice>,
    pub widget_config: Loadable<WidgetConfig>,
}

impl WidgetState {
    /// Fresh per-process state: hidden, reachability unknown, nothing loaded.
    pub fn initial(polling_interval: Duration) -> Self {
        Self {
            visible: false,
            online_status: OnlineStatus::Unknown,
            polling_interval,
            chat: ChatSession::default(),
            messages: Vec::new(),
            messages_revision: 0,
            emergency_notice: Loadable::Unloaded,
            widget_config: Loadable::Unloaded,
        }
    }

    /// Which surface the renderer should show.
    ///
    /// Nothing is drawn until the widget is visible and its configuration
    /// has loaded; then an open chat wins over the profile screen.
    pub fn surface(&self) -> WidgetSurface {
        if !self.visible || !self.widget_config.is_loaded() {
            WidgetSurface::Hidden
        } else if self.chat.is_open() {
            WidgetSurface::Chat
        } else {
            WidgetSurface::Profile
        }
    }
}
