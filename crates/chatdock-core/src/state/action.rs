//! Typed state updates and the reducer that applies them.

use std::fmt;
use std::time::Duration;

use chatdock_types::chat::{ChatId, ChatInfo, ChatStatus, Message};
use chatdock_types::widget::{EmergencyNotice, Loadable, OnlineStatus, WidgetConfig};

use super::WidgetState;

/// Which backend request a failure report refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    Chat,
    Messages,
    EmergencyNotice,
    WidgetConfig,
    SessionExtension,
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchKind::Chat => write!(f, "chat"),
            FetchKind::Messages => write!(f, "messages"),
            FetchKind::EmergencyNotice => write!(f, "emergency_notice"),
            FetchKind::WidgetConfig => write!(f, "widget_config"),
            FetchKind::SessionExtension => write!(f, "session_extension"),
        }
    }
}

/// Every way the widget state may change.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetVisibility(bool),
    /// Result of a reachability check. Only produced by the effect runner.
    OnlineCheckCompleted(OnlineStatus),
    SetPollingInterval(Duration),
    /// A chat was started, resumed, or ended (`None`).
    SetChatId(Option<ChatId>),
    SetChatStatus(ChatStatus),
    ChatLoaded(ChatInfo),
    MessagesLoaded {
        chat_id: ChatId,
        messages: Vec<Message>,
    },
    /// New messages delivered by the chat domain.
    MessagesAppended(Vec<Message>),
    EmergencyNoticeLoaded(EmergencyNotice),
    WidgetConfigLoaded(WidgetConfig),
    /// A triggered request failed; state is left untouched.
    FetchFailed(FetchKind),
    SessionExtended,
}

/// The subset of [`Action`] that code outside the orchestrator may send.
///
/// Visibility, reachability and the polling interval are derived by the
/// orchestrator itself and cannot be injected.
#[derive(Debug, Clone, PartialEq)]
pub enum CollaboratorAction {
    /// A chat was started, resumed, or ended (`None`).
    SetChatId(Option<ChatId>),
    SetChatStatus(ChatStatus),
    /// New messages delivered by the chat domain.
    MessagesAppended(Vec<Message>),
}

impl From<CollaboratorAction> for Action {
    fn from(action: CollaboratorAction) -> Self {
        match action {
            CollaboratorAction::SetChatId(chat_id) => Action::SetChatId(chat_id),
            CollaboratorAction::SetChatStatus(status) => Action::SetChatStatus(status),
            CollaboratorAction::MessagesAppended(messages) => Action::MessagesAppended(messages),
        }
    }
}

/// Apply `action` to `state`. Returns whether anything changed.
///
/// Loaded-ness only moves forward: no action turns a loaded notice or
/// configuration back into `Unloaded`.
pub fn reduce(state: &mut WidgetState, action: Action) -> bool {
    match action {
        Action::SetVisibility(visible) => replace(&mut state.visible, visible),
        Action::OnlineCheckCompleted(status) => replace(&mut state.online_status, status),
        Action::SetPollingInterval(interval) => replace(&mut state.polling_interval, interval),
        Action::SetChatId(chat_id) => {
            if state.chat.chat_id == chat_id {
                return false;
            }
            state.chat.chat_id = chat_id;
            // Messages belong to the previous chat.
            if !state.messages.is_empty() {
                state.messages.clear();
                state.messages_revision += 1;
            }
            true
        }
        Action::SetChatStatus(status) => replace(&mut state.chat.status, status),
        Action::ChatLoaded(info) => replace(&mut state.chat.status, info.status),
        Action::MessagesLoaded { chat_id, messages } => {
            if state.chat.chat_id.as_ref() != Some(&chat_id) {
                tracing::debug!(%chat_id, "applying messages for a chat that is no longer current");
            }
            if state.messages == messages {
                return false;
            }
            state.messages = messages;
            state.messages_revision += 1;
            true
        }
        Action::MessagesAppended(messages) => {
            let before = state.messages.len();
            for message in messages {
                if !state.messages.iter().any(|m| m.id == message.id) {
                    state.messages.push(message);
                }
            }
            if state.messages.len() == before {
                return false;
            }
            state.messages_revision += 1;
            true
        }
        Action::EmergencyNoticeLoaded(notice) => {
            replace(&mut state.emergency_notice, Loadable::Loaded(notice))
        }
        Action::WidgetConfigLoaded(config) => {
            replace(&mut state.widget_config, Loadable::Loaded(config))
        }
        Action::FetchFailed(_) | Action::SessionExtended => false,
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}
