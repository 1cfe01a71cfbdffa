//! Data readiness loaders.
//!
//! Three independent "fetch if missing" rules evaluated after every state
//! transition. Each rule remembers what it already requested so a guard that
//! stays true does not fire again while its request is outstanding; a
//! reported failure re-opens the rule for the next transition.

use chatdock_types::chat::ChatId;

use crate::backend::Effect;
use crate::state::{FetchKind, WidgetState};

#[derive(Debug, Default)]
pub struct DataLoaders {
    /// Chat for which chat metadata and messages were requested.
    chat_requested: Option<ChatId>,
    notice_requested: bool,
    config_requested: bool,
}

impl DataLoaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate all rules against `state` and return the fetches to trigger.
    pub fn evaluate(&mut self, state: &WidgetState) -> Vec<Effect> {
        let mut effects = Vec::new();

        match &state.chat.chat_id {
            Some(chat_id) => {
                let already = self.chat_requested.as_ref() == Some(chat_id);
                if state.messages.is_empty() && !already {
                    tracing::debug!(%chat_id, "chat data missing, fetching chat and messages");
                    self.chat_requested = Some(chat_id.clone());
                    effects.push(Effect::FetchChat(chat_id.clone()));
                    effects.push(Effect::FetchMessages(chat_id.clone()));
                }
            }
            None => self.chat_requested = None,
        }

        if !state.emergency_notice.is_loaded() && !self.notice_requested {
            self.notice_requested = true;
            effects.push(Effect::FetchEmergencyNotice);
        }

        if !state.widget_config.is_loaded() && !self.config_requested {
            self.config_requested = true;
            effects.push(Effect::FetchWidgetConfig);
        }

        effects
    }

    /// Re-open the rule behind a failed request.
    pub fn fetch_failed(&mut self, kind: FetchKind) {
        match kind {
            FetchKind::Chat | FetchKind::Messages => self.chat_requested = None,
            FetchKind::EmergencyNotice => self.notice_requested = false,
            FetchKind::WidgetConfig => self.config_requested = false,
            FetchKind::SessionExtension => {}
        }
    }
}
