//! Widget backend port.
//!
//! The orchestrator triggers backend work but never inspects transport
//! details. [`WidgetBackend`] is the collaborator interface (the HTTP
//! implementation lives in chatdock-infra); [`Effect`] names one triggered
//! call and [`perform`] runs it, folding the outcome into an [`Action`].

use std::fmt;
use std::future::Future;

use chatdock_types::chat::{ChatId, ChatInfo, Message};
use chatdock_types::error::BackendError;
use chatdock_types::widget::{EmergencyNotice, WidgetConfig};

use crate::poller::check_outcome;
use crate::state::{Action, FetchKind};

/// External collaborators the orchestrator triggers.
///
/// Uses native async fn in traits; every future must be `Send` so effects
/// can run on spawned tasks.
pub trait WidgetBackend: Send + Sync + 'static {
    /// Lightweight reachability check. `Ok(false)` means the backend answered
    /// but reports itself offline.
    fn check_online_status(&self) -> impl Future<Output = Result<bool, BackendError>> + Send;

    fn fetch_chat(
        &self,
        chat_id: &ChatId,
    ) -> impl Future<Output = Result<ChatInfo, BackendError>> + Send;

    fn fetch_messages(
        &self,
        chat_id: &ChatId,
    ) -> impl Future<Output = Result<Vec<Message>, BackendError>> + Send;

    fn fetch_emergency_notice(
        &self,
    ) -> impl Future<Output = Result<EmergencyNotice, BackendError>> + Send;

    fn fetch_widget_config(&self) -> impl Future<Output = Result<WidgetConfig, BackendError>> + Send;

    /// Renew the user's authentication session.
    fn extend_session(&self) -> impl Future<Output = Result<(), BackendError>> + Send;
}

/// A fire-and-forget backend call requested by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Effect {
    CheckOnlineStatus,
    FetchChat(ChatId),
    FetchMessages(ChatId),
    FetchEmergencyNotice,
    FetchWidgetConfig,
    ExtendSession,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::CheckOnlineStatus => write!(f, "check_online_status"),
            Effect::FetchChat(id) => write!(f, "fetch_chat({id})"),
            Effect::FetchMessages(id) => write!(f, "fetch_messages({id})"),
            Effect::FetchEmergencyNotice => write!(f, "fetch_emergency_notice"),
            Effect::FetchWidgetConfig => write!(f, "fetch_widget_config"),
            Effect::ExtendSession => write!(f, "extend_session"),
        }
    }
}

/// Run `effect` against `backend` and describe the outcome as an action.
///
/// Failures are logged here and reported as [`Action::FetchFailed`] (or an
/// unreachable status for reachability checks); they are never retried.
pub async fn perform<B: WidgetBackend>(backend: &B, effect: Effect) -> Action {
    tracing::debug!(%effect, "performing effect");

    match effect {
        Effect::CheckOnlineStatus => {
            let result = backend.check_online_status().await;
            if let Err(e) = &result {
                tracing::warn!(error = %e, "reachability check failed");
            }
            Action::OnlineCheckCompleted(check_outcome(&result))
        }
        Effect::FetchChat(chat_id) => match backend.fetch_chat(&chat_id).await {
            Ok(info) => Action::ChatLoaded(info),
            Err(e) => failed(FetchKind::Chat, &e),
        },
        Effect::FetchMessages(chat_id) => match backend.fetch_messages(&chat_id).await {
            Ok(messages) => Action::MessagesLoaded { chat_id, messages },
            Err(e) => failed(FetchKind::Messages, &e),
        },
        Effect::FetchEmergencyNotice => match backend.fetch_emergency_notice().await {
            Ok(notice) => Action::EmergencyNoticeLoaded(notice),
            Err(e) => failed(FetchKind::EmergencyNotice, &e),
        },
        Effect::FetchWidgetConfig => match backend.fetch_widget_config().await {
            Ok(config) => Action::WidgetConfigLoaded(config),
            Err(e) => failed(FetchKind::WidgetConfig, &e),
        },
        Effect::ExtendSession => match backend.extend_session().await {
            Ok(()) => Action::SessionExtended,
            Err(e) => failed(FetchKind::SessionExtension, &e),
        },
    }
}

fn failed(kind: FetchKind, error: &BackendError) -> Action {
    tracing::warn!(%kind, error = %error, "backend request failed");
    Action::FetchFailed(kind)
}


#[cfg(test)]
mod tests {
    use chatdock_types::widget::OnlineStatus;

    use super::testing::FakeBackend;
    use super::*;

    #[tokio::test]
    async fn reachability_failure_maps_to_unreachable() {
        let backend = FakeBackend::default();
        *backend.online.lock().unwrap() = Err(());
        let action = perform(&backend, Effect::CheckOnlineStatus).await;
        assert_eq!(action, Action::OnlineCheckCompleted(OnlineStatus::Unreachable));
    }

    #[tokio::test]
    async fn messages_are_tagged_with_their_chat() {
        let backend = FakeBackend::default();
        let chat_id = ChatId::new("abc123").unwrap();
        match perform(&backend, Effect::FetchMessages(chat_id.clone())).await {
            Action::MessagesLoaded { chat_id: id, messages } => {
                assert_eq!(id, chat_id);
                assert_eq!(messages.len(), 2);
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_failure_reports_kind() {
        let backend = FakeBackend::default();
        *backend.fail_config.lock().unwrap() = true;
        let action = perform(&backend, Effect::FetchWidgetConfig).await;
        assert_eq!(action, Action::FetchFailed(FetchKind::WidgetConfig));
        assert_eq!(backend.calls(), vec![Effect::FetchWidgetConfig]);
    }
}
