//! Session resumption at startup.

use crate::session::{SessionStorage, SessionStore};
use crate::state::Action;

/// Build the action that restores a persisted chat id into memory.
///
/// Returns `None` when nothing is persisted (or storage is unreadable). This
/// is the only path from persisted storage into the in-memory chat id.
pub fn resume_session<S: SessionStorage>(sessions: &SessionStore<S>) -> Option<Action> {
    let chat_id = sessions.read_chat_id()?;
    tracing::info!(%chat_id, "resuming persisted chat session");
    Some(Action::SetChatId(Some(chat_id)))
}
