//! Persisted chat session commands: show, set, clear.
//!
//! These act on the same `session.json` that `chatdock run` resumes from, so
//! a chat id set here is picked up by the next run.

use anyhow::{Context, Result};
use console::style;

use chatdock_core::session::SESSION_CHAT_ID_KEY;
use chatdock_core::session::SessionStorage;
use chatdock_types::chat::ChatId;

use crate::state::AppState;

pub fn show_session(state: &AppState, json: bool) -> Result<()> {
    let sessions = state.file_sessions();
    // Read through the raw storage so a corrupt file is reported, not hidden.
    let raw = sessions
        .storage()
        .get(SESSION_CHAT_ID_KEY)
        .with_context(|| format!("failed to read {}", sessions.storage().path().display()))?;
    let chat_id = raw.and_then(ChatId::new);

    if json {
        let out = serde_json::json!({
            "chat_id": chat_id.as_ref().map(ChatId::as_str),
            "path": sessions.storage().path().display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    match chat_id {
        Some(id) => println!(
            "  {} Persisted chat: {}",
            style("✓").green(),
            style(id).cyan()
        ),
        None => println!(
            "  {} No persisted chat session",
            style("i").blue().bold()
        ),
    }
    Ok(())
}

pub fn set_session(state: &AppState, chat_id: &str, json: bool) -> Result<()> {
    let chat_id = ChatId::new(chat_id).context("chat id must not be blank")?;
    state
        .file_sessions()
        .write_chat_id(&chat_id)
        .context("failed to persist chat id")?;

    if json {
        println!("{}", serde_json::json!({ "chat_id": chat_id.as_str() }));
    } else {
        println!(
            "  {} Persisted chat {}",
            style("✓").green(),
            style(&chat_id).cyan()
        );
    }
    Ok(())
}

pub fn clear_session(state: &AppState, json: bool) -> Result<()> {
    state
        .file_sessions()
        .clear_chat_id()
        .context("failed to clear chat id")?;

    if json {
        println!("{}", serde_json::json!({ "chat_id": null }));
    } else {
        println!("  {} Chat session cleared", style("✓").green());
    }
    Ok(())
}
