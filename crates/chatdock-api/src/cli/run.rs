//! Long-running orchestrator command.
//!
//! Wires the core runtime to the HTTP backend and a session storage, then
//! reports surface, visibility, reachability, and chat transitions as they
//! happen until Ctrl+C.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use console::style;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use chatdock_core::clock::SystemClock;
use chatdock_core::orchestrator::{WidgetMachine, WidgetRuntime};
use chatdock_core::session::SessionStorage;
use chatdock_core::state::WidgetState;
use chatdock_infra::http::HttpWidgetBackend;
use chatdock_infra::session::{FileSessionStorage, MemorySessionStorage};

use crate::state::AppState;

pub async fn run(state: &AppState, memory_session: bool, json: bool) -> Result<()> {
    if memory_session {
        run_with(state, MemorySessionStorage::new(), json).await
    } else {
        run_with(state, FileSessionStorage::in_data_dir(&state.data_dir), json).await
    }
}

async fn run_with<S: SessionStorage + 'static>(state: &AppState, storage: S, json: bool) -> Result<()> {
    let backend = HttpWidgetBackend::new(&state.settings).context("failed to build HTTP backend")?;
    let machine = WidgetMachine::new(&state.settings, storage, SystemClock)
        .context("invalid widget settings")?;
    let runtime = WidgetRuntime::new(machine, Arc::new(backend));
    let mut updates = runtime.subscribe();

    let shutdown = CancellationToken::new();
    let task = tokio::spawn(runtime.run(shutdown.clone()));

    if !json {
        println!(
            "  {} chatdock orchestrating {}",
            style("⚡").bold(),
            style(&state.settings.api_url).cyan()
        );
        println!("  {}", style("Press Ctrl+C to stop").dim());
        println!();
    }

    follow_changes(&mut updates, crate::shutdown_signal(), |change| report(change, json)).await?;

    shutdown.cancel();
    let final_state = task.await.context("orchestrator task failed")?;
    if json {
        println!("{}", serde_json::to_string(&final_state)?);
    } else {
        println!("\n  Orchestrator stopped ({}).", final_state.surface());
    }
    Ok(())
}

/// Feed every transition to `on_change` until `stop` completes or the
/// runtime drops its state sender.
async fn follow_changes(
    updates: &mut watch::Receiver<WidgetState>,
    stop: impl Future<Output = ()>,
    mut on_change: impl FnMut(&Change) -> Result<()>,
) -> Result<()> {
    tokio::pin!(stop);
    let mut previous: Option<WidgetState> = None;
    loop {
        let current = updates.borrow_and_update().clone();
        for change in describe_changes(previous.as_ref(), &current) {
            on_change(&change)?;
        }
        previous = Some(current);

        tokio::select! {
            _ = &mut stop => return Ok(()),
            changed = updates.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
            }
        }
    }
}

/// A user-visible transition between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub field: &'static str,
    pub value: String,
}

fn change(field: &'static str, value: impl ToString) -> Change {
    Change {
        field,
        value: value.to_string(),
    }
}

/// Fields that differ between `previous` and `current`; every field when
/// there is no previous snapshot.
pub fn describe_changes(previous: Option<&WidgetState>, current: &WidgetState) -> Vec<Change> {
    let mut changes = Vec::new();
    let differs = |f: fn(&WidgetState) -> String| previous.is_none_or(|p| f(p) != f(current));

    if differs(|s| s.surface().to_string()) {
        changes.push(change("surface", current.surface()));
    }
    if differs(|s| s.visible.to_string()) {
        changes.push(change("visible", current.visible));
    }
    if differs(|s| s.online_status.to_string()) {
        changes.push(change("online", current.online_status));
    }
    if differs(|s| format!("{:?}", s.polling_interval)) {
        changes.push(change("poll_interval", format!("{:?}", current.polling_interval)));
    }
    if differs(|s| format!("{:?}", s.chat)) {
        let chat = match &current.chat.chat_id {
            Some(id) => format!("{id} ({})", current.chat.status),
            None => "none".to_string(),
        };
        changes.push(change("chat", chat));
    }
    if differs(|s| s.messages.len().to_string()) {
        changes.push(change("messages", current.messages.len()));
    }
    changes
}

fn report(change: &Change, json: bool) -> Result<()> {
    if json {
        let line = serde_json::json!({ "field": change.field, "value": change.value });
        println!("{}", serde_json::to_string(&line)?);
    } else {
        println!(
            "  {} {:<14} {}",
            style("→").dim(),
            change.field,
            style(&change.value).bold()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chatdock_types::chat::{ChatId, ChatStatus};
    use chatdock_types::widget::OnlineStatus;

    use tokio::sync::oneshot;

    use super::*;

    fn initial() -> WidgetState {
        WidgetState::initial(Duration::from_secs(20))
    }

    #[test]
    fn test_first_snapshot_reports_everything() {
        let fields: Vec<_> = describe_changes(None, &initial())
            .into_iter()
            .map(|c| c.field)
            .collect();
        assert_eq!(
            fields,
            vec!["surface", "visible", "online", "poll_interval", "chat", "messages"]
        );
    }

    #[test]
    fn test_unchanged_snapshot_reports_nothing() {
        let state = initial();
        assert!(describe_changes(Some(&state), &state.clone()).is_empty());
    }

    #[test]
    fn test_reports_only_changed_fields() {
        let before = initial();
        let mut after = before.clone();
        after.online_status = OnlineStatus::Reachable;
        after.chat.chat_id = ChatId::new("abc123");
        after.chat.status = ChatStatus::Open;

        assert_eq!(
            describe_changes(Some(&before), &after),
            vec![
                change("online", "reachable"),
                change("chat", "abc123 (open)"),
            ]
        );
    }

    #[tokio::test]
    async fn test_follow_changes_stops_once_signalled() {
        let (tx, mut rx) = watch::channel(initial());
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let stop = async move {
            let _ = stop_rx.await;
        };

        let follower = tokio::spawn(async move {
            let mut seen = Vec::new();
            let result = follow_changes(&mut rx, stop, |change| {
                seen.push(change.clone());
                Ok(())
            })
            .await;
            result.map(|()| seen)
        });

        // Many wakeups before the stop signal must not lose it.
        for n in 0..20u64 {
            tx.send_modify(|s| s.polling_interval = Duration::from_millis(100 + n));
            tokio::task::yield_now().await;
        }
        stop_tx.send(()).unwrap();

        let seen = follower.await.unwrap().unwrap();
        assert!(seen.iter().any(|c| c.field == "poll_interval"));
    }

    #[tokio::test]
    async fn test_follow_changes_ends_when_runtime_drops_state() {
        let (tx, mut rx) = watch::channel(initial());
        drop(tx);
        let result = follow_changes(&mut rx, std::future::pending(), |_| Ok(())).await;
        assert!(result.is_ok());
    }
}
