//! Watch-channel backed state store.

use tokio::sync::watch;

use super::action::{reduce, Action};
use super::WidgetState;

/// Holds the current [`WidgetState`] and notifies subscribers on change.
///
/// Subscribers are only woken when an action actually changed the state.
#[derive(Debug)]
pub struct StateStore {
    sender: watch::Sender<WidgetState>,
}

impl StateStore {
    pub fn new(initial: WidgetState) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Apply an action. Returns `true` if the state changed.
    pub(crate) fn dispatch(&self, action: Action) -> bool {
        self.sender.send_if_modified(|state| reduce(state, action))
    }

    /// Read the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&WidgetState) -> R) -> R {
        f(&self.sender.borrow())
    }

    pub fn snapshot(&self) -> WidgetState {
        self.sender.borrow().clone()
    }

    /// Create a receiver that observes every future change.
    pub fn subscribe(&self) -> watch::Receiver<WidgetState> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chatdock_types::widget::OnlineStatus;

    use super::*;

    fn store() -> StateStore {
        StateStore::new(WidgetState::initial(Duration::from_secs(20)))
    }

    #[test]
    fn dispatch_without_subscribers_still_updates() {
        let store = store();
        assert!(store.dispatch(Action::SetVisibility(true)));
        assert!(store.read(|s| s.visible));
    }

    #[test]
    fn unchanged_state_reports_false() {
        let store = store();
        assert!(!store.dispatch(Action::SetVisibility(false)));
    }

    #[tokio::test]
    async fn subscribers_see_changes_only() {
        let store = store();
        let mut rx = store.subscribe();

        store.dispatch(Action::OnlineCheckCompleted(OnlineStatus::Unknown));
        assert!(!rx.has_changed().unwrap());

        store.dispatch(Action::OnlineCheckCompleted(OnlineStatus::Reachable));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().online_status, OnlineStatus::Reachable);
    }
}
