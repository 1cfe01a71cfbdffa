//! Synchronous orchestration state machine.
//!
//! [`WidgetMachine`] owns the state store and every rule. It performs no
//! I/O besides the (synchronous) session storage: inputs are actions and
//! timer ticks, outputs are [`Command`]s the runtime executes.

use std::time::Duration;

use chatdock_types::chat::ChatId;
use chatdock_types::config::{Timing, WidgetSettings};
use chatdock_types::error::ConfigError;

use crate::backend::Effect;
use crate::clock::Clock;
use crate::extension::{SessionExtensionScheduler, TimerChange};
use crate::loaders::DataLoaders;
use crate::poller::OnlineStatusPoller;
use crate::resume::resume_session;
use crate::session::{SessionStorage, SessionStore};
use crate::state::{Action, CollaboratorAction, StateStore, WidgetState};
use crate::visibility::VisibilityController;

use super::timer::TimerKind;

/// Instruction for the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Spawn a backend call; its outcome comes back as an action.
    Perform(Effect),
    /// Start or restart a recurring timer.
    Arm { timer: TimerKind, period: Duration },
    /// Cancel a recurring timer.
    Disarm(TimerKind),
}

pub struct WidgetMachine<S, C> {
    timing: Timing,
    sessions: SessionStore<S>,
    clock: C,
    store: StateStore,
    visibility: VisibilityController,
    poller: OnlineStatusPoller,
    loaders: DataLoaders,
    extension: SessionExtensionScheduler,
    /// Chat id last written to (or read from) the session store.
    persisted_chat_id: Option<ChatId>,
}

impl<S: SessionStorage, C: Clock> WidgetMachine<S, C> {
    /// Fails if `settings` does not validate; every timer period must be
    /// nonzero.
    pub fn new(settings: &WidgetSettings, storage: S, clock: C) -> Result<Self, ConfigError> {
        settings.validate()?;
        let timing = settings.timing;
        Ok(Self {
            timing,
            sessions: SessionStore::new(storage),
            clock,
            store: StateStore::new(WidgetState::initial(timing.idle_interval())),
            visibility: VisibilityController::new(settings.office_hours.clone()),
            poller: OnlineStatusPoller::new(timing),
            loaders: DataLoaders::new(),
            extension: SessionExtensionScheduler::new(),
            persisted_chat_id: None,
        })
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn sessions(&self) -> &SessionStore<S> {
        &self.sessions
    }

    /// Startup sequence: visibility, timers, session resumption, then the
    /// first round of rules.
    pub fn start(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();

        let visible = self.visibility.evaluate(&self.sessions, &self.clock);
        self.store.dispatch(Action::SetVisibility(visible));
        commands.push(Command::Arm {
            timer: TimerKind::OfficeHours,
            period: self.timing.office_hours_interval(),
        });
        commands.push(Command::Arm {
            timer: TimerKind::OnlinePoll,
            period: self.store.read(|s| s.polling_interval),
        });

        if let Some(action) = resume_session(&self.sessions) {
            if let Action::SetChatId(chat_id) = &action {
                self.persisted_chat_id = chat_id.clone();
            }
            self.store.dispatch(action);
        }

        tracing::info!(visible, "widget orchestrator started");
        self.react(&mut commands);
        commands
    }

    /// Apply a chat-domain update.
    pub fn collaborator(&mut self, action: CollaboratorAction) -> Vec<Command> {
        self.dispatch(action.into())
    }

    /// Apply an action from a collaborator or a completed effect.
    pub(crate) fn dispatch(&mut self, action: Action) -> Vec<Command> {
        match &action {
            Action::OnlineCheckCompleted(status) => {
                self.poller.finish_check();
                tracing::debug!(%status, "reachability check completed");
            }
            Action::FetchFailed(kind) => self.loaders.fetch_failed(*kind),
            Action::SessionExtended => tracing::debug!("session extended"),
            _ => {}
        }

        let mut commands = Vec::new();
        if self.store.dispatch(action) {
            self.react(&mut commands);
        }
        commands
    }

    pub fn timer_fired(&mut self, timer: TimerKind) -> Vec<Command> {
        let mut commands = Vec::new();
        match timer {
            TimerKind::OnlinePoll => {
                if self.poller.begin_check() {
                    commands.push(Command::Perform(Effect::CheckOnlineStatus));
                } else {
                    tracing::trace!("reachability check still in flight, skipping tick");
                }
            }
            TimerKind::OfficeHours => {
                let visible = self.visibility.evaluate(&self.sessions, &self.clock);
                if self.store.dispatch(Action::SetVisibility(visible)) {
                    tracing::info!(visible, "widget visibility changed");
                    self.react(&mut commands);
                }
            }
            TimerKind::SessionExtension => {
                if self.store.read(SessionExtensionScheduler::is_active) {
                    commands.push(Command::Perform(Effect::ExtendSession));
                } else {
                    commands.push(Command::Disarm(TimerKind::SessionExtension));
                }
            }
        }
        commands
    }

    /// Re-run every watcher after a state change.
    fn react(&mut self, commands: &mut Vec<Command>) {
        // Reachability polling.
        let (online, chat_status) = self.store.read(|s| (s.online_status, s.chat.status));
        let plan = self.poller.plan(online, chat_status);
        if self.store.dispatch(Action::SetPollingInterval(plan.interval)) {
            tracing::debug!(interval_ms = plan.interval.as_millis() as u64, "polling interval changed");
            commands.push(Command::Arm {
                timer: TimerKind::OnlinePoll,
                period: plan.interval,
            });
        }
        if plan.check_now && self.poller.begin_check() {
            commands.push(Command::Perform(Effect::CheckOnlineStatus));
        }

        // Data readiness.
        let loaders = &mut self.loaders;
        let effects = self.store.read(|s| loaders.evaluate(s));
        commands.extend(effects.into_iter().map(Command::Perform));

        // Session extension.
        let extension = &mut self.extension;
        match self.store.read(|s| extension.reconcile(s)) {
            TimerChange::Arm => commands.push(Command::Arm {
                timer: TimerKind::SessionExtension,
                period: self.timing.session_extension_interval(),
            }),
            TimerChange::Disarm => commands.push(Command::Disarm(TimerKind::SessionExtension)),
            TimerChange::Keep => {}
        }

        self.persist_chat_id();
    }

    /// Mirror collaborator-driven chat id changes into the session store.
    fn persist_chat_id(&mut self) {
        let current = self.store.read(|s| s.chat.chat_id.clone());
        if current == self.persisted_chat_id {
            return;
        }

        let result = match &current {
            Some(chat_id) => self.sessions.write_chat_id(chat_id),
            None => self.sessions.clear_chat_id(),
        };
        match result {
            Ok(()) => self.persisted_chat_id = current,
            Err(e) => tracing::warn!(error = %e, "failed to persist chat id"),
        }
    }
}
