//! Async driver for [`WidgetMachine`].
//!
//! One task owns the machine and its three timers. Collaborator actions,
//! effect results, and timer ticks are all funnelled through that task, so
//! the state is only ever mutated from one place.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use chatdock_types::chat::{ChatId, ChatStatus, Message};

use crate::backend::{perform, WidgetBackend};
use crate::clock::Clock;
use crate::session::SessionStorage;
use crate::state::{Action, CollaboratorAction, WidgetState};

use super::machine::{Command, WidgetMachine};
use super::timer::{ScopedTimer, TimerKind};

enum Event {
    Action(Action),
    Tick(TimerKind),
    Shutdown,
}

pub struct WidgetRuntime<B, S, C> {
    machine: WidgetMachine<S, C>,
    backend: Arc<B>,
    actions_tx: mpsc::UnboundedSender<Action>,
    actions_rx: mpsc::UnboundedReceiver<Action>,
    poll_timer: ScopedTimer,
    office_hours_timer: ScopedTimer,
    extension_timer: ScopedTimer,
}

impl<B, S, C> WidgetRuntime<B, S, C>
where
    B: WidgetBackend,
    S: SessionStorage,
    C: Clock,
{
    pub fn new(machine: WidgetMachine<S, C>, backend: Arc<B>) -> Self {
        let (actions_tx, actions_rx) = mpsc::unbounded_channel();
        Self {
            machine,
            backend,
            actions_tx,
            actions_rx,
            poll_timer: ScopedTimer::new(TimerKind::OnlinePoll),
            office_hours_timer: ScopedTimer::new(TimerKind::OfficeHours),
            extension_timer: ScopedTimer::new(TimerKind::SessionExtension),
        }
    }

    /// Handle for collaborators (the chat domain, a renderer) to feed actions in.
    pub fn handle(&self) -> WidgetHandle {
        WidgetHandle {
            tx: self.actions_tx.clone(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<WidgetState> {
        self.machine.store().subscribe()
    }

    /// Run until `shutdown` is cancelled. Returns the final state.
    ///
    /// Timers are dropped on return, so nothing keeps ticking after shutdown.
    /// Effects still in flight finish on their own tasks; their results are
    /// discarded.
    pub async fn run(mut self, shutdown: CancellationToken) -> WidgetState {
        let commands = self.machine.start();
        self.execute(commands);

        loop {
            let event = tokio::select! {
                biased;
                _ = shutdown.cancelled() => Event::Shutdown,
                Some(action) = self.actions_rx.recv() => Event::Action(action),
                _ = self.poll_timer.tick() => Event::Tick(TimerKind::OnlinePoll),
                _ = self.office_hours_timer.tick() => Event::Tick(TimerKind::OfficeHours),
                _ = self.extension_timer.tick() => Event::Tick(TimerKind::SessionExtension),
            };

            let commands = match event {
                Event::Action(action) => self.machine.dispatch(action),
                Event::Tick(timer) => {
                    tracing::trace!(%timer, "timer fired");
                    self.machine.timer_fired(timer)
                }
                Event::Shutdown => break,
            };
            self.execute(commands);
        }

        tracing::info!("widget orchestrator stopped");
        self.machine.store().snapshot()
    }

    fn execute(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Perform(effect) => {
                    let backend = Arc::clone(&self.backend);
                    let tx = self.actions_tx.clone();
                    tokio::spawn(async move {
                        let action = perform(backend.as_ref(), effect).await;
                        // Receiver gone means the runtime already shut down.
                        let _ = tx.send(action);
                    });
                }
                Command::Arm { timer, period } => self.timer_mut(timer).arm(period),
                Command::Disarm(timer) => self.timer_mut(timer).disarm(),
            }
        }
    }

    fn timer_mut(&mut self, kind: TimerKind) -> &mut ScopedTimer {
        match kind {
            TimerKind::OnlinePoll => &mut self.poll_timer,
            TimerKind::OfficeHours => &mut self.office_hours_timer,
            TimerKind::SessionExtension => &mut self.extension_timer,
        }
    }
}

/// Cloneable sender of actions into a running [`WidgetRuntime`].
#[derive(Debug, Clone)]
pub struct WidgetHandle {
    tx: mpsc::UnboundedSender<Action>,
}

impl WidgetHandle {
    /// Queue a chat-domain update. Returns `false` if the runtime has stopped.
    pub fn dispatch(&self, action: CollaboratorAction) -> bool {
        self.tx.send(action.into()).is_ok()
    }

    /// A new chat was started; it becomes the persisted session.
    pub fn start_chat(&self, chat_id: ChatId) -> bool {
        self.dispatch(CollaboratorAction::SetChatId(Some(chat_id))) && self.set_chat_status(ChatStatus::Open)
    }

    /// The chat ended; the persisted session is cleared.
    pub fn end_chat(&self) -> bool {
        self.set_chat_status(ChatStatus::Closed) && self.dispatch(CollaboratorAction::SetChatId(None))
    }

    pub fn set_chat_status(&self, status: ChatStatus) -> bool {
        self.dispatch(CollaboratorAction::SetChatStatus(status))
    }

    pub fn messages_received(&self, messages: Vec<Message>) -> bool {
        self.dispatch(CollaboratorAction::MessagesAppended(messages))
    }
}
