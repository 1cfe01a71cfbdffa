//! Widget visibility.
//!
//! The widget is shown when a chat session is persisted or when the service
//! is inside office hours. A persisted session always wins, so a user who
//! started chatting keeps the widget after hours end.

use chatdock_types::config::OfficeHours;

use crate::clock::Clock;
use crate::office_hours::is_in_office_hours;
use crate::session::{SessionStorage, SessionStore};

pub fn compute_visibility(has_session: bool, in_office_hours: bool) -> bool {
    has_session || in_office_hours
}

/// Re-derives visibility from the session store and the clock.
#[derive(Debug)]
pub struct VisibilityController {
    office_hours: OfficeHours,
}

impl VisibilityController {
    pub fn new(office_hours: OfficeHours) -> Self {
        Self { office_hours }
    }

    /// Evaluate the visibility rule right now.
    pub fn evaluate<S: SessionStorage, C: Clock>(&self, sessions: &SessionStore<S>, clock: &C) -> bool {
        let has_session = sessions.has_session();
        let in_hours = is_in_office_hours(&self.office_hours, clock.now());
        tracing::trace!(has_session, in_hours, "evaluated widget visibility");
        compute_visibility(has_session, in_hours)
    }

    pub fn office_hours(&self) -> &OfficeHours {
        &self.office_hours
    }
}
