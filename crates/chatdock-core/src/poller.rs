//! Online-status polling policy.
//!
//! Decides when to check backend reachability and how often. The timer
//! itself belongs to the orchestrator runtime; this module only answers
//! "check now?" and "which interval?".

use std::time::Duration;

use chatdock_types::chat::ChatStatus;
use chatdock_types::config::Timing;
use chatdock_types::error::BackendError;
use chatdock_types::widget::OnlineStatus;

/// Poll period for the given reachability and chat status.
///
/// The short active-chat interval applies only while a chat is open and the
/// backend is known to be reachable; every other combination polls at the
/// idle interval.
pub fn polling_interval(online: OnlineStatus, chat_status: ChatStatus, timing: &Timing) -> Duration {
    if online == OnlineStatus::Reachable && chat_status == ChatStatus::Open {
        timing.active_chat_interval()
    } else {
        timing.idle_interval()
    }
}

/// Interpret a reachability check result.
///
/// Failures (including timeouts) mean unreachable; the next scheduled tick
/// is the retry.
pub fn check_outcome(result: &Result<bool, BackendError>) -> OnlineStatus {
    match result {
        Ok(true) => OnlineStatus::Reachable,
        Ok(false) => OnlineStatus::Unreachable,
        Err(_) => OnlineStatus::Unreachable,
    }
}

/// What the poller wants after a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPlan {
    /// Issue a check immediately instead of waiting for the timer.
    pub check_now: bool,
    pub interval: Duration,
}

/// Tracks the outstanding reachability check so ticks never stack requests.
#[derive(Debug)]
pub struct OnlineStatusPoller {
    timing: Timing,
    in_flight: bool,
}

impl OnlineStatusPoller {
    pub fn new(timing: Timing) -> Self {
        Self {
            timing,
            in_flight: false,
        }
    }

    pub fn plan(&self, online: OnlineStatus, chat_status: ChatStatus) -> PollPlan {
        PollPlan {
            check_now: online == OnlineStatus::Unknown,
            interval: polling_interval(online, chat_status, &self.timing),
        }
    }

    /// Claim the right to issue a check. Returns `false` while one is outstanding.
    pub fn begin_check(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    pub fn finish_check(&mut self) {
        self.in_flight = false;
    }

    pub fn is_checking(&self) -> bool {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUSES: [OnlineStatus; 3] = [
        OnlineStatus::Unknown,
        OnlineStatus::Reachable,
        OnlineStatus::Unreachable,
    ];

    #[test]
    fn active_interval_only_when_reachable_and_open() {
        let timing = Timing::default();
        for online in STATUSES {
            for chat in [ChatStatus::Closed, ChatStatus::Open] {
                let expected = if online == OnlineStatus::Reachable && chat == ChatStatus::Open {
                    timing.active_chat_interval()
                } else {
                    timing.idle_interval()
                };
                assert_eq!(
                    polling_interval(online, chat, &timing),
                    expected,
                    "{online} / {chat}"
                );
            }
        }
    }

    #[test]
    fn unknown_status_requests_immediate_check() {
        let poller = OnlineStatusPoller::new(Timing::default());
        assert!(poller.plan(OnlineStatus::Unknown, ChatStatus::Closed).check_now);
        assert!(!poller.plan(OnlineStatus::Reachable, ChatStatus::Open).check_now);
        assert!(!poller.plan(OnlineStatus::Unreachable, ChatStatus::Open).check_now);
    }

    #[test]
    fn failed_check_is_unreachable() {
        assert_eq!(check_outcome(&Ok(true)), OnlineStatus::Reachable);
        assert_eq!(check_outcome(&Ok(false)), OnlineStatus::Unreachable);
        assert_eq!(check_outcome(&Err(BackendError::Timeout)), OnlineStatus::Unreachable);
    }

    #[test]
    fn checks_do_not_stack() {
        let mut poller = OnlineStatusPoller::new(Timing::default());
        assert!(poller.begin_check());
        assert!(!poller.begin_check());
        assert!(poller.is_checking());
        poller.finish_check();
        assert!(poller.begin_check());
    }
}
