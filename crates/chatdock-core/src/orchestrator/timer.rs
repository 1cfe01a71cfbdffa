//! Scoped recurring timers.
//!
//! A [`ScopedTimer`] is either armed (owning a `tokio::time::Interval`) or
//! idle. Disarming or dropping it cancels the countdown, so a timer can never
//! outlive the condition that started it.

use std::fmt;
use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior};

/// The orchestrator's recurring timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    OnlinePoll,
    OfficeHours,
    SessionExtension,
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerKind::OnlinePoll => write!(f, "online_poll"),
            TimerKind::OfficeHours => write!(f, "office_hours"),
            TimerKind::SessionExtension => write!(f, "session_extension"),
        }
    }
}

#[derive(Debug)]
pub struct ScopedTimer {
    kind: TimerKind,
    interval: Option<Interval>,
}

impl ScopedTimer {
    pub fn new(kind: TimerKind) -> Self {
        Self {
            kind,
            interval: None,
        }
    }

    /// (Re)start the timer. The first tick comes one full `period` from now.
    ///
    /// `period` must be nonzero (tokio panics otherwise); periods come from
    /// settings that [`WidgetMachine::new`](super::WidgetMachine::new) has
    /// validated.
    pub fn arm(&mut self, period: Duration) {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
        tracing::debug!(timer = %self.kind, period_ms = period.as_millis() as u64, "timer armed");
    }

    pub fn disarm(&mut self) {
        if self.interval.take().is_some() {
            tracing::debug!(timer = %self.kind, "timer disarmed");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    pub fn period(&self) -> Option<Duration> {
        self.interval.as_ref().map(Interval::period)
    }

    /// Wait for the next tick. Pends forever while disarmed.
    ///
    /// Cancel safe: dropping the future does not lose or shift a tick.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_a_full_period() {
        let mut timer = ScopedTimer::new(TimerKind::OnlinePoll);
        timer.arm(Duration::from_secs(5));
        let start = Instant::now();
        timer.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(5));
        timer.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn rearm_restarts_countdown() {
        let mut timer = ScopedTimer::new(TimerKind::SessionExtension);
        timer.arm(Duration::from_secs(10));
        tokio::time::sleep(Duration::from_secs(7)).await;
        timer.arm(Duration::from_secs(10));
        let start = Instant::now();
        timer.tick().await;
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn disarmed_timer_never_fires() {
        let mut timer = ScopedTimer::new(TimerKind::OfficeHours);
        timer.arm(Duration::from_secs(1));
        timer.disarm();
        assert!(!timer.is_armed());
        assert!(timer.period().is_none());
        let fired = tokio::time::timeout(Duration::from_secs(60), timer.tick()).await;
        assert!(fired.is_err());
    }
}
