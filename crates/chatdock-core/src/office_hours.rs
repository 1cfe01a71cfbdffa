//! Office-hours evaluation.
//!
//! A pure function of the schedule and the current instant; the only input
//! that varies at runtime is `now`, which callers take from a [`Clock`].
//!
//! [`Clock`]: crate::clock::Clock

use chrono::{DateTime, Datelike, Timelike, Utc};

use chatdock_types::config::OfficeHours;

/// Whether `now` falls inside the configured office hours.
///
/// A disabled schedule places no restriction and always returns `true`.
/// Otherwise `now` is converted to the schedule's timezone and must land on
/// an active weekday (0 = Sunday) within `[begin, end)` hours.
pub fn is_in_office_hours(hours: &OfficeHours, now: DateTime<Utc>) -> bool {
    if !hours.enabled {
        return true;
    }

    let local = now.with_timezone(&hours.timezone);
    let weekday = local.weekday().num_days_from_sunday();
    let hour = local.hour();

    hours.days.contains(&weekday) && hours.begin <= hour && hour < hours.end
}
