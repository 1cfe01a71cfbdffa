//! One-shot office-hours and visibility evaluation.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use console::style;

use chatdock_core::clock::Clock;
use chatdock_core::office_hours::is_in_office_hours;
use chatdock_core::visibility::VisibilityController;

use crate::state::AppState;

/// Clock pinned to the instant being evaluated.
struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn parse_instant(at: Option<&str>) -> Result<DateTime<Utc>> {
    match at {
        Some(raw) => Ok(DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("'{raw}' is not an RFC 3339 timestamp"))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

pub fn status(state: &AppState, at: Option<&str>, json: bool) -> Result<()> {
    let now = parse_instant(at)?;
    let hours = &state.settings.office_hours;
    let sessions = state.file_sessions();

    let chat_id = sessions.read_chat_id();
    let in_hours = is_in_office_hours(hours, now);
    let visible = VisibilityController::new(hours.clone()).evaluate(&sessions, &FixedClock(now));
    let local = now.with_timezone(&hours.timezone);

    if json {
        let out = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "evaluated_at": now.to_rfc3339(),
            "local_time": local.to_rfc3339(),
            "office_hours": {
                "enabled": hours.enabled,
                "timezone": hours.timezone.to_string(),
                "begin": hours.begin,
                "end": hours.end,
                "days": hours.days,
                "open": in_hours,
            },
            "chat_id": chat_id.as_ref().map(|id| id.as_str()),
            "visible": visible,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let yes_no = |ok: bool| {
        if ok {
            format!("{}", style("yes").green())
        } else {
            format!("{}", style("no").red())
        }
    };

    println!();
    println!("  {} chatdock v{}", style("⚡").bold(), env!("CARGO_PKG_VERSION"));
    println!();
    println!("  {}", style("── Office hours ──").dim());
    if hours.enabled {
        let days = hours
            .days
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        println!(
            "  Window:   {:02}:00-{:02}:00 {} (days {days})",
            hours.begin, hours.end, hours.timezone
        );
    } else {
        println!("  Window:   {}", style("disabled (always open)").dim());
    }
    println!("  Local:    {}", local.format("%a %Y-%m-%d %H:%M"));
    println!("  Open:     {}", yes_no(in_hours));
    println!();
    println!("  {}", style("── Session ──").dim());
    match &chat_id {
        Some(id) => println!("  Chat:     {}", style(id).cyan()),
        None => println!("  Chat:     {}", style("none").dim()),
    }
    println!();
    println!("  Visible:  {}", yes_no(visible));
    println!();
    Ok(())
}
