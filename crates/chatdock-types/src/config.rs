//! Static widget configuration.
//!
//! `WidgetSettings` is read once at startup (from `chatdock.toml`) and stays
//! fixed for the lifetime of the process. Every field has a default so an
//! empty file is a valid configuration.

use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Deployment environment the widget talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Top-level widget configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetSettings {
    /// Base URL of the widget API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub environment: Environment,

    /// Base URL of the authentication service (session extension).
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    #[serde(default)]
    pub organization_name: String,

    #[serde(default)]
    pub terms_link: String,

    #[serde(default)]
    pub office_hours: OfficeHours,

    #[serde(default)]
    pub timing: Timing,
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_auth_url() -> String {
    "http://localhost:8085".to_string()
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            environment: Environment::default(),
            auth_url: default_auth_url(),
            organization_name: String::new(),
            terms_link: String::new(),
            office_hours: OfficeHours::default(),
            timing: Timing::default(),
        }
    }
}

impl WidgetSettings {
    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api_url must not be empty".to_string()));
        }
        if self.auth_url.trim().is_empty() {
            return Err(ConfigError::Invalid("auth_url must not be empty".to_string()));
        }
        self.office_hours.validate()?;
        self.timing.validate()
    }
}

/// Weekly window during which the widget is shown without an active session.
///
/// Weekdays use 0 = Sunday through 6 = Saturday. Hours are whole hours in
/// `timezone`; the window is `[begin, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeHours {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_timezone")]
    pub timezone: Tz,

    #[serde(default = "default_begin")]
    pub begin: u32,

    #[serde(default = "default_end")]
    pub end: u32,

    #[serde(default = "default_days")]
    pub days: BTreeSet<u32>,
}

fn default_timezone() -> Tz {
    chrono_tz::Europe::Tallinn
}

fn default_begin() -> u32 {
    8
}

fn default_end() -> u32 {
    17
}

fn default_days() -> BTreeSet<u32> {
    (1..=5).collect()
}

impl Default for OfficeHours {
    fn default() -> Self {
        Self {
            enabled: false,
            timezone: default_timezone(),
            begin: default_begin(),
            end: default_end(),
            days: default_days(),
        }
    }
}

impl OfficeHours {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.begin > 24 || self.end > 24 {
            return Err(ConfigError::Invalid(format!(
                "office hours must lie within 0..=24, got {}..{}",
                self.begin, self.end
            )));
        }
        if let Some(day) = self.days.iter().find(|d| **d > 6) {
            return Err(ConfigError::Invalid(format!(
                "office hours weekday {day} out of range (0 = Sunday .. 6 = Saturday)"
            )));
        }
        Ok(())
    }
}

/// Timer periods, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    /// Reachability poll period when no chat is active.
    #[serde(default = "default_idle_poll_ms")]
    pub idle_poll_ms: u64,

    /// Reachability poll period while a chat is open and the backend is reachable.
    #[serde(default = "default_active_chat_poll_ms")]
    pub active_chat_poll_ms: u64,

    /// Visibility re-check period.
    #[serde(default = "default_office_hours_recheck_ms")]
    pub office_hours_recheck_ms: u64,

    /// Session renewal period while a chat is open.
    #[serde(default = "default_session_extension_ms")]
    pub session_extension_ms: u64,

    /// Upper bound for a single backend request.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_idle_poll_ms() -> u64 {
    20_000
}

fn default_active_chat_poll_ms() -> u64 {
    5_000
}

fn default_office_hours_recheck_ms() -> u64 {
    60_000
}

fn default_session_extension_ms() -> u64 {
    600_000
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            idle_poll_ms: default_idle_poll_ms(),
            active_chat_poll_ms: default_active_chat_poll_ms(),
            office_hours_recheck_ms: default_office_hours_recheck_ms(),
            session_extension_ms: default_session_extension_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Timing {
    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms)
    }

    pub fn active_chat_interval(&self) -> Duration {
        Duration::from_millis(self.active_chat_poll_ms)
    }

    pub fn office_hours_interval(&self) -> Duration {
        Duration::from_millis(self.office_hours_recheck_ms)
    }

    pub fn session_extension_interval(&self) -> Duration {
        Duration::from_millis(self.session_extension_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let periods = [
            ("idle_poll_ms", self.idle_poll_ms),
            ("active_chat_poll_ms", self.active_chat_poll_ms),
            ("office_hours_recheck_ms", self.office_hours_recheck_ms),
            ("session_extension_ms", self.session_extension_ms),
            ("request_timeout_ms", self.request_timeout_ms),
        ];
        for (name, value) in periods {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be greater than 0")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let settings: WidgetSettings = toml::from_str("").unwrap();
        assert_eq!(settings, WidgetSettings::default());
        assert!(!settings.office_hours.enabled);
        assert_eq!(settings.timing.idle_poll_ms, 20_000);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn parses_full_document() {
        let toml_str = r#"
api_url = "https://ruuter.example.ee"
environment = "production"
auth_url = "https://tim.example.ee"
organization_name = "Example Agency"
terms_link = "https://example.ee/terms"

[office_hours]
enabled = true
timezone = "Europe/Tallinn"
begin = 9
end = 16
days = [1, 2, 3, 4, 5]

[timing]
idle_poll_ms = 30000
active_chat_poll_ms = 2000
"#;
        let settings: WidgetSettings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.environment, Environment::Production);
        assert_eq!(settings.office_hours.timezone, chrono_tz::Europe::Tallinn);
        assert_eq!(settings.office_hours.begin, 9);
        assert!(settings.office_hours.days.contains(&5));
        assert_eq!(settings.timing.active_chat_interval(), Duration::from_secs(2));
        // untouched fields keep their defaults
        assert_eq!(settings.timing.session_extension_ms, 600_000);
    }

    #[test]
    fn unknown_timezone_fails_to_parse() {
        let toml_str = r#"
[office_hours]
timezone = "Mars/Olympus_Mons"
"#;
        assert!(toml::from_str::<WidgetSettings>(toml_str).is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut settings = WidgetSettings::default();
        settings.office_hours.days.insert(7);
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));

        let mut settings = WidgetSettings::default();
        settings.office_hours.end = 25;
        assert!(settings.validate().is_err());

        let mut settings = WidgetSettings::default();
        settings.timing.idle_poll_ms = 0;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("idle_poll_ms"));
    }
}
