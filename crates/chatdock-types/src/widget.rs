//! Widget-level state types: reachability, loaded-ness sentinels, the
//! emergency notice, the widget configuration, and the derived surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;

/// Last known backend reachability.
///
/// Starts `Unknown` every process lifetime and only moves when a
/// reachability check completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnlineStatus {
    #[default]
    Unknown,
    Reachable,
    Unreachable,
}

impl fmt::Display for OnlineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnlineStatus::Unknown => write!(f, "unknown"),
            OnlineStatus::Reachable => write!(f, "reachable"),
            OnlineStatus::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// "Not yet fetched" versus "fetched, possibly empty".
///
/// A loaded value is never turned back into `Unloaded`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum Loadable<T> {
    #[default]
    Unloaded,
    Loaded(T),
}

impl<T> Loadable<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Loadable::Loaded(_))
    }

    pub fn as_loaded(&self) -> Option<&T> {
        match self {
            Loadable::Loaded(value) => Some(value),
            Loadable::Unloaded => None,
        }
    }
}

/// Service-wide emergency banner.
///
/// "No notice" is a loaded notice with `is_visible == false`, distinct from
/// an unloaded one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyNotice {
    #[serde(default)]
    pub is_visible: bool,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

impl EmergencyNotice {
    /// Whether the notice should be shown at `now`: visible, non-empty, and
    /// inside its (optional) start/end window.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        if !self.is_visible || self.text.as_deref().is_none_or(str::is_empty) {
            return false;
        }
        let started = self.start.is_none_or(|start| start <= now);
        let not_ended = self.end.is_none_or(|end| now < end);
        started && not_ended
    }
}

/// Presentation settings fetched from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    #[serde(default = "default_proactive_seconds")]
    pub proactive_seconds: u32,
    #[serde(default)]
    pub show_message: bool,
    #[serde(default = "default_bubble_message_seconds")]
    pub bubble_message_seconds: u32,
    #[serde(default)]
    pub bubble_message_text: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub animation: String,
}

fn default_proactive_seconds() -> u32 {
    20
}

fn default_bubble_message_seconds() -> u32 {
    5
}

fn default_color() -> String {
    "#003cff".to_string()
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            proactive_seconds: default_proactive_seconds(),
            show_message: false,
            bubble_message_seconds: default_bubble_message_seconds(),
            bubble_message_text: String::new(),
            color: default_color(),
            animation: String::new(),
        }
    }
}

/// What the external renderer should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetSurface {
    Hidden,
    Profile,
    Chat,
}

impl fmt::Display for WidgetSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetSurface::Hidden => write!(f, "hidden"),
            WidgetSurface::Profile => write!(f, "profile"),
            WidgetSurface::Chat => write!(f, "chat"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, hour, 0, 0).unwrap()
    }

    #[test]
    fn loadable_defaults_to_unloaded() {
        let notice: Loadable<EmergencyNotice> = Loadable::default();
        assert!(!notice.is_loaded());
        assert!(notice.as_loaded().is_none());
    }

    #[test]
    fn hidden_notice_is_loaded_but_inactive() {
        let notice = Loadable::Loaded(EmergencyNotice::default());
        assert!(notice.is_loaded());
        assert!(!notice.as_loaded().unwrap().is_active_at(at(10)));
    }

    #[test]
    fn notice_respects_window() {
        let notice = EmergencyNotice {
            is_visible: true,
            text: Some("Service maintenance".to_string()),
            start: Some(at(8)),
            end: Some(at(12)),
        };
        assert!(!notice.is_active_at(at(7)));
        assert!(notice.is_active_at(at(8)));
        assert!(notice.is_active_at(at(11)));
        assert!(!notice.is_active_at(at(12)));
    }

    #[test]
    fn widget_config_fills_defaults() {
        let config: WidgetConfig = serde_json::from_str(r#"{"showMessage": true}"#).unwrap();
        assert!(config.show_message);
        assert_eq!(config.proactive_seconds, 20);
        assert_eq!(config.color, "#003cff");
    }
}
