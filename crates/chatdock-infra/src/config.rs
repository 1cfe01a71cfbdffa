//! Widget configuration loader.
//!
//! Reads `chatdock.toml` (by default from the data directory, `~/.chatdock/`)
//! and deserializes it into [`WidgetSettings`]. Falls back to defaults when
//! the file is missing or malformed.

use std::path::{Path, PathBuf};

use chatdock_types::config::WidgetSettings;
use chatdock_types::error::ConfigError;

/// File name of the configuration inside the data directory.
pub const CONFIG_FILE_NAME: &str = "chatdock.toml";

/// Read and parse the configuration file strictly.
///
/// Returns `Ok(None)` if the file does not exist.
pub async fn read_settings(path: &Path) -> Result<Option<WidgetSettings>, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(ConfigError::Read(format!("{}: {err}", path.display()))),
    };

    toml::from_str::<WidgetSettings>(&content)
        .map(Some)
        .map_err(|err| ConfigError::Parse(format!("{}: {err}", path.display())))
}

/// Load the widget configuration from `path`.
///
/// - If the file does not exist, returns [`WidgetSettings::default()`].
/// - If the file cannot be read or parsed, logs a warning and returns the default.
/// - Otherwise returns the parsed settings. Range checks are left to
///   [`WidgetSettings::validate`].
pub async fn load_settings(path: &Path) -> WidgetSettings {
    match read_settings(path).await {
        Ok(Some(settings)) => settings,
        Ok(None) => {
            tracing::debug!("No {} found, using defaults", path.display());
            WidgetSettings::default()
        }
        Err(err) => {
            tracing::warn!("{err}, using defaults");
            WidgetSettings::default()
        }
    }
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `CHATDOCK_DATA_DIR` environment variable
/// 2. `~/.chatdock`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHATDOCK_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chatdock");
    }

    PathBuf::from(".chatdock")
}

/// Resolve the configuration file path.
///
/// An explicit path wins, then `CHATDOCK_CONFIG`, then
/// `{data_dir}/chatdock.toml`.
pub fn resolve_config_path(explicit: Option<&Path>, data_dir: &Path) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var("CHATDOCK_CONFIG") {
        return PathBuf::from(path);
    }
    data_dir.join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_settings_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let settings = load_settings(&tmp.path().join(CONFIG_FILE_NAME)).await;
        assert_eq!(settings, WidgetSettings::default());
    }

    #[tokio::test]
    async fn load_settings_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        tokio::fs::write(
            &path,
            r#"
api_url = "https://ruuter.example.ee"
organization_name = "Example Agency"

[office_hours]
enabled = true
timezone = "Europe/Helsinki"
days = [1, 3, 5]

[timing]
idle_poll_ms = 30000
"#,
        )
        .await
        .unwrap();

        let settings = load_settings(&path).await;
        assert_eq!(settings.api_url, "https://ruuter.example.ee");
        assert!(settings.office_hours.enabled);
        assert_eq!(settings.office_hours.timezone.to_string(), "Europe/Helsinki");
        assert_eq!(settings.office_hours.days.len(), 3);
        assert_eq!(settings.timing.idle_poll_ms, 30_000);
        assert_eq!(settings.timing.active_chat_poll_ms, 5_000);
    }

    #[tokio::test]
    async fn load_settings_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        tokio::fs::write(&path, "this is not { valid toml !!!")
            .await
            .unwrap();

        assert_eq!(load_settings(&path).await, WidgetSettings::default());
    }

    #[tokio::test]
    async fn read_settings_reports_parse_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        tokio::fs::write(&path, "[office_hours]\ntimezone = \"Nowhere/Special\"\n")
            .await
            .unwrap();

        assert!(matches!(read_settings(&path).await, Err(ConfigError::Parse(_))));
        assert!(matches!(
            read_settings(&tmp.path().join("absent.toml")).await,
            Ok(None)
        ));
    }

    #[test]
    fn explicit_config_path_wins() {
        let data_dir = PathBuf::from("/home/user/.chatdock");
        assert_eq!(
            resolve_config_path(Some(Path::new("/etc/chatdock.toml")), &data_dir),
            PathBuf::from("/etc/chatdock.toml")
        );
    }

    #[test]
    fn test_resolve_paths_from_env() {
        // SAFETY: This test is the only one touching these variables and restores them immediately.
        unsafe {
            std::env::set_var("CHATDOCK_DATA_DIR", "/tmp/test-chatdock");
            std::env::remove_var("CHATDOCK_CONFIG");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-chatdock"));
        assert_eq!(
            resolve_config_path(None, &dir),
            PathBuf::from("/tmp/test-chatdock/chatdock.toml")
        );
        unsafe {
            std::env::remove_var("CHATDOCK_DATA_DIR");
        }
    }
}
