//! Application state shared by the CLI commands.
//!
//! Resolves the data directory and configuration once, and pins the core
//! session store to the file-backed infra implementation.

use std::path::{Path, PathBuf};

use anyhow::Context;

use chatdock_core::session::SessionStore;
use chatdock_infra::config::{load_settings, resolve_config_path, resolve_data_dir};
use chatdock_infra::session::FileSessionStorage;
use chatdock_types::config::WidgetSettings;

/// Session store pinned to the data-directory file.
pub type FileSessionStore = SessionStore<FileSessionStorage>;

pub struct AppState {
    pub settings: WidgetSettings,
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load and validate configuration. Missing config files yield defaults.
    pub async fn init(config: Option<&Path>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config_path = resolve_config_path(config, &data_dir);

        let settings = load_settings(&config_path).await;
        settings
            .validate()
            .with_context(|| format!("invalid configuration in {}", config_path.display()))?;

        tracing::debug!(
            config = %config_path.display(),
            data_dir = %data_dir.display(),
            "application state initialized"
        );

        Ok(Self {
            settings,
            config_path,
            data_dir,
        })
    }

    /// Session store backed by `{data_dir}/session.json`.
    pub fn file_sessions(&self) -> FileSessionStore {
        SessionStore::new(FileSessionStorage::in_data_dir(&self.data_dir))
    }
}
