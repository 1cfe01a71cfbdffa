//! File-backed session storage.
//!
//! Keeps the session map as a flat JSON object in `{data_dir}/session.json`
//! so separate CLI invocations share one "tab". A missing file is an empty
//! session; a file that is not a JSON object of strings is reported as
//! corrupt rather than silently overwritten on read.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chatdock_core::session::SessionStorage;
use chatdock_types::error::StorageError;

/// File name of the session map inside the data directory.
pub const SESSION_FILE_NAME: &str = "session.json";

/// Session map persisted to a JSON file.
///
/// I/O is synchronous `std::fs`, called from the orchestrator task. The file
/// holds a handful of short keys and is only touched when the chat id
/// changes, so each call is one small read or write. A slow or network
/// filesystem stalls that task for the duration of the call.
#[derive(Debug)]
pub struct FileSessionStorage {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileSessionStorage {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// Storage at `{data_dir}/session.json`.
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(SESSION_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(err) => {
                return Err(StorageError::Io(format!("{}: {err}", self.path.display())));
            }
        };

        serde_json::from_str(&content)
            .map_err(|err| StorageError::Corrupt(format!("{}: {err}", self.path.display())))
    }

    /// Write via a temporary sibling and rename, so readers never see a
    /// half-written file.
    fn store(&self, values: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |err: std::io::Error| StorageError::Io(format!("{}: {err}", self.path.display()));

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(values)
            .map_err(|err| StorageError::Io(err.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>) -> bool) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Unavailable)?;
        let mut values = self.load()?;
        if f(&mut values) {
            self.store(&values)?;
        }
        Ok(())
    }
}

impl SessionStorage for FileSessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Unavailable)?;
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        tracing::debug!(key, path = %self.path.display(), "writing session value");
        self.update(|values| {
            values.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|values| values.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let storage = FileSessionStorage::in_data_dir(dir.path());
        assert_eq!(storage.get("chatId").unwrap(), None);
        // removing from an empty session does not create the file
        storage.remove("chatId").unwrap();
        assert!(!storage.path().exists());
    }

    #[test]
    fn values_persist_across_instances() {
        let dir = tempdir().unwrap();
        FileSessionStorage::in_data_dir(dir.path())
            .set("chatId", "abc123")
            .unwrap();

        let reopened = FileSessionStorage::in_data_dir(dir.path());
        assert_eq!(reopened.get("chatId").unwrap().as_deref(), Some("abc123"));

        reopened.remove("chatId").unwrap();
        assert_eq!(
            FileSessionStorage::in_data_dir(dir.path()).get("chatId").unwrap(),
            None
        );
    }

    #[test]
    fn set_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let storage = FileSessionStorage::in_data_dir(&dir.path().join("nested").join("deep"));
        storage.set("chatId", "abc123").unwrap();
        assert!(storage.path().exists());
    }

    #[test]
    fn other_keys_are_preserved() {
        let dir = tempdir().unwrap();
        let storage = FileSessionStorage::in_data_dir(dir.path());
        storage.set("theme", "dark").unwrap();
        storage.set("chatId", "abc123").unwrap();
        storage.remove("chatId").unwrap();
        assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempdir().unwrap();
        let storage = FileSessionStorage::in_data_dir(dir.path());
        std::fs::write(storage.path(), "[1, 2, 3]").unwrap();

        assert!(matches!(storage.get("chatId"), Err(StorageError::Corrupt(_))));
        assert!(matches!(
            storage.set("chatId", "abc123"),
            Err(StorageError::Corrupt(_))
        ));
    }

    #[tokio::test]
    async fn orchestrator_persists_chat_id_from_runtime_task() {
        use chatdock_core::clock::SystemClock;
        use chatdock_core::orchestrator::WidgetMachine;
        use chatdock_core::session::SESSION_CHAT_ID_KEY;
        use chatdock_core::state::CollaboratorAction;
        use chatdock_types::chat::ChatId;
        use chatdock_types::config::WidgetSettings;

        let dir = tempdir().unwrap();
        let storage = FileSessionStorage::in_data_dir(dir.path());
        let mut machine = WidgetMachine::new(&WidgetSettings::default(), storage, SystemClock).unwrap();
        machine.start();
        machine.collaborator(CollaboratorAction::SetChatId(ChatId::new("abc123")));

        let reopened = FileSessionStorage::in_data_dir(dir.path());
        assert_eq!(reopened.get(SESSION_CHAT_ID_KEY).unwrap().as_deref(), Some("abc123"));
    }
}
