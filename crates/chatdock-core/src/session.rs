//! Persisted chat-session identity.
//!
//! The widget remembers the active chat across navigation within a browser
//! tab by storing its id under one well-known key. [`SessionStorage`] is the
//! raw string store (implementations live in chatdock-infra);
//! [`SessionStore`] is the typed accessor the orchestrator uses.

use chatdock_types::chat::ChatId;
use chatdock_types::error::StorageError;

/// Key under which the active chat id is persisted.
pub const SESSION_CHAT_ID_KEY: &str = "chatId";

/// Tab-lifetime string key-value storage.
pub trait SessionStorage: Send + Sync {
    /// Get a value by key. Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Set a value for a key (overwrite).
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. No-op if the key does not exist.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: SessionStorage + ?Sized> SessionStorage for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Typed accessor for the persisted chat id.
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: SessionStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Read the persisted chat id.
    ///
    /// Storage failures and blank values both read as "no session".
    pub fn read_chat_id(&self) -> Option<ChatId> {
        match self.storage.get(SESSION_CHAT_ID_KEY) {
            Ok(value) => value.and_then(ChatId::new),
            Err(e) => {
                tracing::warn!(error = %e, "session storage read failed, treating chat id as absent");
                None
            }
        }
    }

    pub fn has_session(&self) -> bool {
        self.read_chat_id().is_some()
    }

    pub fn write_chat_id(&self, chat_id: &ChatId) -> Result<(), StorageError> {
        self.storage.set(SESSION_CHAT_ID_KEY, chat_id.as_str())
    }

    pub fn clear_chat_id(&self) -> Result<(), StorageError> {
        self.storage.remove(SESSION_CHAT_ID_KEY)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{MapStorage, UnavailableStorage};
    use super::*;

    #[test]
    fn read_returns_persisted_id() {
        let store = SessionStore::new(MapStorage::with_chat_id("abc123"));
        assert_eq!(store.read_chat_id().unwrap().as_str(), "abc123");
        assert!(store.has_session());
    }

    #[test]
    fn read_treats_missing_and_blank_as_absent() {
        let store = SessionStore::new(MapStorage::default());
        assert!(store.read_chat_id().is_none());

        let store = SessionStore::new(MapStorage::with_chat_id("  "));
        assert!(store.read_chat_id().is_none());
    }

    #[test]
    fn read_failure_is_absent_not_fatal() {
        let store = SessionStore::new(UnavailableStorage);
        assert!(store.read_chat_id().is_none());
        assert!(!store.has_session());
    }

    #[test]
    fn write_then_clear() {
        let store = SessionStore::new(MapStorage::default());
        let id = ChatId::new("chat-42").unwrap();
        store.write_chat_id(&id).unwrap();
        assert_eq!(store.storage().chat_id().as_deref(), Some("chat-42"));

        store.clear_chat_id().unwrap();
        assert!(store.read_chat_id().is_none());
    }

    #[test]
    fn write_failure_is_reported() {
        let store = SessionStore::new(UnavailableStorage);
        let id = ChatId::new("chat-42").unwrap();
        assert!(matches!(
            store.write_chat_id(&id),
            Err(StorageError::Unavailable)
        ));
    }
}
