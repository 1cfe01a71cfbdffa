use thiserror::Error;

/// Errors from the tab-scoped session storage.
///
/// The session store accessor never propagates read failures; they are
/// logged and treated as "no persisted chat".
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session storage unavailable")]
    Unavailable,

    #[error("session storage I/O error: {0}")]
    Io(String),

    #[error("session storage corrupt: {0}")]
    Corrupt(String),
}

/// Errors from calls to the widget backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Errors while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(String),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}
