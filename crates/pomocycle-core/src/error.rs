//! Core error types for pomocycle-core.
//!
//! Nothing in the timer is fatal: the `Pomodoro` command surface logs these
//! and keeps counting. They are returned from constructors, stores and
//! notifier implementations so that callers can decide what to log.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomocycle-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Notification collaborator errors
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// The background timer task is no longer running
    #[error("timer runtime has stopped")]
    RuntimeStopped,
}

/// Persistence errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Stored data exists but does not parse
    #[error("Stored value under '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Value could not be encoded for storage
    #[error("Failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Preferences file errors
    #[error("Failed to access {path}: {message}")]
    File { path: PathBuf, message: String },

    /// Data directory could not be resolved or created
    #[error("Failed to access data directory: {0}")]
    DataDir(#[from] std::io::Error),
}

/// Notification collaborator errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// The platform refused notification permission, or the user switched
    /// notifications off
    #[error("Notification permission denied")]
    PermissionDenied,

    /// Notifications are switched off in the notification config
    #[error("Notifications are disabled")]
    Disabled,

    /// The backend failed to schedule, cancel or deliver
    #[error("Notification backend failed: {0}")]
    Backend(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg)
                if inner.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                StorageError::Locked
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_converts_into_core_error() {
        let err: CoreError = StorageError::QueryFailed("boom".into()).into();
        assert_eq!(err.to_string(), "Storage error: Query failed: boom");
    }

    #[test]
    fn corrupt_error_names_the_key() {
        let source = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let err = StorageError::Corrupt {
            key: "pomodoro-sessions".into(),
            source,
        };
        assert!(err.to_string().contains("pomodoro-sessions"));
    }

    #[test]
    fn notify_error_converts_into_core_error() {
        let err: CoreError = NotifyError::PermissionDenied.into();
        assert_eq!(err.to_string(), "Notification error: Notification permission denied");
    }

    #[test]
    fn rusqlite_errors_map_to_query_failed() {
        let err: StorageError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, StorageError::QueryFailed(_)));
    }
}
