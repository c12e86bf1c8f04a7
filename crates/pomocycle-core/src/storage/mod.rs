mod config;
pub mod database;
mod memory;
pub mod session_log;
mod settings;

pub use config::{
    ConfigStore, TimerConfig, TimerConfigPatch, LONG_BREAK_DURATION_RANGE,
    LONG_BREAK_INTERVAL_RANGE, SHORT_BREAK_DURATION_RANGE, WORK_DURATION_RANGE,
};
pub use database::Database;
pub use memory::MemoryStore;
pub use session_log::{DailyStats, SessionLog, SessionRecord};
pub use settings::Settings;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;
use crate::notify::NotificationConfig;

pub const SESSIONS_KEY: &str = "pomodoro-sessions";
pub const TIMER_CONFIG_KEY: &str = "pomodoro-config";
pub const NOTIFICATION_CONFIG_KEY: &str = "pomodoro-notification-config";

/// Durable key-value storage behind the timer.
///
/// Implementors provide raw string access; the typed load/save methods
/// encode JSON under the fixed keys above. The timer commits through this
/// seam after each state change, so its transition logic can be exercised
/// against [`MemoryStore`] without touching disk.
pub trait Store: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    fn load_sessions(&self) -> Result<Vec<SessionRecord>, StorageError> {
        Ok(load_json(self, SESSIONS_KEY)?.unwrap_or_default())
    }

    fn save_sessions(&self, records: &[SessionRecord]) -> Result<(), StorageError> {
        save_json(self, SESSIONS_KEY, records)
    }

    fn clear_sessions(&self) -> Result<(), StorageError> {
        self.remove(SESSIONS_KEY)
    }

    fn load_timer_config(&self) -> Result<Option<TimerConfig>, StorageError> {
        load_json(self, TIMER_CONFIG_KEY)
    }

    fn save_timer_config(&self, config: &TimerConfig) -> Result<(), StorageError> {
        save_json(self, TIMER_CONFIG_KEY, config)
    }

    fn load_notification_config(&self) -> Result<Option<NotificationConfig>, StorageError> {
        load_json(self, NOTIFICATION_CONFIG_KEY)
    }

    fn save_notification_config(&self, config: &NotificationConfig) -> Result<(), StorageError> {
        save_json(self, NOTIFICATION_CONFIG_KEY, config)
    }
}

fn load_json<S, T>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    S: Store + ?Sized,
    T: DeserializeOwned,
{
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

fn save_json<S, T>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    S: Store + ?Sized,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

/// Returns the data directory, creating it if needed.
///
/// `POMOCYCLE_DATA_DIR` overrides everything. Otherwise
/// `~/.config/pomocycle`, or `~/.config/pomocycle-dev` when
/// `POMOCYCLE_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("POMOCYCLE_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("POMOCYCLE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomocycle-dev")
            } else {
                base_dir.join("pomocycle")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
