pub mod config;
pub mod history;
pub mod run;
pub mod status;

use std::sync::Arc;

use pomocycle_core::notify::NoopNotifier;
use pomocycle_core::{Database, Pomodoro, StorageError, SystemClock};

/// Open the on-disk store under the data directory.
pub fn open_store() -> Result<Arc<Database>, StorageError> {
    let db = Database::open()?;
    tracing::debug!("database opened");
    Ok(Arc::new(db))
}

/// A timer over the on-disk store that never alerts, for commands that only
/// read or clear history and config.
pub fn open_quiet() -> Result<Pomodoro, StorageError> {
    Ok(Pomodoro::new(open_store()?, Box::new(NoopNotifier), Arc::new(SystemClock)))
}
