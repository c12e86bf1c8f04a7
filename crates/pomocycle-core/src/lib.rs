//! # Pomocycle Core Library
//!
//! Core logic for the Pomocycle Pomodoro timer: a wall-clock countdown that
//! rotates through work, short-break and long-break sessions, keeps a
//! history of terminated sessions and hands end-of-session alerts to an
//! injected notifier while the host is suspended.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A pure state machine. Every command takes `now`, and
//!   remaining time is always derived from the session deadline
//! - **Storage**: Key-value persistence (SQLite or in-memory) for history and
//!   config, plus TOML user settings
//! - **Notify**: The notifier contract and built-in alert text
//! - **Runtime**: A tokio task that owns the timer and its 1-second driver
//!
//! ## Key Components
//!
//! - [`Pomodoro`]: The composed timer used by presentation layers
//! - [`TimerEngine`]: Core timer state machine
//! - [`Database`]: SQLite-backed [`Store`]
//! - [`Notifier`]: Trait for alert delivery

pub mod error;
pub mod events;
pub mod notify;
pub mod pomodoro;
pub mod runtime;
pub mod storage;
pub mod suspension;
pub mod timer;

pub use error::{CoreError, NotifyError, StorageError};
pub use events::Event;
pub use notify::{CompletionFeedback, NotificationConfig, Notifier, ScheduleId};
pub use pomodoro::Pomodoro;
pub use runtime::TimerHandle;
pub use storage::{
    Database, MemoryStore, SessionLog, SessionRecord, Settings, Store, TimerConfig,
    TimerConfigPatch,
};
pub use suspension::Lifecycle;
pub use timer::{Clock, ManualClock, SessionType, SystemClock, TimerEngine, TimerState};
