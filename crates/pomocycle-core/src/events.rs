use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::SessionRecord;
use crate::timer::{SessionType, TimerState};

/// Every state change of the timer produces an Event.
/// Presentation layers subscribe to them through the runtime handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        session: SessionType,
        remaining_secs: u64,
        deadline: DateTime<Utc>,
        /// True when the countdown resumed from `paused`.
        resumed: bool,
        at: DateTime<Utc>,
    },
    TimerPaused {
        session: SessionType,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        session: SessionType,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerTicked {
        session: SessionType,
        remaining_secs: u64,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero naturally.
    SessionCompleted {
        record: SessionRecord,
        next_session: SessionType,
        session_count: u32,
        at: DateTime<Utc>,
    },
    /// Session ended early. `record` is absent when the session never ran.
    SessionSkipped {
        from: SessionType,
        to: SessionType,
        record: Option<SessionRecord>,
        session_count: u32,
        at: DateTime<Utc>,
    },
    /// Current session changed outside the rotation (external set or a
    /// config change that altered the total time).
    SessionChanged {
        session: SessionType,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    HistoryCleared {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        session: SessionType,
        session_count: u32,
        remaining_secs: u64,
        total_secs: u64,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}
