//! Timer engine implementation.
//!
//! The timer engine is a wall-clock-deadline state machine. It owns no
//! threads and reads no clock: every command receives the current instant
//! and the caller drives `tick()` periodically (see [`super::TickDriver`]).
//! Remaining time is always derived from `deadline - now`, never decremented,
//! so a process that was suspended for an hour reads the right value on the
//! first tick after it wakes.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!          |
//!          +-> (deadline reached) -> Idle, next session
//! any  -> reset -> Idle, same session
//! any  -> skip  -> Idle, next session
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(TimerConfig::default());
//! engine.start(Utc::now());
//! // Once a second:
//! engine.tick(Utc::now()); // Some(Event::SessionCompleted { .. }) at zero
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::session::SessionType;
use crate::events::Event;
use crate::storage::{SessionRecord, TimerConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Core timer engine.
///
/// Invariants held after every command:
/// - `current_time` is within `0..=total_time()`
/// - `state == Running` exactly when `deadline` is set
/// - `session_count` only grows, and only when a work session terminates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    config: TimerConfig,
    state: TimerState,
    current_session: SessionType,
    /// Work sessions terminated so far, completed or skipped.
    session_count: u32,
    /// Remaining seconds for the current session.
    current_time: u64,
    /// Instant the running countdown reaches zero.
    #[serde(default)]
    deadline: Option<DateTime<Utc>>,
    /// Instant the current session first started running.
    #[serde(default)]
    session_start: Option<DateTime<Utc>>,
}

impl TimerEngine {
    /// Create an idle engine positioned at a full work session.
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            state: TimerState::Idle,
            current_session: SessionType::Work,
            session_count: 0,
            current_time: config.total_secs(SessionType::Work),
            deadline: None,
            session_start: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn current_session(&self) -> SessionType {
        self.current_session
    }

    pub fn session_count(&self) -> u32 {
        self.session_count
    }

    pub fn current_time(&self) -> u64 {
        self.current_time
    }

    pub fn total_time(&self) -> u64 {
        self.config.total_secs(self.current_session)
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    pub fn session_start(&self) -> Option<DateTime<Utc>> {
        self.session_start
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    /// 0.0 .. 100.0 progress within the current session.
    pub fn progress(&self) -> f64 {
        let total = self.total_time();
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.current_time);
        elapsed as f64 / total as f64 * 100.0
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        Event::StateSnapshot {
            state: self.state,
            session: self.current_session,
            session_count: self.session_count,
            remaining_secs: self.current_time,
            total_secs: self.total_time(),
            progress_pct: self.progress(),
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.state {
            TimerState::Running => None, // Already running.
            TimerState::Idle | TimerState::Paused => {
                let resumed = self.state == TimerState::Paused;
                let deadline = now + secs(self.current_time);
                self.deadline = Some(deadline);
                if !resumed {
                    self.session_start = Some(now);
                }
                self.state = TimerState::Running;
                Some(Event::TimerStarted {
                    session: self.current_session,
                    remaining_secs: self.current_time,
                    deadline,
                    resumed,
                    at: now,
                })
            }
        }
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        // Freeze at the value the deadline gives right now.
        self.flush_remaining(now);
        self.state = TimerState::Paused;
        self.deadline = None;
        Some(Event::TimerPaused {
            session: self.current_session,
            remaining_secs: self.current_time,
            at: now,
        })
    }

    /// Back to a full idle countdown of the same session. Never produces a record.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Option<Event> {
        self.state = TimerState::Idle;
        self.deadline = None;
        self.session_start = None;
        self.current_time = self.total_time();
        Some(Event::TimerReset {
            session: self.current_session,
            remaining_secs: self.current_time,
            at: now,
        })
    }

    /// Call periodically while running.
    ///
    /// Returns `TimerTicked` while time remains and `SessionCompleted` once
    /// the deadline has passed. Also used to reconcile after a suspension:
    /// a deadline that passed while asleep completes on the first call.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        let deadline = self.deadline?;
        self.current_time = remaining_secs(deadline, now).min(self.total_time());
        if self.current_time > 0 {
            return Some(Event::TimerTicked {
                session: self.current_session,
                remaining_secs: self.current_time,
                progress_pct: self.progress(),
                at: now,
            });
        }
        self.state = TimerState::Idle;
        self.complete_session(now)
    }

    /// Terminate the current session as naturally completed.
    ///
    /// Only acts if the session was actually started; otherwise the engine is
    /// returned to a full idle countdown and nothing is recorded.
    pub fn complete_session(&mut self, now: DateTime<Utc>) -> Option<Event> {
        self.state = TimerState::Idle;
        self.deadline = None;
        let Some(started) = self.session_start.take() else {
            self.current_time = self.total_time();
            return None;
        };
        let record = SessionRecord::new(
            self.current_session,
            elapsed_ms(started, now),
            now,
            true,
        );
        let next_session = self.rotate();
        Some(Event::SessionCompleted {
            record,
            next_session,
            session_count: self.session_count,
            at: now,
        })
    }

    /// End the current session early and move to the next one.
    pub fn skip(&mut self, now: DateTime<Utc>) -> Option<Event> {
        let from = self.current_session;
        let record = self
            .session_start
            .take()
            .map(|started| SessionRecord::new(from, elapsed_ms(started, now), now, false));
        self.state = TimerState::Idle;
        self.deadline = None;
        let to = self.rotate();
        Some(Event::SessionSkipped {
            from,
            to,
            record,
            session_count: self.session_count,
            at: now,
        })
    }

    /// Jump to `session` outside the rotation. Stops any countdown.
    pub fn set_session(&mut self, session: SessionType, now: DateTime<Utc>) -> Option<Event> {
        self.state = TimerState::Idle;
        self.session_start = None;
        self.change_session(session);
        Some(Event::SessionChanged {
            session,
            total_secs: self.total_time(),
            at: now,
        })
    }

    /// Adopt new durations.
    ///
    /// If the current session's total changes, the countdown restarts from
    /// the new total in `Idle` (no record). Otherwise nothing moves, even
    /// while running.
    pub fn set_config(&mut self, config: TimerConfig, now: DateTime<Utc>) -> Option<Event> {
        let previous_total = self.total_time();
        self.config = config;
        if self.total_time() == previous_total {
            return None;
        }
        self.set_session(self.current_session, now)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn flush_remaining(&mut self, now: DateTime<Utc>) {
        if let Some(deadline) = self.deadline {
            self.current_time = remaining_secs(deadline, now).min(self.total_time());
        }
    }

    /// Apply the rotation rule and return the new session.
    fn rotate(&mut self) -> SessionType {
        let ended = self.current_session;
        if ended == SessionType::Work {
            self.session_count = self.session_count.saturating_add(1);
        }
        let next = ended.next_after(self.session_count, self.config.long_break_interval);
        self.change_session(next);
        next
    }

    fn change_session(&mut self, session: SessionType) {
        self.current_session = session;
        self.current_time = self.total_time();
        self.deadline = None;
    }
}

fn secs(n: u64) -> Duration {
    Duration::seconds(i64::try_from(n).unwrap_or(i64::MAX / 1000))
}

/// Whole seconds left until `deadline`, rounded up, never negative.
fn remaining_secs(deadline: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let ms = (deadline - now).num_milliseconds();
    if ms <= 0 {
        0
    } else {
        u64::try_from(ms).map(|ms| ms.div_ceil(1000)).unwrap_or(0)
    }
}

fn elapsed_ms(started: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    u64::try_from((now - started).num_milliseconds()).unwrap_or(0)
}
