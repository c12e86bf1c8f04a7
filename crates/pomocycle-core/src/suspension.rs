//! Host lifecycle handling.
//!
//! While the host is inactive the periodic driver is stopped and the end of
//! a running session is handed to the notifier as a scheduled alert. On
//! return the alert is cancelled and the countdown is reconciled against
//! the wall clock, completing the session if its deadline already passed.

use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::pomodoro::Pomodoro;
use crate::timer::TimerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Backgrounded, hidden or about to sleep.
    Inactive,
    /// Foregrounded again.
    Active,
}

impl Pomodoro {
    pub fn handle_lifecycle(&mut self, lifecycle: Lifecycle) -> Option<Event> {
        match lifecycle {
            Lifecycle::Inactive => {
                self.became_inactive();
                None
            }
            Lifecycle::Active => self.became_active(),
        }
    }

    /// Schedule one alert at the current deadline if a session is running.
    pub fn became_inactive(&mut self) {
        self.suspended = true;
        self.schedule_end_alert();
    }

    /// Hand the running session's deadline to the notifier, replacing any
    /// alert already pending.
    pub(crate) fn schedule_end_alert(&mut self) {
        if self.engine.state() != TimerState::Running {
            return;
        }
        let Some(deadline) = self.engine.deadline() else {
            return;
        };
        if !self.notifications_permitted {
            tracing::debug!("notification permission missing; not scheduling");
            return;
        }
        // Never leave two alerts for the same session.
        self.cancel_pending();
        let session = self.engine.current_session();
        match self.notifier.schedule_end_of_session(session, deadline) {
            Ok(id) => {
                tracing::debug!(%id, %session, %deadline, "end-of-session notification scheduled");
                self.pending_schedule = Some(id);
            }
            Err(e) => self.log_schedule_failure(&e),
        }
    }

    /// Cancel the scheduled alert and catch the countdown up.
    pub fn became_active(&mut self) -> Option<Event> {
        self.suspended = false;
        self.cancel_pending();
        if self.engine.state() != TimerState::Running {
            return None;
        }
        let event = self.engine.tick(self.clock.now());
        self.settle(event)
    }
}
