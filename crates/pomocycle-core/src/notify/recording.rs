use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};

use super::{CompletionFeedback, Notifier, ScheduleId};
use crate::error::NotifyError;
use crate::timer::SessionType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierCall {
    RequestPermission,
    Schedule {
        id: ScheduleId,
        session: SessionType,
        at: DateTime<Utc>,
    },
    Cancel(ScheduleId),
    Completion {
        session: SessionType,
        feedback: CompletionFeedback,
    },
}

/// Notifier that only records what it was asked to do.
///
/// Clones share the same call log, so a test keeps one clone and hands the
/// other to the timer.
#[derive(Debug, Clone)]
pub struct RecordingNotifier {
    calls: Arc<Mutex<Vec<NotifierCall>>>,
    next_id: Arc<AtomicU64>,
    grant_permission: bool,
    fail_scheduling: Arc<AtomicBool>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            calls: Arc::default(),
            next_id: Arc::new(AtomicU64::new(1)),
            grant_permission: true,
            fail_scheduling: Arc::default(),
        }
    }

    /// A notifier whose permission request is refused.
    pub fn denying() -> Self {
        Self {
            grant_permission: false,
            ..Self::new()
        }
    }

    /// Make scheduling fail with a backend error.
    pub fn fail_scheduling(&self, fail: bool) {
        self.fail_scheduling.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<NotifierCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn scheduled(&self) -> Vec<(ScheduleId, SessionType, DateTime<Utc>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                NotifierCall::Schedule { id, session, at } => Some((id, session, at)),
                _ => None,
            })
            .collect()
    }

    pub fn cancelled(&self) -> Vec<ScheduleId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                NotifierCall::Cancel(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn completions(&self) -> Vec<SessionType> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                NotifierCall::Completion { session, .. } => Some(session),
                _ => None,
            })
            .collect()
    }

    fn push(&self, call: NotifierCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for RecordingNotifier {
    fn request_permission(&mut self) -> Result<bool, NotifyError> {
        self.push(NotifierCall::RequestPermission);
        Ok(self.grant_permission)
    }

    fn schedule_end_of_session(
        &mut self,
        session: SessionType,
        at: DateTime<Utc>,
    ) -> Result<ScheduleId, NotifyError> {
        if self.fail_scheduling.load(Ordering::SeqCst) {
            return Err(NotifyError::Backend("scheduler unavailable".into()));
        }
        let id = ScheduleId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.push(NotifierCall::Schedule { id, session, at });
        Ok(id)
    }

    fn cancel(&mut self, id: ScheduleId) -> Result<(), NotifyError> {
        self.push(NotifierCall::Cancel(id));
        Ok(())
    }

    fn notify_immediate_completion(&mut self, session: SessionType, feedback: &CompletionFeedback) {
        self.push(NotifierCall::Completion {
            session,
            feedback: feedback.clone(),
        });
    }
}
