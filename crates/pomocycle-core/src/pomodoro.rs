//! The composed timer interface consumed by presentation layers.
//!
//! [`Pomodoro`] wires the pure [`TimerEngine`] to its collaborators: it reads
//! the injected clock, commits terminated sessions to the [`SessionLog`],
//! commits config changes to the [`Store`], invokes the completion callback
//! and talks to the [`Notifier`]. Commands never fail: collaborator and
//! storage errors are logged and the countdown carries on.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::error::NotifyError;
use crate::events::Event;
use crate::notify::{CompletionFeedback, Notifier, ScheduleId};
use crate::storage::{
    ConfigStore, DailyStats, SessionLog, SessionRecord, Store, TimerConfig, TimerConfigPatch,
};
use crate::timer::{Clock, SessionType, TimerEngine, TimerState};

/// Called once per natural completion with the session that just ended.
pub type SessionCompleteCallback = Box<dyn FnMut(SessionType) + Send>;

pub struct Pomodoro {
    pub(crate) engine: TimerEngine,
    config: ConfigStore,
    log: SessionLog,
    store: Arc<dyn Store>,
    pub(crate) notifier: Box<dyn Notifier>,
    pub(crate) clock: Arc<dyn Clock>,
    feedback: CompletionFeedback,
    on_session_complete: Option<SessionCompleteCallback>,
    /// Alert registered while the host was inactive.
    pub(crate) pending_schedule: Option<ScheduleId>,
    pub(crate) suspended: bool,
    pub(crate) notifications_permitted: bool,
}

impl Pomodoro {
    /// Build a timer from persisted state.
    ///
    /// Config and history that fail to load fall back to defaults and an
    /// empty log respectively.
    pub fn new(store: Arc<dyn Store>, notifier: Box<dyn Notifier>, clock: Arc<dyn Clock>) -> Self {
        let config = match store.load_timer_config() {
            Ok(config) => config.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "using default timer config");
                TimerConfig::default()
            }
        };
        let log = SessionLog::load(Arc::clone(&store));
        Self {
            engine: TimerEngine::new(config),
            config: ConfigStore::new(config),
            log,
            store,
            notifier,
            clock,
            feedback: CompletionFeedback::default(),
            on_session_complete: None,
            pending_schedule: None,
            suspended: false,
            notifications_permitted: true,
        }
    }

    /// Merge caller-supplied initial values over the loaded config.
    pub fn with_config_patch(mut self, patch: TimerConfigPatch) -> Self {
        if !patch.is_empty() {
            let config = *self.config.update(&patch);
            self.engine = TimerEngine::new(config);
        }
        self
    }

    pub fn with_feedback(mut self, feedback: CompletionFeedback) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn on_session_complete(mut self, callback: impl FnMut(SessionType) + Send + 'static) -> Self {
        self.on_session_complete = Some(Box::new(callback));
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn current_time(&self) -> u64 {
        self.engine.current_time()
    }

    pub fn total_time(&self) -> u64 {
        self.engine.total_time()
    }

    pub fn timer_state(&self) -> TimerState {
        self.engine.state()
    }

    pub fn current_session(&self) -> SessionType {
        self.engine.current_session()
    }

    pub fn session_count(&self) -> u32 {
        self.engine.session_count()
    }

    pub fn progress(&self) -> f64 {
        self.engine.progress()
    }

    pub fn config(&self) -> &TimerConfig {
        self.config.get()
    }

    pub fn sessions(&self) -> &[SessionRecord] {
        self.log.records()
    }

    /// The `limit` newest records.
    pub fn recent_sessions(&self, limit: usize) -> &[SessionRecord] {
        self.log.recent(limit)
    }

    pub fn feedback(&self) -> &CompletionFeedback {
        &self.feedback
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    /// Wall-clock instant the running session ends at.
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.engine.deadline()
    }

    pub fn pending_schedule(&self) -> Option<ScheduleId> {
        self.pending_schedule
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Whether the periodic driver should be alive right now.
    pub fn wants_driver(&self) -> bool {
        self.engine.state() == TimerState::Running && !self.suspended
    }

    pub fn snapshot(&self) -> Event {
        self.engine.snapshot(self.clock.now())
    }

    pub fn daily_stats<Tz: TimeZone>(&self, day: NaiveDate, tz: &Tz) -> DailyStats {
        self.log.daily_stats(day, tz)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start_timer(&mut self) -> Option<Event> {
        let event = self.engine.start(self.clock.now());
        if event.is_some() {
            tracing::debug!(session = %self.current_session(), remaining = self.current_time(), "timer started");
            if self.suspended {
                self.schedule_end_alert();
            }
        }
        event
    }

    pub fn pause_timer(&mut self) -> Option<Event> {
        let event = self.engine.pause(self.clock.now());
        if event.is_some() {
            self.cancel_pending();
            tracing::debug!(remaining = self.current_time(), "timer paused");
        }
        event
    }

    pub fn reset_timer(&mut self) -> Option<Event> {
        self.cancel_pending();
        let event = self.engine.reset(self.clock.now());
        tracing::debug!(session = %self.current_session(), "timer reset");
        event
    }

    pub fn skip_session(&mut self) -> Option<Event> {
        self.cancel_pending();
        let event = self.engine.skip(self.clock.now());
        if let Some(Event::SessionSkipped { from, to, record, .. }) = &event {
            tracing::debug!(%from, %to, recorded = record.is_some(), "session skipped");
            if let Some(record) = record {
                self.log.append(record.clone());
            }
        }
        event
    }

    /// Drive the countdown; call once per driver period while running.
    pub fn tick(&mut self) -> Option<Event> {
        let event = self.engine.tick(self.clock.now());
        self.settle(event)
    }

    pub fn update_config(&mut self, patch: TimerConfigPatch) -> Option<Event> {
        let config = *self.config.update(&patch);
        if let Err(e) = self.store.save_timer_config(&config) {
            tracing::warn!(error = %e, "failed to persist timer config");
        }
        let event = self.engine.set_config(config, self.clock.now());
        if event.is_some() {
            self.cancel_pending();
            tracing::debug!(total = self.total_time(), "countdown restarted for new duration");
        }
        event
    }

    /// Jump to `session` outside the normal rotation.
    pub fn set_session(&mut self, session: SessionType) -> Option<Event> {
        self.cancel_pending();
        self.engine.set_session(session, self.clock.now())
    }

    pub fn set_feedback(&mut self, feedback: CompletionFeedback) {
        self.feedback = feedback;
    }

    pub fn clear_history(&mut self) -> Option<Event> {
        let cleared = self.log.len();
        self.log.clear();
        tracing::info!(cleared, "session history cleared");
        Some(Event::HistoryCleared {
            at: self.clock.now(),
        })
    }

    /// Ask the notifier for permission. A refusal or failure disables
    /// end-of-session scheduling; the in-app countdown is unaffected.
    pub fn request_permission(&mut self) -> bool {
        self.notifications_permitted = match self.notifier.request_permission() {
            Ok(true) => true,
            Ok(false) | Err(NotifyError::PermissionDenied) => {
                tracing::warn!("notification permission not granted");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "notification permission request failed");
                false
            }
        };
        self.notifications_permitted
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Apply the side effects of a natural completion, if `event` is one.
    pub(crate) fn settle(&mut self, event: Option<Event>) -> Option<Event> {
        if let Some(Event::SessionCompleted {
            record,
            next_session,
            session_count,
            ..
        }) = &event
        {
            let session = record.session_type;
            tracing::info!(%session, next = %next_session, session_count, "session completed");
            self.cancel_pending();
            self.log.append(record.clone());
            if let Some(callback) = self.on_session_complete.as_mut() {
                callback(session);
            }
            self.notifier
                .notify_immediate_completion(session, &self.feedback);
        }
        event
    }

    pub(crate) fn cancel_pending(&mut self) {
        if let Some(id) = self.pending_schedule.take() {
            match self.notifier.cancel(id) {
                Ok(()) => tracing::debug!(%id, "scheduled notification cancelled"),
                Err(e) => tracing::warn!(%id, error = %e, "failed to cancel scheduled notification"),
            }
        }
    }

    pub(crate) fn log_schedule_failure(&self, error: &NotifyError) {
        match error {
            NotifyError::Disabled => tracing::debug!("notifications disabled; nothing scheduled"),
            other => tracing::warn!(error = %other, "failed to schedule end-of-session notification"),
        }
    }
}

impl std::fmt::Debug for Pomodoro {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pomodoro")
            .field("engine", &self.engine)
            .field("config", &self.config)
            .field("sessions", &self.log.len())
            .field("pending_schedule", &self.pending_schedule)
            .field("suspended", &self.suspended)
            .finish_non_exhaustive()
    }
}
