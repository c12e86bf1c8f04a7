//! Notifier that alerts on the controlling terminal.
//!
//! Scheduled alerts are tokio sleep tasks keyed by id; cancelling aborts the
//! task. Sound is the terminal bell. There is no vibration hardware here, so
//! the haptic pattern is only logged.

use std::collections::HashMap;
use std::io::Write;

use chrono::{DateTime, Utc};
use pomocycle_core::notify::{HapticPattern, NotificationConfig, SessionMessage};
use pomocycle_core::{CompletionFeedback, Notifier, NotifyError, ScheduleId, SessionType};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub struct TerminalNotifier {
    config: NotificationConfig,
    runtime: Handle,
    next_id: u64,
    scheduled: HashMap<ScheduleId, JoinHandle<()>>,
}

impl TerminalNotifier {
    /// Must be called from within a tokio runtime.
    pub fn new(config: NotificationConfig) -> Self {
        Self {
            config,
            runtime: Handle::current(),
            next_id: 1,
            scheduled: HashMap::new(),
        }
    }

    fn announce(message: &SessionMessage, bell: bool) {
        let mut stdout = std::io::stdout().lock();
        let bell = if bell { "\x07" } else { "" };
        let _ = writeln!(stdout, "\n{bell}{}  {}", message.title, message.body);
        let _ = stdout.flush();
    }
}

impl Notifier for TerminalNotifier {
    fn request_permission(&mut self) -> Result<bool, NotifyError> {
        if self.config.enable_notifications {
            Ok(true)
        } else {
            Err(NotifyError::PermissionDenied)
        }
    }

    fn schedule_end_of_session(
        &mut self,
        session: SessionType,
        at: DateTime<Utc>,
    ) -> Result<ScheduleId, NotifyError> {
        if !self.config.enable_notifications {
            return Err(NotifyError::Disabled);
        }
        let id = ScheduleId(self.next_id);
        self.next_id += 1;

        let delay = (at - Utc::now()).to_std().unwrap_or_default();
        let message = self.config.message(session);
        let bell = self.config.sound_enabled();
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            Self::announce(&message, bell);
        });
        self.scheduled.retain(|_, task| !task.is_finished());
        self.scheduled.insert(id, task);
        Ok(id)
    }

    fn cancel(&mut self, id: ScheduleId) -> Result<(), NotifyError> {
        if let Some(task) = self.scheduled.remove(&id) {
            task.abort();
        }
        Ok(())
    }

    fn notify_immediate_completion(&mut self, session: SessionType, feedback: &CompletionFeedback) {
        if feedback.is_silent() {
            tracing::debug!(%session, "completion feedback switched off");
            return;
        }
        let bell = feedback.sound && self.config.sound_enabled();
        if feedback.notify && self.config.enable_notifications {
            Self::announce(&self.config.message(session), bell);
        } else if bell {
            let mut stdout = std::io::stdout().lock();
            let _ = write!(stdout, "\x07");
            let _ = stdout.flush();
        }
        if feedback.haptics && self.config.enable_haptics {
            let pattern = HapticPattern::for_session(session);
            tracing::debug!(
                style = ?pattern.style,
                pulses = pattern.pulses,
                gap = ?pattern.gap,
                "haptic feedback"
            );
        }
    }
}

impl Drop for TerminalNotifier {
    fn drop(&mut self) {
        for (_, task) in self.scheduled.drain() {
            task.abort();
        }
    }
}
