//! Notification collaborator contract.
//!
//! The timer depends only on the [`Notifier`] trait: how an alert is actually
//! delivered (OS notification, terminal bell, vibration) is the implementor's
//! business. Implementations are injected at construction, never looked up.

pub mod messages;
mod recording;

pub use messages::{HapticPattern, ImpactStyle, SessionMessage};
pub use recording::{NotifierCall, RecordingNotifier};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::NotifyError;
use crate::timer::SessionType;

/// Opaque handle for a scheduled alert, usable only for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleId(pub u64);

impl std::fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub trait Notifier: Send {
    /// Ask the platform for permission to show alerts.
    fn request_permission(&mut self) -> Result<bool, NotifyError>;

    /// Register an alert that fires at `at` even if the host is suspended.
    fn schedule_end_of_session(
        &mut self,
        session: SessionType,
        at: DateTime<Utc>,
    ) -> Result<ScheduleId, NotifyError>;

    fn cancel(&mut self, id: ScheduleId) -> Result<(), NotifyError>;

    /// Fire-and-forget feedback for a session that just ended naturally.
    /// Failures are the implementor's to log; nothing comes back.
    fn notify_immediate_completion(&mut self, session: SessionType, feedback: &CompletionFeedback);
}

/// What to do when a session completes, passed explicitly on every
/// completion instead of being captured from UI state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionFeedback {
    #[serde(default = "default_true")]
    pub notify: bool,
    #[serde(default = "default_true")]
    pub sound: bool,
    #[serde(default = "default_true")]
    pub haptics: bool,
    #[serde(default = "default_sound_id")]
    pub sound_id: String,
}

fn default_true() -> bool {
    true
}

fn default_sound_id() -> String {
    "default".into()
}

impl Default for CompletionFeedback {
    fn default() -> Self {
        Self {
            notify: true,
            sound: true,
            haptics: true,
            sound_id: default_sound_id(),
        }
    }
}

impl CompletionFeedback {
    pub fn is_silent(&self) -> bool {
        !(self.notify || self.sound || self.haptics)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationSound {
    #[default]
    Default,
    Bell,
    Chime,
    None,
}

impl NotificationSound {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationSound::Default => "default",
            NotificationSound::Bell => "bell",
            NotificationSound::Chime => "chime",
            NotificationSound::None => "none",
        }
    }
}

impl std::str::FromStr for NotificationSound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(NotificationSound::Default),
            "bell" => Ok(NotificationSound::Bell),
            "chime" => Ok(NotificationSound::Chime),
            "none" => Ok(NotificationSound::None),
            other => Err(format!("unknown notification sound: {other}")),
        }
    }
}

pub const DEFAULT_NOTIFICATION_TITLE: &str = "Pomodoro Timer";
pub const DEFAULT_NOTIFICATION_BODY: &str = "Session completed!";

/// Persisted notification settings. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationConfig {
    pub enable_notifications: bool,
    pub enable_haptics: bool,
    pub notification_sound: NotificationSound,
    pub notification_title: String,
    pub notification_body: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enable_notifications: true,
            enable_haptics: true,
            notification_sound: NotificationSound::Default,
            notification_title: DEFAULT_NOTIFICATION_TITLE.into(),
            notification_body: DEFAULT_NOTIFICATION_BODY.into(),
        }
    }
}

impl NotificationConfig {
    /// Alert text for `session`. A customised title or body replaces the
    /// built-in per-session text.
    pub fn message(&self, session: SessionType) -> SessionMessage {
        let builtin = SessionMessage::builtin(session);
        SessionMessage {
            title: if self.notification_title == DEFAULT_NOTIFICATION_TITLE {
                builtin.title
            } else {
                self.notification_title.clone()
            },
            body: if self.notification_body == DEFAULT_NOTIFICATION_BODY {
                builtin.body
            } else {
                self.notification_body.clone()
            },
        }
    }

    pub fn sound_enabled(&self) -> bool {
        self.notification_sound != NotificationSound::None
    }
}

/// Notifier that never delivers anything.
#[derive(Debug, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn request_permission(&mut self) -> Result<bool, NotifyError> {
        Ok(false)
    }

    fn schedule_end_of_session(
        &mut self,
        _session: SessionType,
        _at: DateTime<Utc>,
    ) -> Result<ScheduleId, NotifyError> {
        Err(NotifyError::Disabled)
    }

    fn cancel(&mut self, _id: ScheduleId) -> Result<(), NotifyError> {
        Ok(())
    }

    fn notify_immediate_completion(&mut self, _session: SessionType, _feedback: &CompletionFeedback) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_config_uses_persisted_field_names() {
        let json = serde_json::to_value(NotificationConfig::default()).unwrap();
        assert_eq!(json["enableNotifications"], true);
        assert_eq!(json["enableHaptics"], true);
        assert_eq!(json["notificationSound"], "default");
        assert_eq!(json["notificationTitle"], "Pomodoro Timer");
        assert_eq!(json["notificationBody"], "Session completed!");
    }

    #[test]
    fn partial_notification_config_merges_over_defaults() {
        let cfg: NotificationConfig =
            serde_json::from_str(r#"{"enableHaptics": false, "notificationSound": "bell"}"#).unwrap();
        assert!(!cfg.enable_haptics);
        assert!(cfg.enable_notifications);
        assert_eq!(cfg.notification_sound, NotificationSound::Bell);
        assert_eq!(cfg.notification_title, DEFAULT_NOTIFICATION_TITLE);
    }

    #[test]
    fn builtin_messages_unless_customised() {
        let mut cfg = NotificationConfig::default();
        let work = cfg.message(SessionType::Work);
        assert_eq!(work, SessionMessage::builtin(SessionType::Work));

        cfg.notification_title = "Focus done".into();
        let custom = cfg.message(SessionType::Work);
        assert_eq!(custom.title, "Focus done");
        assert_eq!(custom.body, work.body);
    }

    #[test]
    fn sound_none_disables_sound() {
        let cfg = NotificationConfig {
            notification_sound: NotificationSound::None,
            ..Default::default()
        };
        assert!(!cfg.sound_enabled());
        assert!(NotificationConfig::default().sound_enabled());
    }

    #[test]
    fn feedback_silence() {
        let mut feedback = CompletionFeedback::default();
        assert!(!feedback.is_silent());
        feedback.notify = false;
        feedback.sound = false;
        feedback.haptics = false;
        assert!(feedback.is_silent());
    }

    #[test]
    fn noop_notifier_refuses_scheduling() {
        let mut notifier = NoopNotifier;
        assert_eq!(
            notifier.schedule_end_of_session(SessionType::Work, Utc::now()),
            Err(NotifyError::Disabled)
        );
    }
}
