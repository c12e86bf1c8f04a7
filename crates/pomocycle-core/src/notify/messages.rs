//! Built-in alert text and haptic patterns per session type.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::timer::SessionType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMessage {
    pub title: String,
    pub body: String,
}

impl SessionMessage {
    pub fn builtin(session: SessionType) -> Self {
        let (title, body) = match session {
            SessionType::Work => ("🍅 Work session complete!", "Time for a break!"),
            SessionType::ShortBreak => ("☕ Short break over!", "Ready to focus again?"),
            SessionType::LongBreak => ("🎉 Long break over!", "Start a fresh cycle!"),
        };
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactStyle {
    Light,
    Heavy,
}

/// A run of identical impacts separated by a fixed gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HapticPattern {
    pub style: ImpactStyle,
    pub pulses: u8,
    pub gap: Duration,
}

impl HapticPattern {
    /// Work ends with two strong pulses; breaks end with three gentle ones.
    pub fn for_session(session: SessionType) -> Self {
        match session {
            SessionType::Work => Self {
                style: ImpactStyle::Heavy,
                pulses: 2,
                gap: Duration::from_millis(200),
            },
            SessionType::ShortBreak | SessionType::LongBreak => Self {
                style: ImpactStyle::Light,
                pulses: 3,
                gap: Duration::from_millis(100),
            },
        }
    }

    /// Total time from first to last pulse.
    pub fn span(&self) -> Duration {
        self.gap * u32::from(self.pulses.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_pattern_is_two_heavy_pulses() {
        let pattern = HapticPattern::for_session(SessionType::Work);
        assert_eq!(pattern.style, ImpactStyle::Heavy);
        assert_eq!(pattern.pulses, 2);
        assert_eq!(pattern.span(), Duration::from_millis(200));
    }

    #[test]
    fn break_pattern_is_three_light_pulses() {
        let pattern = HapticPattern::for_session(SessionType::LongBreak);
        assert_eq!(pattern.style, ImpactStyle::Light);
        assert_eq!(pattern.span(), Duration::from_millis(200));
    }

    #[test]
    fn every_session_has_distinct_text() {
        let work = SessionMessage::builtin(SessionType::Work);
        let short = SessionMessage::builtin(SessionType::ShortBreak);
        let long = SessionMessage::builtin(SessionType::LongBreak);
        assert_ne!(work.title, short.title);
        assert_ne!(short.title, long.title);
    }
}
