//! Timer duration settings.
//!
//! [`ConfigStore`] is a plain value holder: `update` shallow-merges a
//! [`TimerConfigPatch`] and performs no validation. Range clamping is the
//! presentation layer's job, which is why the UI ranges live here as
//! constants next to [`TimerConfig::clamped`].

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::timer::SessionType;

pub const WORK_DURATION_RANGE: RangeInclusive<u32> = 1..=60;
pub const SHORT_BREAK_DURATION_RANGE: RangeInclusive<u32> = 1..=30;
pub const LONG_BREAK_DURATION_RANGE: RangeInclusive<u32> = 5..=60;
pub const LONG_BREAK_INTERVAL_RANGE: RangeInclusive<u32> = 2..=10;

/// Durations in minutes plus the long-break cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerConfig {
    #[serde(default = "default_work_duration")]
    pub work_duration: u32,
    #[serde(default = "default_short_break_duration")]
    pub short_break_duration: u32,
    #[serde(default = "default_long_break_duration")]
    pub long_break_duration: u32,
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
}

fn default_work_duration() -> u32 {
    25
}
fn default_short_break_duration() -> u32 {
    5
}
fn default_long_break_duration() -> u32 {
    15
}
fn default_long_break_interval() -> u32 {
    4
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_duration: default_work_duration(),
            short_break_duration: default_short_break_duration(),
            long_break_duration: default_long_break_duration(),
            long_break_interval: default_long_break_interval(),
        }
    }
}

impl TimerConfig {
    /// Configured minutes for a session type.
    pub fn duration_min(&self, session: SessionType) -> u32 {
        match session {
            SessionType::Work => self.work_duration,
            SessionType::ShortBreak => self.short_break_duration,
            SessionType::LongBreak => self.long_break_duration,
        }
    }

    /// Total countdown length of a session in seconds.
    pub fn total_secs(&self, session: SessionType) -> u64 {
        u64::from(self.duration_min(session)).saturating_mul(60)
    }

    pub fn merged(&self, patch: &TimerConfigPatch) -> Self {
        Self {
            work_duration: patch.work_duration.unwrap_or(self.work_duration),
            short_break_duration: patch
                .short_break_duration
                .unwrap_or(self.short_break_duration),
            long_break_duration: patch
                .long_break_duration
                .unwrap_or(self.long_break_duration),
            long_break_interval: patch
                .long_break_interval
                .unwrap_or(self.long_break_interval),
        }
    }

    /// Clamp every field into the range the settings UI allows.
    pub fn clamped(self) -> Self {
        Self {
            work_duration: clamp(self.work_duration, &WORK_DURATION_RANGE),
            short_break_duration: clamp(self.short_break_duration, &SHORT_BREAK_DURATION_RANGE),
            long_break_duration: clamp(self.long_break_duration, &LONG_BREAK_DURATION_RANGE),
            long_break_interval: clamp(self.long_break_interval, &LONG_BREAK_INTERVAL_RANGE),
        }
    }
}

fn clamp(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

/// A partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimerConfigPatch {
    pub work_duration: Option<u32>,
    pub short_break_duration: Option<u32>,
    pub long_break_duration: Option<u32>,
    pub long_break_interval: Option<u32>,
}

impl TimerConfigPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Same patch with every provided field clamped to its UI range.
    pub fn clamped(self) -> Self {
        Self {
            work_duration: self.work_duration.map(|v| clamp(v, &WORK_DURATION_RANGE)),
            short_break_duration: self
                .short_break_duration
                .map(|v| clamp(v, &SHORT_BREAK_DURATION_RANGE)),
            long_break_duration: self
                .long_break_duration
                .map(|v| clamp(v, &LONG_BREAK_DURATION_RANGE)),
            long_break_interval: self
                .long_break_interval
                .map(|v| clamp(v, &LONG_BREAK_INTERVAL_RANGE)),
        }
    }
}

/// Holder for the live [`TimerConfig`].
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    config: TimerConfig,
}

impl ConfigStore {
    pub fn new(config: TimerConfig) -> Self {
        Self { config }
    }

    pub fn get(&self) -> &TimerConfig {
        &self.config
    }

    /// Shallow-merge `patch` over the current config.
    pub fn update(&mut self, patch: &TimerConfigPatch) -> &TimerConfig {
        self.config = self.config.merged(patch);
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_pomodoro() {
        let cfg = TimerConfig::default();
        assert_eq!(cfg.work_duration, 25);
        assert_eq!(cfg.short_break_duration, 5);
        assert_eq!(cfg.long_break_duration, 15);
        assert_eq!(cfg.long_break_interval, 4);
    }

    #[test]
    fn total_secs_is_minutes_times_sixty() {
        let cfg = TimerConfig::default();
        assert_eq!(cfg.total_secs(SessionType::Work), 1500);
        assert_eq!(cfg.total_secs(SessionType::ShortBreak), 300);
        assert_eq!(cfg.total_secs(SessionType::LongBreak), 900);
    }

    #[test]
    fn update_merges_only_provided_fields() {
        let mut store = ConfigStore::default();
        store.update(&TimerConfigPatch {
            work_duration: Some(50),
            ..Default::default()
        });
        assert_eq!(store.get().work_duration, 50);
        assert_eq!(store.get().short_break_duration, 5);
        assert_eq!(store.get().long_break_interval, 4);
    }

    #[test]
    fn update_does_not_validate() {
        let mut store = ConfigStore::default();
        store.update(&TimerConfigPatch {
            long_break_interval: Some(0),
            work_duration: Some(500),
            ..Default::default()
        });
        assert_eq!(store.get().long_break_interval, 0);
        assert_eq!(store.get().work_duration, 500);
    }

    #[test]
    fn clamped_respects_ui_ranges() {
        let cfg = TimerConfig {
            work_duration: 0,
            short_break_duration: 45,
            long_break_duration: 1,
            long_break_interval: 99,
        }
        .clamped();
        assert_eq!(cfg.work_duration, 1);
        assert_eq!(cfg.short_break_duration, 30);
        assert_eq!(cfg.long_break_duration, 5);
        assert_eq!(cfg.long_break_interval, 10);
    }

    #[test]
    fn patch_deserializes_partial_camel_case() {
        let patch: TimerConfigPatch = serde_json::from_str(r#"{"shortBreakDuration": 10}"#).unwrap();
        assert_eq!(patch.short_break_duration, Some(10));
        assert!(patch.work_duration.is_none());
        assert!(!patch.is_empty());
        assert!(TimerConfigPatch::default().is_empty());
    }

    #[test]
    fn stored_config_with_missing_fields_uses_defaults() {
        let cfg: TimerConfig = serde_json::from_str(r#"{"workDuration": 30}"#).unwrap();
        assert_eq!(cfg.work_duration, 30);
        assert_eq!(cfg.long_break_duration, 15);
    }
}
