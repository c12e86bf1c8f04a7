//! Newest-first history of terminated sessions.
//!
//! The in-memory list is the source of truth for readers; every mutation is
//! followed by a best-effort commit of the full list to the [`Store`]. A
//! failed write is logged and the in-memory change stands.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::Store;
use crate::timer::SessionType;

/// One completed or skipped session. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub session_type: SessionType,
    /// Milliseconds actually spent, from first start to termination.
    pub duration: u64,
    pub completed_at: DateTime<Utc>,
    /// `true` if the countdown reached zero, `false` if skipped.
    pub was_completed: bool,
}

impl SessionRecord {
    pub fn new(
        session_type: SessionType,
        duration: u64,
        completed_at: DateTime<Utc>,
        was_completed: bool,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            session_type,
            duration,
            completed_at,
            was_completed,
        }
    }
}

/// Summary of one calendar day of history, as the history panel shows it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    /// Sessions that ran to zero.
    pub completed: u64,
    /// Whole minutes spent across completed and skipped sessions.
    pub total_minutes: u64,
    pub work_sessions: u64,
    pub break_sessions: u64,
}

pub struct SessionLog {
    records: Vec<SessionRecord>,
    store: Arc<dyn Store>,
}

impl SessionLog {
    /// Load persisted history.
    ///
    /// Unreadable or malformed data yields an empty log and a warning;
    /// startup never fails because of history.
    pub fn load(store: Arc<dyn Store>) -> Self {
        let records = match store.load_sessions() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable session history");
                Vec::new()
            }
        };
        tracing::debug!(count = records.len(), "session history loaded");
        Self { records, store }
    }

    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The `limit` most recent records.
    pub fn recent(&self, limit: usize) -> &[SessionRecord] {
        &self.records[..limit.min(self.records.len())]
    }

    /// Prepend `record` and commit the full list.
    pub fn append(&mut self, record: SessionRecord) {
        self.records.insert(0, record);
        if let Err(e) = self.store.save_sessions(&self.records) {
            tracing::warn!(error = %e, "failed to persist session history");
        }
    }

    /// Empty the log and remove the persisted copy.
    pub fn clear(&mut self) {
        self.records.clear();
        if let Err(e) = self.store.clear_sessions() {
            tracing::warn!(error = %e, "failed to remove persisted session history");
        }
    }

    /// Stats for records whose completion falls on `day` in `tz`.
    pub fn daily_stats<Tz: TimeZone>(&self, day: NaiveDate, tz: &Tz) -> DailyStats {
        let mut stats = DailyStats::default();
        let mut total_ms = 0u64;
        for record in self
            .records
            .iter()
            .filter(|r| r.completed_at.with_timezone(tz).date_naive() == day)
        {
            total_ms = total_ms.saturating_add(record.duration);
            if !record.was_completed {
                continue;
            }
            stats.completed += 1;
            if record.session_type.is_break() {
                stats.break_sessions += 1;
            } else {
                stats.work_sessions += 1;
            }
        }
        stats.total_minutes = total_ms / 60_000;
        stats
    }
}

impl std::fmt::Debug for SessionLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLog")
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, SESSIONS_KEY};
    use chrono::Duration;

    fn record(session_type: SessionType, minutes: u64, done: bool, at: DateTime<Utc>) -> SessionRecord {
        SessionRecord::new(session_type, minutes * 60_000, at, done)
    }

    #[test]
    fn append_prepends_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let mut log = SessionLog::load(store.clone());
        let now = Utc::now();
        let first = record(SessionType::Work, 25, true, now);
        let second = record(SessionType::ShortBreak, 5, true, now + Duration::minutes(5));
        log.append(first.clone());
        log.append(second.clone());

        assert_eq!(log.records(), &[second.clone(), first.clone()]);
        assert_eq!(store.load_sessions().unwrap(), vec![second, first]);
    }

    #[test]
    fn reload_yields_identical_list() {
        let store = Arc::new(MemoryStore::new());
        let mut log = SessionLog::load(store.clone());
        let now = Utc::now();
        log.append(record(SessionType::Work, 25, true, now));
        log.append(record(SessionType::LongBreak, 3, false, now + Duration::milliseconds(1234)));

        let reloaded = SessionLog::load(store);
        assert_eq!(reloaded.records(), log.records());
    }

    #[test]
    fn malformed_history_loads_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(SESSIONS_KEY, "{not json").unwrap();
        let log = SessionLog::load(store);
        assert!(log.is_empty());
    }

    #[test]
    fn clear_removes_persisted_state() {
        let store = Arc::new(MemoryStore::new());
        let mut log = SessionLog::load(store.clone());
        log.append(record(SessionType::Work, 25, true, Utc::now()));
        log.clear();
        assert!(log.is_empty());
        assert!(store.get(SESSIONS_KEY).unwrap().is_none());
    }

    #[test]
    fn recent_caps_at_length() {
        let mut log = SessionLog::load(Arc::new(MemoryStore::new()));
        for _ in 0..3 {
            log.append(record(SessionType::Work, 1, true, Utc::now()));
        }
        assert_eq!(log.recent(10).len(), 3);
        assert_eq!(log.recent(2).len(), 2);
    }

    #[test]
    fn daily_stats_count_only_that_day() {
        let mut log = SessionLog::load(Arc::new(MemoryStore::new()));
        let day = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        log.append(record(SessionType::Work, 25, true, day));
        log.append(record(SessionType::ShortBreak, 5, true, day + Duration::minutes(30)));
        log.append(record(SessionType::Work, 10, false, day + Duration::hours(1)));
        log.append(record(SessionType::Work, 25, true, day - Duration::days(1)));

        let stats = log.daily_stats(day.date_naive(), &Utc);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.work_sessions, 1);
        assert_eq!(stats.break_sessions, 1);
        assert_eq!(stats.total_minutes, 40);
    }

    #[test]
    fn record_serializes_to_persisted_layout() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let rec = SessionRecord {
            id: "abc".into(),
            session_type: SessionType::ShortBreak,
            duration: 300_000,
            completed_at: at,
            was_completed: true,
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["type"], "short-break");
        assert_eq!(json["duration"], 300_000);
        assert_eq!(json["completedAt"], "2025-03-01T10:00:00Z");
        assert_eq!(json["wasCompleted"], true);
    }

    #[test]
    fn parses_millisecond_iso_timestamps() {
        let json = r#"[{"id":"lx1","type":"work","duration":1500000,
            "completedAt":"2024-05-01T08:30:00.123Z","wasCompleted":true}]"#;
        let records: Vec<SessionRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(
            records[0].completed_at,
            Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap() + Duration::milliseconds(123)
        );
    }
}
