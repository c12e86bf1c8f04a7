//! Persistence round trips through an on-disk SQLite store.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use pomocycle_core::notify::{NotificationConfig, NotificationSound, RecordingNotifier};
use pomocycle_core::storage::{NOTIFICATION_CONFIG_KEY, SESSIONS_KEY};
use pomocycle_core::{
    Database, ManualClock, Pomodoro, SessionRecord, SessionType, Store, StorageError,
    TimerConfigPatch,
};
use tempfile::TempDir;

fn open(dir: &TempDir) -> Arc<Database> {
    Arc::new(Database::open_at(dir.path().join("pomocycle.db")).unwrap())
}

fn pomodoro(store: Arc<Database>, clock: &ManualClock) -> Pomodoro {
    Pomodoro::new(store, Box::new(RecordingNotifier::new()), Arc::new(clock.clone()))
}

#[test]
fn session_log_round_trips_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap());

    let before = {
        let mut p = pomodoro(open(&dir), &clock);
        p.start_timer();
        clock.advance_secs(1500);
        p.tick();
        p.start_timer();
        clock.advance_secs(61);
        p.skip_session();
        p.sessions().to_vec()
    };
    assert_eq!(before.len(), 2);
    assert_eq!(before[0].session_type, SessionType::ShortBreak);
    assert_eq!(before[1].session_type, SessionType::Work);

    let after = pomodoro(open(&dir), &clock);
    assert_eq!(after.sessions(), before.as_slice());
    assert_eq!(
        after.sessions()[1].completed_at,
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 25, 0).unwrap()
    );
}

#[test]
fn timer_config_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(Utc::now());
    {
        let mut p = pomodoro(open(&dir), &clock);
        p.update_config(TimerConfigPatch {
            work_duration: Some(45),
            long_break_interval: Some(3),
            ..Default::default()
        });
    }
    let p = pomodoro(open(&dir), &clock);
    assert_eq!(p.config().work_duration, 45);
    assert_eq!(p.config().long_break_interval, 3);
    assert_eq!(p.config().short_break_duration, 5);
    assert_eq!(p.total_time(), 45 * 60);
}

#[test]
fn cleared_history_stays_cleared() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(Utc::now());
    {
        let mut p = pomodoro(open(&dir), &clock);
        p.start_timer();
        clock.advance_secs(5);
        p.skip_session();
        p.clear_history();
    }
    assert!(pomodoro(open(&dir), &clock).sessions().is_empty());
}

#[test]
fn corrupt_history_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(&dir);
    store.set(SESSIONS_KEY, "{not json").unwrap();

    assert!(matches!(
        store.load_sessions(),
        Err(StorageError::Corrupt { .. })
    ));
    let p = pomodoro(store, &ManualClock::new(Utc::now()));
    assert!(p.sessions().is_empty());
}

#[test]
fn history_json_layout_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(&dir);
    let record = SessionRecord {
        id: "1740822000000".into(),
        session_type: SessionType::LongBreak,
        duration: 900_000,
        completed_at: Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap(),
        was_completed: true,
    };
    store.save_sessions(std::slice::from_ref(&record)).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&store.get(SESSIONS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(raw[0]["type"], "long-break");
    assert_eq!(raw[0]["wasCompleted"], true);
    assert_eq!(raw[0]["duration"], 900_000);
    assert_eq!(store.load_sessions().unwrap(), vec![record]);
}

#[test]
fn notification_config_merges_partial_values() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(&dir);
    assert_eq!(store.load_notification_config().unwrap(), None);

    store
        .set(NOTIFICATION_CONFIG_KEY, r#"{"notificationSound":"none"}"#)
        .unwrap();
    let config = store.load_notification_config().unwrap().unwrap();
    assert_eq!(config.notification_sound, NotificationSound::None);
    assert!(config.enable_notifications);

    let updated = NotificationConfig {
        enable_haptics: false,
        ..config
    };
    store.save_notification_config(&updated).unwrap();
    assert_eq!(store.load_notification_config().unwrap(), Some(updated));
}
