//! The background runtime under paused tokio time.
//!
//! The tokio clock drives the tick driver while a `ManualClock` supplies the
//! wall-clock instants the engine sees, so both are advanced together.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{TimeZone, Utc};
use pomocycle_core::notify::RecordingNotifier;
use pomocycle_core::runtime;
use pomocycle_core::{
    Clock, Event, Lifecycle, ManualClock, MemoryStore, Pomodoro, SessionType, TimerConfigPatch,
    TimerState,
};
use tokio::sync::broadcast;

fn setup() -> (Pomodoro, ManualClock, RecordingNotifier) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap());
    let notifier = RecordingNotifier::new();
    let pomodoro = Pomodoro::new(
        Arc::new(MemoryStore::new()),
        Box::new(notifier.clone()),
        Arc::new(clock.clone()),
    )
    .with_config_patch(TimerConfigPatch {
        work_duration: Some(1),
        ..Default::default()
    });
    (pomodoro, clock, notifier)
}

/// Advance both clocks by `secs`, one driver period at a time.
async fn advance(clock: &ManualClock, secs: u64) {
    for _ in 0..secs {
        clock.advance_secs(1);
        tokio::time::advance(StdDuration::from_secs(1)).await;
    }
}

async fn next_matching<F>(events: &mut broadcast::Receiver<Event>, mut pred: F) -> Event
where
    F: FnMut(&Event) -> bool,
{
    loop {
        let event = events.recv().await.unwrap();
        if pred(&event) {
            return event;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn running_session_completes_through_driver() {
    let (pomodoro, clock, notifier) = setup();
    let (handle, task) = runtime::spawn(pomodoro);
    let mut events = handle.subscribe();

    handle.start().unwrap();
    next_matching(&mut events, |e| matches!(e, Event::TimerStarted { .. })).await;
    advance(&clock, 60).await;

    let event = next_matching(&mut events, |e| matches!(e, Event::SessionCompleted { .. })).await;
    match event {
        Event::SessionCompleted {
            record,
            next_session,
            session_count,
            ..
        } => {
            assert_eq!(record.session_type, SessionType::Work);
            assert!(record.was_completed);
            assert_eq!(next_session, SessionType::ShortBreak);
            assert_eq!(session_count, 1);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(notifier.completions(), vec![SessionType::Work]);

    handle.shutdown().unwrap();
    let pomodoro = task.await.unwrap();
    assert_eq!(pomodoro.timer_state(), TimerState::Idle);
    assert_eq!(pomodoro.sessions().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn suspension_schedules_then_catches_up() {
    let (pomodoro, clock, notifier) = setup();
    let (handle, task) = runtime::spawn(pomodoro);
    let mut events = handle.subscribe();

    handle.start().unwrap();
    next_matching(&mut events, |e| matches!(e, Event::TimerStarted { .. })).await;
    handle.lifecycle(Lifecycle::Inactive).unwrap();
    // Round trip so the lifecycle command is applied before checking.
    handle.snapshot().await.unwrap();

    let scheduled = notifier.scheduled();
    assert_eq!(scheduled.len(), 1);
    assert_eq!(scheduled[0].2, clock.now() + chrono::Duration::seconds(60));

    // No local ticks while inactive.
    clock.advance_secs(20);
    tokio::time::advance(StdDuration::from_secs(20)).await;
    assert!(matches!(events.try_recv(), Err(broadcast::error::TryRecvError::Empty)));

    handle.lifecycle(Lifecycle::Active).unwrap();
    match next_matching(&mut events, |e| matches!(e, Event::TimerTicked { .. })).await {
        Event::TimerTicked { remaining_secs, .. } => assert_eq!(remaining_secs, 40),
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(notifier.cancelled(), vec![scheduled[0].0]);

    handle.shutdown().unwrap();
    let pomodoro = task.await.unwrap();
    assert_eq!(pomodoro.timer_state(), TimerState::Running);
    assert_eq!(pomodoro.pending_schedule(), None);
}

#[tokio::test(start_paused = true)]
async fn paused_timer_does_not_tick() {
    let (pomodoro, clock, _notifier) = setup();
    let (handle, task) = runtime::spawn(pomodoro);
    let mut events = handle.subscribe();

    handle.start().unwrap();
    handle.pause().unwrap();
    next_matching(&mut events, |e| matches!(e, Event::TimerPaused { .. })).await;

    advance(&clock, 120).await;
    assert!(matches!(events.try_recv(), Err(broadcast::error::TryRecvError::Empty)));

    handle.shutdown().unwrap();
    let pomodoro = task.await.unwrap();
    assert_eq!(pomodoro.current_time(), 60);
    assert!(pomodoro.sessions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn history_is_available_through_handle() {
    let (pomodoro, clock, _notifier) = setup();
    let (handle, task) = runtime::spawn(pomodoro);

    handle.start().unwrap();
    advance(&clock, 5).await;
    handle.skip().unwrap();

    let sessions = handle.sessions().await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert!(!sessions[0].was_completed);

    handle.clear_history().unwrap();
    assert!(handle.sessions().await.unwrap().is_empty());

    handle.shutdown().unwrap();
    task.await.unwrap();
}
