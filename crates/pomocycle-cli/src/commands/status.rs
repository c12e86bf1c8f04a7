use chrono::Local;
use pomocycle_core::storage::DailyStats;
use pomocycle_core::{NotificationConfig, Store, TimerConfig};
use serde::Serialize;

use super::{open_quiet, open_store};
use crate::display::format_clock;

#[derive(Serialize)]
struct Status {
    config: TimerConfig,
    notifications: NotificationConfig,
    today: DailyStats,
    total_sessions: usize,
}

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let notifications = open_store()?.load_notification_config()?.unwrap_or_default();
    let pomodoro = open_quiet()?;
    let config = *pomodoro.config();
    let status = Status {
        config,
        notifications,
        today: pomodoro.daily_stats(Local::now().date_naive(), &Local),
        total_sessions: pomodoro.sessions().len(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "Focus {}  Short Break {}  Long Break {}  (long break every {})",
        format_clock(u64::from(config.work_duration) * 60),
        format_clock(u64::from(config.short_break_duration) * 60),
        format_clock(u64::from(config.long_break_duration) * 60),
        config.long_break_interval,
    );
    println!(
        "Today: {} completed ({} focus, {} breaks), {} min total",
        status.today.completed,
        status.today.work_sessions,
        status.today.break_sessions,
        status.today.total_minutes,
    );
    println!(
        "Notifications: {}, sound {}, haptics {}",
        if status.notifications.enable_notifications { "on" } else { "off" },
        status.notifications.notification_sound.as_str(),
        if status.notifications.enable_haptics { "on" } else { "off" },
    );
    println!("Recorded sessions: {}", status.total_sessions);
    Ok(())
}
