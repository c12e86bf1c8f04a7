use clap::Subcommand;
use pomocycle_core::notify::NotificationSound;
use pomocycle_core::{Settings, Store, TimerConfigPatch};

use super::open_store;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a settings value
    Get {
        /// Settings key (e.g. "feedback.sound", "log_filter")
        key: String,
    },
    /// Set a settings value
    Set {
        /// Settings key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings values
    List,
    /// Show or change session durations (minutes)
    Timer {
        #[arg(long)]
        work: Option<u32>,
        #[arg(long)]
        short_break: Option<u32>,
        #[arg(long)]
        long_break: Option<u32>,
        /// Work sessions per long break
        #[arg(long)]
        interval: Option<u32>,
    },
    /// Show or change notification settings
    Notifications {
        #[arg(long)]
        enabled: Option<bool>,
        #[arg(long)]
        haptics: Option<bool>,
        /// default, bell, chime or none
        #[arg(long)]
        sound: Option<NotificationSound>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        body: Option<String>,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let settings = Settings::load()?;
            match settings.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut settings = Settings::load()?;
            settings.set(&key, &value)?;
            settings.save()?;
            println!("ok");
        }
        ConfigAction::List => {
            for (key, value) in Settings::load()?.entries() {
                println!("{key} = {value}");
            }
        }
        ConfigAction::Timer {
            work,
            short_break,
            long_break,
            interval,
        } => {
            let store = open_store()?;
            let current = store.load_timer_config()?.unwrap_or_default();
            let patch = TimerConfigPatch {
                work_duration: work,
                short_break_duration: short_break,
                long_break_duration: long_break,
                long_break_interval: interval,
            }
            .clamped();
            let config = current.merged(&patch);
            if !patch.is_empty() {
                store.save_timer_config(&config)?;
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Notifications {
            enabled,
            haptics,
            sound,
            title,
            body,
        } => {
            let store = open_store()?;
            let mut config = store.load_notification_config()?.unwrap_or_default();
            let changed = enabled.is_some()
                || haptics.is_some()
                || sound.is_some()
                || title.is_some()
                || body.is_some();
            if let Some(enabled) = enabled {
                config.enable_notifications = enabled;
            }
            if let Some(haptics) = haptics {
                config.enable_haptics = haptics;
            }
            if let Some(sound) = sound {
                config.notification_sound = sound;
            }
            if let Some(title) = title {
                config.notification_title = title;
            }
            if let Some(body) = body {
                config.notification_body = body;
            }
            if changed {
                store.save_notification_config(&config)?;
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
