//! The periodic countdown driver.
//!
//! A cancellable 1-second repeating timer. Starting always drops the previous
//! interval first, so at most one is alive. The driver only decides *when*
//! to call `tick()`; how much time remains always comes from the deadline.

use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct TickDriver {
    period: Duration,
    interval: Option<Interval>,
}

impl TickDriver {
    pub fn new() -> Self {
        Self::with_period(TICK_INTERVAL)
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// (Re)start; the first tick fires one period from now.
    pub fn start(&mut self) {
        self.stop();
        let mut interval = time::interval_at(Instant::now() + self.period, self.period);
        // After a stall, fire once and realign instead of bursting.
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.interval = Some(interval);
    }

    pub fn stop(&mut self) {
        self.interval = None;
    }

    /// Start or stop so that the driver runs exactly when `wanted`.
    pub fn sync(&mut self, wanted: bool) {
        match (wanted, self.is_running()) {
            (true, false) => self.start(),
            (false, true) => self.stop(),
            _ => {}
        }
    }

    /// Resolves on the next tick; pends forever while stopped, which makes
    /// it safe to use as a `select!` branch.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

impl Default for TickDriver {
    fn default() -> Self {
        Self::new()
    }
}
