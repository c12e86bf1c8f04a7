//! Background task that owns a [`Pomodoro`] and its tick driver.
//!
//! All commands, ticks and lifecycle notifications are processed one at a
//! time on a single task, so a stale tick can never land after a pause or
//! reset has been applied. After each step the driver is reconciled with
//! [`Pomodoro::wants_driver`]: it runs exactly while the timer is running and
//! the host is active.

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::notify::CompletionFeedback;
use crate::pomodoro::Pomodoro;
use crate::storage::{SessionRecord, TimerConfigPatch};
use crate::suspension::Lifecycle;
use crate::timer::{SessionType, TickDriver};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug)]
enum Command {
    Start,
    Pause,
    Reset,
    Skip,
    UpdateConfig(TimerConfigPatch),
    SetSession(SessionType),
    SetFeedback(CompletionFeedback),
    ClearHistory,
    Lifecycle(Lifecycle),
    Snapshot(oneshot::Sender<Event>),
    Sessions(oneshot::Sender<Vec<SessionRecord>>),
    Shutdown,
}

/// Cloneable handle to a running timer task.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    commands: mpsc::UnboundedSender<Command>,
    events: broadcast::Sender<Event>,
}

/// Move `pomodoro` onto a new task driven by a 1-second [`TickDriver`].
///
/// The join handle yields the `Pomodoro` back once the task shuts down.
pub fn spawn(pomodoro: Pomodoro) -> (TimerHandle, JoinHandle<Pomodoro>) {
    spawn_with_driver(pomodoro, TickDriver::new())
}

pub fn spawn_with_driver(
    pomodoro: Pomodoro,
    driver: TickDriver,
) -> (TimerHandle, JoinHandle<Pomodoro>) {
    let (commands, rx) = mpsc::unbounded_channel();
    let (events, _) = broadcast::channel(EVENT_CAPACITY);
    let task = tokio::spawn(run(pomodoro, driver, rx, events.clone()));
    (TimerHandle { commands, events }, task)
}

impl TimerHandle {
    /// Receive every event emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub fn start(&self) -> Result<()> {
        self.send(Command::Start)
    }

    pub fn pause(&self) -> Result<()> {
        self.send(Command::Pause)
    }

    pub fn reset(&self) -> Result<()> {
        self.send(Command::Reset)
    }

    pub fn skip(&self) -> Result<()> {
        self.send(Command::Skip)
    }

    pub fn update_config(&self, patch: TimerConfigPatch) -> Result<()> {
        self.send(Command::UpdateConfig(patch))
    }

    pub fn set_session(&self, session: SessionType) -> Result<()> {
        self.send(Command::SetSession(session))
    }

    pub fn set_feedback(&self, feedback: CompletionFeedback) -> Result<()> {
        self.send(Command::SetFeedback(feedback))
    }

    pub fn clear_history(&self) -> Result<()> {
        self.send(Command::ClearHistory)
    }

    pub fn lifecycle(&self, lifecycle: Lifecycle) -> Result<()> {
        self.send(Command::Lifecycle(lifecycle))
    }

    /// Current state as a `StateSnapshot` event.
    pub async fn snapshot(&self) -> Result<Event> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx))?;
        rx.await.map_err(|_| CoreError::RuntimeStopped)
    }

    /// Session history, newest first.
    pub async fn sessions(&self) -> Result<Vec<SessionRecord>> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Sessions(tx))?;
        rx.await.map_err(|_| CoreError::RuntimeStopped)
    }

    /// Ask the task to stop. Await its join handle to get the timer back.
    pub fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown)
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| CoreError::RuntimeStopped)
    }
}

async fn run(
    mut pomodoro: Pomodoro,
    mut driver: TickDriver,
    mut commands: mpsc::UnboundedReceiver<Command>,
    events: broadcast::Sender<Event>,
) -> Pomodoro {
    tracing::debug!("timer runtime started");
    driver.sync(pomodoro.wants_driver());
    loop {
        let event = tokio::select! {
            biased;
            command = commands.recv() => {
                let Some(command) = command else { break };
                match command {
                    Command::Shutdown => break,
                    command => apply(&mut pomodoro, command),
                }
            }
            () = driver.tick() => pomodoro.tick(),
        };
        driver.sync(pomodoro.wants_driver());
        if let Some(event) = event {
            // No subscribers is fine.
            let _ = events.send(event);
        }
    }
    driver.stop();
    tracing::debug!("timer runtime stopped");
    pomodoro
}

fn apply(pomodoro: &mut Pomodoro, command: Command) -> Option<Event> {
    match command {
        Command::Start => pomodoro.start_timer(),
        Command::Pause => pomodoro.pause_timer(),
        Command::Reset => pomodoro.reset_timer(),
        Command::Skip => pomodoro.skip_session(),
        Command::UpdateConfig(patch) => pomodoro.update_config(patch),
        Command::SetSession(session) => pomodoro.set_session(session),
        Command::SetFeedback(feedback) => {
            pomodoro.set_feedback(feedback);
            None
        }
        Command::ClearHistory => pomodoro.clear_history(),
        Command::Lifecycle(lifecycle) => pomodoro.handle_lifecycle(lifecycle),
        Command::Snapshot(reply) => {
            let _ = reply.send(pomodoro.snapshot());
            None
        }
        Command::Sessions(reply) => {
            let _ = reply.send(pomodoro.sessions().to_vec());
            None
        }
        Command::Shutdown => None,
    }
}
