use std::io::Write;
use std::sync::Arc;

use pomocycle_core::runtime::{self, TimerHandle};
use pomocycle_core::{Event, Lifecycle, Pomodoro, Settings, Store, SystemClock};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use super::open_store;
use crate::display::render_event;
use crate::terminal::TerminalNotifier;

const HELP: &str = "commands: start (s), pause (p), reset (r), skip (k), status, bg, fg, quit (q)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Start,
    Pause,
    Reset,
    Skip,
    Status,
    Background,
    Foreground,
    Help,
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    match line.trim().to_ascii_lowercase().as_str() {
        "start" | "s" => Some(Input::Start),
        "pause" | "p" => Some(Input::Pause),
        "reset" | "r" => Some(Input::Reset),
        "skip" | "k" => Some(Input::Skip),
        "status" => Some(Input::Status),
        "bg" => Some(Input::Background),
        "fg" => Some(Input::Foreground),
        "help" | "?" => Some(Input::Help),
        "quit" | "q" | "exit" => Some(Input::Quit),
        _ => None,
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_interactive())
}

async fn run_interactive() -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let settings = Settings::load_or_default();
    let notification_config = store.load_notification_config().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "using default notification settings");
        None
    });
    let notifier = TerminalNotifier::new(notification_config.unwrap_or_default());

    let mut pomodoro = Pomodoro::new(store, Box::new(notifier), Arc::new(SystemClock))
        .with_feedback(settings.feedback)
        .on_session_complete(|session| tracing::info!(%session, "session complete"));
    pomodoro.request_permission();

    let (handle, task) = runtime::spawn(pomodoro);
    let mut events = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    print_event(&handle.snapshot().await?);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_input(&line) {
                    Some(Input::Quit) => break,
                    Some(input) => dispatch(&handle, input).await?,
                    None => println!("unknown command: {}. {HELP}", line.trim()),
                }
            }
            event = events.recv() => match event {
                Ok(event) => print_event(&event),
                Err(RecvError::Lagged(skipped)) => tracing::warn!(skipped, "display fell behind"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    handle.shutdown()?;
    let pomodoro = task.await?;
    println!("{} sessions recorded", pomodoro.sessions().len());
    Ok(())
}

async fn dispatch(handle: &TimerHandle, input: Input) -> Result<(), Box<dyn std::error::Error>> {
    match input {
        Input::Start => handle.start()?,
        Input::Pause => handle.pause()?,
        Input::Reset => handle.reset()?,
        Input::Skip => handle.skip()?,
        Input::Background => {
            handle.lifecycle(Lifecycle::Inactive)?;
            println!("backgrounded; an alert is scheduled if the timer is running");
        }
        Input::Foreground => handle.lifecycle(Lifecycle::Active)?,
        Input::Status => print_event(&handle.snapshot().await?),
        Input::Help => println!("{HELP}"),
        Input::Quit => {}
    }
    Ok(())
}

fn print_event(event: &Event) {
    let line = render_event(event);
    let mut stdout = std::io::stdout().lock();
    // Ticks overwrite each other in place.
    if matches!(event, Event::TimerTicked { .. }) {
        let _ = write!(stdout, "\r{line}   ");
    } else {
        let _ = writeln!(stdout, "\r{line}");
    }
    let _ = stdout.flush();
}
