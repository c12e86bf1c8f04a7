use chrono::{DateTime, Local};
use pomocycle_core::{Event, SessionRecord, SessionType};

/// `MM:SS`; minutes are not wrapped into hours.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn session_label(session: SessionType) -> &'static str {
    match session {
        SessionType::Work => "Focus",
        SessionType::ShortBreak => "Short Break",
        SessionType::LongBreak => "Long Break",
    }
}

pub fn format_record(record: &SessionRecord) -> String {
    let at: DateTime<Local> = record.completed_at.with_timezone(&Local);
    format!(
        "{}  {:<11}  {}  {}",
        at.format("%Y-%m-%d %H:%M"),
        session_label(record.session_type),
        format_clock(record.duration / 1000),
        if record.was_completed { "completed" } else { "skipped" },
    )
}

/// One status line per event.
pub fn render_event(event: &Event) -> String {
    match event {
        Event::TimerStarted {
            session,
            remaining_secs,
            resumed,
            ..
        } => format!(
            "{} {} ({} left)",
            if *resumed { "resumed" } else { "started" },
            session_label(*session),
            format_clock(*remaining_secs)
        ),
        Event::TimerPaused { remaining_secs, .. } => {
            format!("paused at {}", format_clock(*remaining_secs))
        }
        Event::TimerReset {
            session,
            remaining_secs,
            ..
        } => format!(
            "reset {} to {}",
            session_label(*session),
            format_clock(*remaining_secs)
        ),
        Event::TimerTicked {
            session,
            remaining_secs,
            progress_pct,
            ..
        } => progress_line(*session, *remaining_secs, *progress_pct),
        Event::SessionCompleted {
            record,
            next_session,
            session_count,
            ..
        } => format!(
            "{} complete (#{session_count} work sessions). Next: {}",
            session_label(record.session_type),
            session_label(*next_session)
        ),
        Event::SessionSkipped { from, to, .. } => {
            format!("skipped {}. Next: {}", session_label(*from), session_label(*to))
        }
        Event::SessionChanged {
            session,
            total_secs,
            ..
        } => format!(
            "now {} ({})",
            session_label(*session),
            format_clock(*total_secs)
        ),
        Event::HistoryCleared { .. } => "history cleared".to_string(),
        Event::StateSnapshot {
            state,
            session,
            session_count,
            remaining_secs,
            progress_pct,
            ..
        } => format!(
            "{} {:?}, {} work sessions done. {}",
            session_label(*session),
            state,
            session_count,
            progress_line(*session, *remaining_secs, *progress_pct)
        ),
    }
}

pub fn progress_line(session: SessionType, remaining_secs: u64, progress_pct: f64) -> String {
    format!(
        "[{}] {} ({:.0}%)",
        session,
        format_clock(remaining_secs),
        progress_pct
    )
}
