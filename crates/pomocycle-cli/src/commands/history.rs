use super::open_quiet;
use crate::display::format_record;

pub fn run(limit: usize, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let pomodoro = open_quiet()?;
    let sessions = pomodoro.sessions();
    let recent = pomodoro.recent_sessions(limit);

    if json {
        println!("{}", serde_json::to_string_pretty(recent)?);
        return Ok(());
    }
    if recent.is_empty() {
        println!("no sessions recorded");
        return Ok(());
    }
    for record in recent {
        println!("{}", format_record(record));
    }
    if sessions.len() > recent.len() {
        println!("({} more)", sessions.len() - recent.len());
    }
    Ok(())
}

pub fn clear() -> Result<(), Box<dyn std::error::Error>> {
    open_quiet()?.clear_history();
    println!("history cleared");
    Ok(())
}
