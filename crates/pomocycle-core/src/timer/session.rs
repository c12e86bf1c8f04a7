use serde::{Deserialize, Serialize};

/// The three interval kinds of the Pomodoro cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionType {
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionType {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionType::Work => "work",
            SessionType::ShortBreak => "short-break",
            SessionType::LongBreak => "long-break",
        }
    }

    pub fn is_break(self) -> bool {
        !matches!(self, SessionType::Work)
    }

    /// Session that follows `self` once it has ended.
    ///
    /// `session_count` is the count of terminated work sessions *after* the
    /// increment for a just-ended work session. A zero interval never
    /// selects a long break.
    pub fn next_after(self, session_count: u32, long_break_interval: u32) -> SessionType {
        match self {
            SessionType::Work => {
                if long_break_interval != 0 && session_count % long_break_interval == 0 {
                    SessionType::LongBreak
                } else {
                    SessionType::ShortBreak
                }
            }
            SessionType::ShortBreak | SessionType::LongBreak => SessionType::Work,
        }
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(SessionType::Work),
            "short-break" => Ok(SessionType::ShortBreak),
            "long-break" => Ok(SessionType::LongBreak),
            other => Err(format!("unknown session type: {other}")),
        }
    }
}
