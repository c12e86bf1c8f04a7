mod clock;
mod driver;
mod engine;
mod session;

pub use clock::{Clock, ManualClock, SystemClock};
pub use driver::{TickDriver, TICK_INTERVAL};
pub use engine::{TimerEngine, TimerState};
pub use session::SessionType;
