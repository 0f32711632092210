mod engine;
mod phase;

pub use engine::{format_time_left, TimerEngine, TimerState};
#[cfg(test)]
pub(crate) use engine::now_ms;
pub use phase::{Phase, PhaseDurations, DEFAULT_BREAK_MIN, DEFAULT_FOCUS_MIN};
