use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, TimerState};

/// Every state change in the timer produces an Event.
/// The view model reacts to them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A phase began with a full countdown and the timer running.
    PhaseStarted {
        phase: Phase,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// A phase countdown reached zero.
    PhaseCompleted {
        phase: Phase,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerStarted {
        phase: Phase,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        phase: Phase,
        remaining_ms: u64,
        total_ms: u64,
        time_left: String,
        progress: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The phase that just started, if this is a `PhaseStarted` event.
    pub fn started_phase(&self) -> Option<Phase> {
        match self {
            Event::PhaseStarted { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}
