use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default focus session length in minutes.
pub const DEFAULT_FOCUS_MIN: u64 = 25;
/// Default break session length in minutes.
pub const DEFAULT_BREAK_MIN: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    /// The phase that follows this one when its countdown reaches zero.
    pub fn next(self) -> Self {
        match self {
            Phase::Focus => Phase::Break,
            Phase::Break => Phase::Focus,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Focus => "focus",
            Phase::Break => "break",
        }
    }

    /// Human-readable label shown above the countdown.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Focus => "Focus time",
            Phase::Break => "Break time",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Length of each phase in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDurations {
    pub focus_min: u64,
    pub break_min: u64,
}

impl PhaseDurations {
    /// Build durations, rejecting zero-length phases.
    pub fn new(focus_min: u64, break_min: u64) -> Result<Self, ValidationError> {
        if focus_min == 0 {
            return Err(ValidationError::InvalidValue {
                field: "focus_min".into(),
                message: "must be at least 1 minute".into(),
            });
        }
        if break_min == 0 {
            return Err(ValidationError::InvalidValue {
                field: "break_min".into(),
                message: "must be at least 1 minute".into(),
            });
        }
        Ok(Self {
            focus_min,
            break_min,
        })
    }

    pub fn minutes(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Focus => self.focus_min,
            Phase::Break => self.break_min,
        }
    }

    /// Phase duration in milliseconds.
    ///
    /// Uses saturating arithmetic so absurd configured values cannot overflow.
    pub fn duration_ms(&self, phase: Phase) -> u64 {
        self.minutes(phase).saturating_mul(60).saturating_mul(1000)
    }

    pub fn duration_secs(&self, phase: Phase) -> u64 {
        self.minutes(phase).saturating_mul(60)
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            focus_min: DEFAULT_FOCUS_MIN,
            break_min: DEFAULT_BREAK_MIN,
        }
    }
}
