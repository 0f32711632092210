//! Timer engine implementation.
//!
//! The timer engine is a wall-clock-based two-phase state machine. It does
//! not use internal threads - the caller is responsible for calling `tick()`
//! periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!           |
//!           +-- remaining hits 0 --> next phase, Running
//! reset() from anywhere --> Focus, Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(PhaseDurations::default());
//! engine.start_focus_session();
//! // In a loop:
//! for event in engine.tick() { /* PhaseCompleted / PhaseStarted */ }
//! ```

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::phase::{Phase, PhaseDurations};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Core timer engine.
///
/// Operates on wall-clock deltas -- no internal thread.
/// Every command has an `_at` twin taking the current epoch milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    durations: PhaseDurations,
    phase: Phase,
    state: TimerState,
    /// Full length of the current phase in milliseconds.
    total_ms: u64,
    /// Remaining time in milliseconds for the current phase.
    remaining_ms: u64,
    /// Timestamp (ms since epoch) of the last flush while running.
    #[serde(default)]
    last_tick_epoch_ms: Option<u64>,
}

impl TimerEngine {
    /// Create an idle engine at the start of a focus session.
    pub fn new(durations: PhaseDurations) -> Self {
        let total_ms = durations.duration_ms(Phase::Focus);
        Self {
            durations,
            phase: Phase::Focus,
            state: TimerState::Idle,
            total_ms,
            remaining_ms: total_ms,
            last_tick_epoch_ms: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn durations(&self) -> PhaseDurations {
        self.durations
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ms
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        if self.total_ms == 0 {
            return 0.0;
        }
        (1.0 - (self.remaining_ms as f64 / self.total_ms as f64)).clamp(0.0, 1.0)
    }

    /// Remaining time as `MM:SS`.
    pub fn time_left(&self) -> String {
        format_time_left(self.remaining_ms)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            phase: self.phase,
            remaining_ms: self.remaining_ms,
            total_ms: self.total_ms,
            time_left: self.time_left(),
            progress: self.progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start_focus_session(&mut self) -> Option<Event> {
        self.start_focus_session_at(now_ms())
    }

    /// Begin a fresh focus session, discarding whatever was in progress.
    pub fn start_focus_session_at(&mut self, now: u64) -> Option<Event> {
        Some(self.begin_phase(Phase::Focus, now))
    }

    pub fn start(&mut self) -> Option<Event> {
        self.start_at(now_ms())
    }

    /// Start or resume the current countdown from where it stands.
    pub fn start_at(&mut self, now: u64) -> Option<Event> {
        match self.state {
            TimerState::Idle => {
                self.state = TimerState::Running;
                self.last_tick_epoch_ms = Some(now);
                Some(Event::TimerStarted {
                    phase: self.phase,
                    remaining_ms: self.remaining_ms,
                    at: epoch_to_utc(now),
                })
            }
            TimerState::Paused => {
                self.state = TimerState::Running;
                self.last_tick_epoch_ms = Some(now);
                Some(Event::TimerResumed {
                    remaining_ms: self.remaining_ms,
                    at: epoch_to_utc(now),
                })
            }
            TimerState::Running => None, // Already running.
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.pause_at(now_ms())
    }

    pub fn pause_at(&mut self, now: u64) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        // Flush elapsed time first. A phase that ran out stays at zero
        // until the next tick after resuming.
        if let Some(last) = self.last_tick_epoch_ms {
            let elapsed = now.saturating_sub(last);
            self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
        }
        self.state = TimerState::Paused;
        self.last_tick_epoch_ms = None;
        Some(Event::TimerPaused {
            remaining_ms: self.remaining_ms,
            at: epoch_to_utc(now),
        })
    }

    /// Return to an idle, untouched focus session.
    pub fn reset(&mut self) -> Option<Event> {
        self.phase = Phase::Focus;
        self.state = TimerState::Idle;
        self.total_ms = self.durations.duration_ms(Phase::Focus);
        self.remaining_ms = self.total_ms;
        self.last_tick_epoch_ms = None;
        Some(Event::TimerReset { at: Utc::now() })
    }

    pub fn skip_break(&mut self) -> Option<Event> {
        self.skip_break_at(now_ms())
    }

    /// Cut the current break short and start focusing. No-op during focus.
    pub fn skip_break_at(&mut self, now: u64) -> Option<Event> {
        match self.phase {
            Phase::Break => self.start_focus_session_at(now),
            Phase::Focus => None,
        }
    }

    pub fn tick(&mut self) -> Vec<Event> {
        self.tick_at(now_ms())
    }

    /// Advance the countdown to `now`.
    ///
    /// When a phase runs out the engine flips to the other phase and keeps
    /// running. Time left over past the end of a phase is carried into the
    /// next, so a late tick lands where a punctual one would have.
    pub fn tick_at(&mut self, now: u64) -> Vec<Event> {
        if self.state != TimerState::Running {
            return Vec::new();
        }
        let mut elapsed = match self.last_tick_epoch_ms {
            Some(last) => now.saturating_sub(last),
            None => 0,
        };
        self.last_tick_epoch_ms = Some(now);

        // Whole focus+break cycles produce no observable change; drop them
        // so a tick after a long suspension does bounded work.
        let cycle_ms = self
            .durations
            .duration_ms(Phase::Focus)
            .saturating_add(self.durations.duration_ms(Phase::Break));
        if cycle_ms > 0 && elapsed > self.remaining_ms.saturating_add(cycle_ms) {
            let skipped = (elapsed - self.remaining_ms) / cycle_ms;
            tracing::debug!(skipped, "dropping whole cycles from stale tick");
            elapsed -= skipped * cycle_ms;
        }

        // Instant up to which time has been accounted for. Each phase
        // boundary is stamped with the moment it actually passed.
        let mut cursor = now - elapsed;
        let mut events = Vec::new();
        loop {
            if elapsed < self.remaining_ms {
                self.remaining_ms -= elapsed;
                break;
            }
            elapsed -= self.remaining_ms;
            cursor += self.remaining_ms;
            self.remaining_ms = 0;
            let finished = self.phase;
            events.push(Event::PhaseCompleted {
                phase: finished,
                duration_secs: self.total_ms / 1000,
                at: epoch_to_utc(cursor),
            });
            events.push(self.begin_phase(finished.next(), cursor));
            if self.total_ms == 0 {
                break;
            }
        }
        self.last_tick_epoch_ms = Some(now);
        events
    }

    /// Replace phase lengths. The engine is reset so totals stay consistent.
    pub fn set_durations(&mut self, durations: PhaseDurations) {
        self.durations = durations;
        self.reset();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin_phase(&mut self, phase: Phase, now: u64) -> Event {
        self.phase = phase;
        self.total_ms = self.durations.duration_ms(phase);
        self.remaining_ms = self.total_ms;
        self.state = TimerState::Running;
        self.last_tick_epoch_ms = Some(now);
        Event::PhaseStarted {
            phase,
            duration_secs: self.durations.duration_secs(phase),
            at: epoch_to_utc(now),
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(PhaseDurations::default())
    }
}

/// Format milliseconds as zero-padded `MM:SS`, truncating partial seconds.
pub fn format_time_left(remaining_ms: u64) -> String {
    let secs = remaining_ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn epoch_to_utc(ms: u64) -> DateTime<Utc> {
    i64::try_from(ms)
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .unwrap_or_else(Utc::now)
}

pub(crate) fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
