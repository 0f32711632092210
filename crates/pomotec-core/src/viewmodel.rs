//! View model between the timer engine and whatever draws it.
//!
//! The view model owns the [`TimerEngine`] and a notifier, exposes the
//! user actions, and publishes an observable [`UiState`] through a
//! `tokio::sync::watch` channel after every change.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::events::Event;
use crate::notify::{self, NotificationAction, NotificationContent, Notifier};
use crate::theme::ThemeMode;
use crate::timer::{Phase, PhaseDurations, TimerEngine};

/// Everything the screen needs to render one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiState {
    pub time_left: String,
    pub is_running: bool,
    pub phase: Phase,
    pub skip_break_visible: bool,
    /// 0.0 .. 1.0 within the current phase.
    pub progress: f64,
    pub progress_pct: u8,
    pub theme: ThemeMode,
}

impl UiState {
    fn from_engine(engine: &TimerEngine, theme: ThemeMode) -> Self {
        let progress = engine.progress();
        Self {
            time_left: engine.time_left(),
            is_running: engine.is_running(),
            phase: engine.phase(),
            skip_break_visible: engine.phase() == Phase::Break,
            progress,
            progress_pct: (progress * 100.0).floor() as u8,
            theme,
        }
    }
}

/// Something the user (or a notification button) asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    StartFocus,
    Resume,
    Pause,
    Reset,
    SkipBreak,
    ToggleTheme,
}

impl From<NotificationAction> for UserAction {
    fn from(action: NotificationAction) -> Self {
        match action {
            NotificationAction::SkipBreak => UserAction::SkipBreak,
        }
    }
}

pub struct PomodoroViewModel<N: Notifier> {
    engine: TimerEngine,
    notifier: N,
    theme: ThemeMode,
    state_tx: watch::Sender<UiState>,
}

impl<N: Notifier> PomodoroViewModel<N> {
    pub fn new(durations: PhaseDurations, theme: ThemeMode, notifier: N) -> Self {
        Self::with_engine(TimerEngine::new(durations), theme, notifier)
    }

    /// Wrap an existing engine, e.g. one restored from storage.
    pub fn with_engine(engine: TimerEngine, theme: ThemeMode, notifier: N) -> Self {
        let (state_tx, _) = watch::channel(UiState::from_engine(&engine, theme));
        Self {
            engine,
            notifier,
            theme,
            state_tx,
        }
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state_tx.subscribe()
    }

    /// The most recently published state.
    pub fn state(&self) -> UiState {
        self.state_tx.borrow().clone()
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    // ── Actions ──────────────────────────────────────────────────────

    pub fn start_focus_session(&mut self) -> Vec<Event> {
        let events: Vec<Event> = self.engine.start_focus_session().into_iter().collect();
        self.apply(events)
    }

    /// Resume (or start) the countdown without resetting it.
    pub fn start_timer(&mut self) -> Vec<Event> {
        let events: Vec<Event> = self.engine.start().into_iter().collect();
        self.apply(events)
    }

    pub fn pause_timer(&mut self) -> Vec<Event> {
        let events: Vec<Event> = self.engine.pause().into_iter().collect();
        self.apply(events)
    }

    pub fn reset_timer(&mut self) -> Vec<Event> {
        let events: Vec<Event> = self.engine.reset().into_iter().collect();
        self.apply(events)
    }

    pub fn skip_break(&mut self) -> Vec<Event> {
        let events: Vec<Event> = self.engine.skip_break().into_iter().collect();
        self.apply(events)
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.theme = self.theme.toggled();
        self.publish();
        self.theme
    }

    /// Periodic tick callback.
    pub fn tick(&mut self) -> Vec<Event> {
        let events = self.engine.tick();
        self.apply(events)
    }

    pub fn dispatch(&mut self, action: UserAction) -> Vec<Event> {
        tracing::debug!(?action, "user action");
        match action {
            UserAction::StartFocus => self.start_focus_session(),
            UserAction::Resume => self.start_timer(),
            UserAction::Pause => self.pause_timer(),
            UserAction::Reset => self.reset_timer(),
            UserAction::SkipBreak => self.skip_break(),
            UserAction::ToggleTheme => {
                self.toggle_theme();
                Vec::new()
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Publish state for `events`, then notify for the last phase start.
    pub(crate) fn apply(&mut self, events: Vec<Event>) -> Vec<Event> {
        self.publish();
        if let Some(phase) = events.iter().rev().find_map(Event::started_phase) {
            tracing::info!(%phase, "phase started");
            let content = NotificationContent::for_phase(phase, &self.engine.time_left());
            notify::dispatch(&self.notifier, &content);
        }
        events
    }

    fn publish(&self) {
        let next = UiState::from_engine(&self.engine, self.theme);
        self.state_tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}
