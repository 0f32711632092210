//! # Pomotec Core Library
//!
//! Business logic for the Pomotec focus/break timer. Front ends (the
//! terminal screen and the one-shot CLI) are thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A wall-clock-based two-phase state machine that
//!   requires the caller to periodically invoke `tick()`
//! - **View Model**: Owns the engine, publishes observable UI state and
//!   posts a notification whenever a phase starts
//! - **Notifications**: Content builder plus desktop and terminal backends
//! - **Theme**: Light and dark colour palettes
//! - **Storage**: TOML configuration and SQLite session/state storage
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`PomodoroViewModel`]: UI-facing state and actions
//! - [`Notifier`]: Trait for notification backends
//! - [`Config`]: Application configuration management
//! - [`Database`]: Session and statistics persistence

pub mod error;
pub mod events;
pub mod notify;
pub mod storage;
pub mod theme;
pub mod timer;
pub mod viewmodel;

pub use error::{ConfigError, CoreError, DatabaseError, NotifyError, ValidationError};
pub use events::Event;
pub use notify::{
    DesktopNotifier, NoopNotifier, NotificationAction, NotificationContent, Notifier, Permission,
    TerminalNotifier,
};
pub use storage::{Config, Database, NotificationBackend, Stats};
pub use theme::{ColorScheme, Rgb, ThemeMode};
pub use timer::{format_time_left, Phase, PhaseDurations, TimerEngine, TimerState};
pub use viewmodel::{PomodoroViewModel, UiState, UserAction};

/// Build the notifier configured in `config`.
///
/// `actions` receives clicks on notification buttons where the desktop
/// backend supports them.
pub fn notifier_from_config(
    config: &Config,
    actions: Option<std::sync::mpsc::Sender<NotificationAction>>,
) -> Box<dyn Notifier> {
    if !config.notifications.enabled {
        return Box::new(NoopNotifier);
    }
    match config.notifications.backend {
        NotificationBackend::Terminal => Box::new(TerminalNotifier::new(config.notifications.bell)),
        NotificationBackend::Desktop => {
            let sound = Some(config.notifications.sound.clone()).filter(|s| !s.is_empty());
            let notifier = DesktopNotifier::new(sound);
            match actions {
                Some(tx) => Box::new(notifier.with_actions(tx)),
                None => Box::new(notifier),
            }
        }
    }
}
