//! Phase-start notifications.
//!
//! [`NotificationContent`] describes what to show; a [`Notifier`] backend
//! shows it. [`dispatch`] is the single entry point the view model uses:
//! it checks permission first and never lets a delivery failure escape.

mod desktop;
mod terminal;

pub use desktop::DesktopNotifier;
pub use terminal::TerminalNotifier;

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::NotifyError;
use crate::theme::Rgb;
use crate::timer::Phase;

pub const APP_NAME: &str = "Pomotec";

/// An action button attached to a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationAction {
    SkipBreak,
}

impl NotificationAction {
    pub fn id(self) -> &'static str {
        match self {
            NotificationAction::SkipBreak => "skip_break",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NotificationAction::SkipBreak => "Skip break",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "skip_break" => Some(NotificationAction::SkipBreak),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Normal,
    High,
}

/// Whether the platform lets us post notifications right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub phase: Phase,
    pub title: String,
    pub body: String,
    pub summary: String,
    pub color: Rgb,
    pub urgency: Urgency,
    pub actions: Vec<NotificationAction>,
}

impl NotificationContent {
    /// Build the notification announcing that `phase` has started.
    ///
    /// `time_left` is the `MM:SS` countdown at the moment of posting;
    /// `00:00` is shown as "Finished".
    pub fn for_phase(phase: Phase, time_left: &str) -> Self {
        let shown = if time_left == "00:00" {
            "Finished"
        } else {
            time_left
        };
        let (title, lines, color) = match phase {
            Phase::Focus => (
                "🎯 Focus time!",
                ["💪 Keep your attention on the task!", "🎯 You are in focus mode"],
                Rgb(178, 34, 34),
            ),
            Phase::Break => (
                "☕ Break time!",
                ["🌟 Good work! Take a breather", "🧘 Use it to stretch"],
                Rgb(46, 139, 87),
            ),
        };
        let actions = match phase {
            Phase::Break => vec![NotificationAction::SkipBreak],
            Phase::Focus => Vec::new(),
        };
        Self {
            phase,
            title: title.to_string(),
            body: format!("⏰ Time left: {shown}\n{}\n{}", lines[0], lines[1]),
            summary: "Pomodoro active".to_string(),
            color,
            urgency: Urgency::High,
            actions,
        }
    }
}

/// A notification backend.
pub trait Notifier {
    /// Short backend name used in logs and errors.
    fn name(&self) -> &'static str;

    fn permission(&self) -> Permission;

    fn post(&self, content: &NotificationContent) -> Result<(), NotifyError>;
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn permission(&self) -> Permission {
        (**self).permission()
    }

    fn post(&self, content: &NotificationContent) -> Result<(), NotifyError> {
        (**self).post(content)
    }
}

/// Outcome of a [`dispatch`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Posted,
    /// Permission was missing; nothing was shown.
    Skipped,
    /// The backend failed; the error was logged.
    Failed,
}

/// Post `content` through `notifier` if permitted.
pub fn dispatch<N: Notifier + ?Sized>(notifier: &N, content: &NotificationContent) -> Delivery {
    if notifier.permission() == Permission::Denied {
        tracing::debug!(backend = notifier.name(), phase = %content.phase, "notification permission missing, skipping");
        return Delivery::Skipped;
    }
    match notifier.post(content) {
        Ok(()) => {
            tracing::debug!(backend = notifier.name(), phase = %content.phase, "notification posted");
            Delivery::Posted
        }
        Err(e) => {
            tracing::warn!(backend = notifier.name(), error = %e, "failed to post notification");
            Delivery::Failed
        }
    }
}

/// Backend that never has permission. Used when notifications are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn permission(&self) -> Permission {
        Permission::Denied
    }

    fn post(&self, _content: &NotificationContent) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// In-memory backend that keeps every posted notification.
#[derive(Debug, Clone)]
pub struct RecordingNotifier {
    permission: Permission,
    posted: Arc<Mutex<Vec<NotificationContent>>>,
}

impl RecordingNotifier {
    pub fn new(permission: Permission) -> Self {
        Self {
            permission,
            posted: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn posted(&self) -> Vec<NotificationContent> {
        self.posted.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn permission(&self) -> Permission {
        self.permission
    }

    fn post(&self, content: &NotificationContent) -> Result<(), NotifyError> {
        let mut posted = self.posted.lock().map_err(|e| NotifyError::Backend {
            backend: "recording",
            message: e.to_string(),
        })?;
        posted.push(content.clone());
        Ok(())
    }
}
