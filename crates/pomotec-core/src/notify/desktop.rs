use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use super::{NotificationAction, NotificationContent, Notifier, Permission, APP_NAME};
use crate::error::NotifyError;

/// Native desktop notifications.
///
/// On XDG desktops the notification server must be reachable for
/// permission to be granted, and action clicks are forwarded to the
/// channel given to [`DesktopNotifier::with_actions`].
///
/// Every post replaces the previous notification, so only the current
/// phase is ever on screen and only its actions are forwarded.
#[derive(Debug, Clone, Default)]
pub struct DesktopNotifier {
    sound: Option<String>,
    actions: Option<Sender<NotificationAction>>,
    shown: ShownSlot,
}

/// Server id of the notification on screen and a generation counter
/// bumped on every post.
#[derive(Debug, Clone, Default)]
struct ShownSlot {
    inner: Arc<Mutex<(Option<u32>, u64)>>,
}

#[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(dead_code))]
impl ShownSlot {
    /// Id the next notification should take over.
    fn replaces(&self) -> Option<u32> {
        self.inner.lock().ok().and_then(|slot| slot.0)
    }

    /// Record a freshly shown notification and return its generation.
    fn shown(&self, id: u32) -> u64 {
        match self.inner.lock() {
            Ok(mut slot) => {
                slot.0 = Some(id);
                slot.1 += 1;
                slot.1
            }
            Err(_) => 0,
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.inner
            .lock()
            .map(|slot| slot.1 == generation)
            .unwrap_or(false)
    }
}

impl DesktopNotifier {
    pub fn new(sound: Option<String>) -> Self {
        Self {
            sound,
            actions: None,
            shown: ShownSlot::default(),
        }
    }

    /// Forward clicked notification actions into `tx`.
    pub fn with_actions(mut self, tx: Sender<NotificationAction>) -> Self {
        self.actions = Some(tx);
        self
    }

    fn backend_error(e: impl std::fmt::Display) -> NotifyError {
        NotifyError::Backend {
            backend: "desktop",
            message: e.to_string(),
        }
    }
}

impl Notifier for DesktopNotifier {
    fn name(&self) -> &'static str {
        "desktop"
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    fn permission(&self) -> Permission {
        match notify_rust::get_server_information() {
            Ok(_) => Permission::Granted,
            Err(e) => {
                tracing::debug!(error = %e, "no notification server");
                Permission::Denied
            }
        }
    }

    #[cfg(not(all(unix, not(target_os = "macos"))))]
    fn permission(&self) -> Permission {
        Permission::Granted
    }

    fn post(&self, content: &NotificationContent) -> Result<(), NotifyError> {
        let mut notification = notify_rust::Notification::new();
        notification
            .appname(APP_NAME)
            .summary(&content.title)
            .body(&content.body);

        #[cfg(all(unix, not(target_os = "macos")))]
        {
            notification.urgency(match content.urgency {
                super::Urgency::High => notify_rust::Urgency::Critical,
                super::Urgency::Normal => notify_rust::Urgency::Normal,
            });
            if let Some(id) = self.shown.replaces() {
                notification.id(id);
            }
            if let Some(sound) = &self.sound {
                notification.sound_name(sound);
            }
            if self.actions.is_some() {
                for action in &content.actions {
                    notification.action(action.id(), action.label());
                }
            }
        }

        let handle = notification.show().map_err(Self::backend_error)?;

        #[cfg(all(unix, not(target_os = "macos")))]
        let generation = self.shown.shown(handle.id());
        #[cfg(all(unix, not(target_os = "macos")))]
        if let Some(tx) = self.actions.clone().filter(|_| !content.actions.is_empty()) {
            let shown = self.shown.clone();
            std::thread::spawn(move || {
                handle.wait_for_action(|id| {
                    if !shown.is_current(generation) {
                        tracing::debug!(action = id, "ignoring action from a replaced notification");
                        return;
                    }
                    if let Some(action) = NotificationAction::from_id(id) {
                        tracing::info!(action = id, "notification action clicked");
                        let _ = tx.send(action);
                    }
                });
            });
        }
        #[cfg(not(all(unix, not(target_os = "macos"))))]
        drop(handle);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_notification_takes_over_the_shown_id() {
        let slot = ShownSlot::default();
        assert_eq!(slot.replaces(), None);
        slot.shown(41);
        assert_eq!(slot.replaces(), Some(41));
    }

    #[test]
    fn only_the_latest_post_forwards_actions() {
        let notifier = DesktopNotifier::new(None);
        let first = notifier.shown.shown(7);
        let second = notifier.clone().shown.shown(7);
        assert!(!notifier.shown.is_current(first));
        assert!(notifier.shown.is_current(second));
    }
}
