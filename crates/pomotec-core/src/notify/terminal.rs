use std::io::Write;

use super::{NotificationContent, Notifier, Permission, APP_NAME};
use crate::error::NotifyError;

/// Prints notifications to stderr, optionally ringing the terminal bell.
#[derive(Debug, Clone, Copy)]
pub struct TerminalNotifier {
    bell: bool,
}

impl TerminalNotifier {
    pub fn new(bell: bool) -> Self {
        Self { bell }
    }

    /// Render `content` the way it is written to the terminal.
    pub fn render(&self, content: &NotificationContent) -> String {
        let mut out = String::new();
        if self.bell {
            out.push('\x07');
        }
        out.push_str(&format!("[{APP_NAME}] {} ({})\n", content.title, content.summary));
        for line in content.body.lines() {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
        for action in &content.actions {
            out.push_str(&format!("  -> pomotec timer {}\n", action.id().replace('_', "-")));
        }
        out
    }
}

impl Notifier for TerminalNotifier {
    fn name(&self) -> &'static str {
        "terminal"
    }

    fn permission(&self) -> Permission {
        Permission::Granted
    }

    fn post(&self, content: &NotificationContent) -> Result<(), NotifyError> {
        let mut stderr = std::io::stderr().lock();
        stderr.write_all(self.render(content).as_bytes())?;
        stderr.flush()?;
        Ok(())
    }
}
