//! Full-screen terminal front end.

pub mod runtime;
pub mod view;

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use pomotec_core::{NotificationContent, Notifier, NotifyError, Permission};

/// Shows the latest notification inside the screen instead of on stderr,
/// which would tear the alternate screen.
#[derive(Debug, Clone, Default)]
pub struct BannerNotifier {
    latest: Arc<Mutex<Option<NotificationContent>>>,
}

impl BannerNotifier {
    pub fn latest(&self) -> Option<NotificationContent> {
        self.latest.lock().ok().and_then(|l| l.clone())
    }
}

impl Notifier for BannerNotifier {
    fn name(&self) -> &'static str {
        "banner"
    }

    fn permission(&self) -> Permission {
        Permission::Granted
    }

    fn post(&self, content: &NotificationContent) -> Result<(), NotifyError> {
        if let Ok(mut latest) = self.latest.lock() {
            *latest = Some(content.clone());
        }
        ring(&mut io::stdout())?;
        Ok(())
    }
}

/// Sound the terminal bell right away instead of with the next frame.
fn ring(out: &mut impl Write) -> io::Result<()> {
    out.write_all(b"\x07")?;
    out.flush()
}
