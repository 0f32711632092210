use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Stderr,
    /// `<data_dir>/pomotec.log`, for when stderr belongs to the full-screen UI.
    File,
}

/// Install the global subscriber. `POMOTEC_LOG` overrides the `warn` default.
pub fn init(target: Target) {
    let filter = EnvFilter::try_from_env("POMOTEC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match target {
        Target::Stderr => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
        Target::File => {
            let file = pomotec_core::storage::data_dir().ok().and_then(|dir| {
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(dir.join("pomotec.log"))
                    .ok()
            });
            if let Some(file) = file {
                let _ = builder
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
            }
        }
    }
}
