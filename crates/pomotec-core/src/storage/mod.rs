mod config;
pub mod database;

pub use config::{Config, NotificationBackend, NotificationsConfig, ScheduleConfig, UiConfig};
pub use database::{Database, SessionRecord, Stats};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/pomotec[-dev]/` based on POMOTEC_ENV.
///
/// Set POMOTEC_ENV=dev to use the development data directory, or
/// POMOTEC_CONFIG_DIR to use an explicit directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("POMOTEC_CONFIG_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("POMOTEC_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomotec-dev")
            } else {
                base_dir.join("pomotec")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
