mod database;
mod settings;
mod snapshot;

pub use database::Database;
pub use settings::{NotificationSettings, RemoteSettings, Settings};
pub use snapshot::{MemoryStore, Snapshot, SnapshotStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `FOCUS_ENGINE_HOME` overrides the location outright. Otherwise it is
/// `~/.config/focus-engine[-dev]/`, with `FOCUS_ENGINE_ENV=dev` selecting
/// the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("FOCUS_ENGINE_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUS_ENGINE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focus-engine-dev")
            } else {
                base_dir.join("focus-engine")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
