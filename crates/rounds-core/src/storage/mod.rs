mod config;
pub mod database;
pub mod migrations;
mod settings;

pub use config::{Config, LogConfig, SoundConfig, TimerConfig};
pub use database::Database;
pub use settings::{Settings, ThemeMode};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the directory holding the database and `config.toml`.
///
/// `ROUNDS_DATA_DIR` wins when set. Otherwise `~/.config/rounds[-dev]/`,
/// with the `-dev` suffix when `ROUNDS_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("ROUNDS_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("ROUNDS_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("rounds-dev")
            } else {
                base_dir.join("rounds")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
