//! Path utilities for dialog-broker data directories

use std::path::PathBuf;
use std::sync::OnceLock;

/// Global storage for custom data directory path
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Initialize the data directory with an optional custom path.
/// Must be called early in main() before any other path functions are used.
/// If custom_path is None, uses the default ~/.dialog-broker location.
pub fn init_data_dir(custom_path: Option<PathBuf>) {
    let path = custom_path.unwrap_or_else(default_data_dir);
    if DATA_DIR.set(path.clone()).is_err() {
        tracing::debug!(path = %path.display(), "Data directory already initialized");
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".dialog-broker"))
        .unwrap_or_else(|| PathBuf::from(".dialog-broker"))
}

/// Get the base data directory.
/// Returns the custom path if set via init_data_dir(), otherwise ~/.dialog-broker
pub fn data_dir() -> PathBuf {
    DATA_DIR.get().cloned().unwrap_or_else(default_data_dir)
}

/// Get the logs directory (~/.dialog-broker/logs)
pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Get the default log file path (~/.dialog-broker/logs/dialog-broker.log)
pub fn log_file_path() -> PathBuf {
    logs_dir().join("dialog-broker.log")
}

/// Get the config file path (~/.dialog-broker/config.toml)
pub fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}
