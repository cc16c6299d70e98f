//! Centralized path functions for all app storage locations.
//!
//! Single source of truth for where the config document and the store live.

use std::path::PathBuf;

/// App config root: `~/.config/proman/` (Linux) or `~/Library/Application Support/proman/` (macOS).
pub fn app_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("proman"))
}

/// Configuration document: `<app_config_dir>/config.toml`.
pub fn config_file_path() -> Option<PathBuf> {
    app_config_dir().map(|d| d.join("config.toml"))
}

/// Store file holding every bucket: `<app_config_dir>/store.db`.
pub fn store_path() -> Option<PathBuf> {
    app_config_dir().map(|d| d.join("store.db"))
}
