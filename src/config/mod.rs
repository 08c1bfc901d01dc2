//! Configuration module for Sluice
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (SLUICE_*)
//! 3. `--config` file, else `./sluice.toml`, else `~/.config/sluice/config.toml`
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

use std::path::PathBuf;

use thiserror::Error;

pub use loader::{with_env_overrides, ConfigWarning, CONFIG_FILE_NAME};
pub use types::{BackupConfig, Config, PruneConfig, RepoConfig};

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid value for '{key}': {message}")]
    Invalid { key: String, message: String },
}
