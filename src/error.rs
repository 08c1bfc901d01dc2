//! Error types for Sluice
//!
//! Uses `thiserror` for library errors. The binary maps each variant to a
//! distinct exit code so callers can tell "nothing happened" apart from
//! "partially applied".

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for Sluice operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Main error type for a deployment run
#[derive(Error, Debug)]
pub enum DeployError {
    /// Shared secret missing or wrong
    #[error("unauthorized: deploy token missing or invalid")]
    Unauthorized,

    /// Another run holds the lock on this target
    #[error("deployment already running for {root}; try again later")]
    AlreadyRunning { root: PathBuf },

    /// Archive download failed
    #[error("download failed ({}): {message}", fmt_status(.status))]
    FetchFailed {
        status: Option<u16>,
        message: String,
    },

    /// Extracted archive does not have the expected single wrapper directory
    #[error("unexpected archive structure: {reason}")]
    MalformedArchive { reason: String },

    /// A staged file could not be written to the target
    #[error("copy failed: {path}: {source}")]
    CopyFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A pre-image could not be written to the backup snapshot
    #[error("backup failed: {path}: {source}")]
    BackupFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Any other filesystem failure
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn fmt_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "no status".to_string(),
    }
}

impl DeployError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DeployError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the live tree may have been modified before this error.
    pub fn target_touched(&self) -> bool {
        matches!(
            self,
            DeployError::CopyFailed { .. } | DeployError::BackupFailed { .. }
        )
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            DeployError::Config(_) => 2,
            DeployError::Unauthorized => 3,
            DeployError::AlreadyRunning { .. } => 4,
            DeployError::FetchFailed { .. } => 5,
            DeployError::MalformedArchive { .. } => 6,
            DeployError::CopyFailed { .. } | DeployError::BackupFailed { .. } => 7,
            DeployError::Io { .. } => 8,
        }
    }
}
