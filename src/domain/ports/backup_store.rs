//! Backup Store Port
//!
//! Captures the current bytes of a target file before it is overwritten or
//! removed.

use std::path::{Path, PathBuf};

use crate::error::DeployResult;

pub trait BackupStore {
    /// Start a new run. Pre-images captured afterwards go to a fresh
    /// snapshot, never into one an earlier run wrote.
    fn begin_run(&self) {}

    /// Snapshot directory for this run, or `None` when backups are disabled.
    fn snapshot_root(&self) -> Option<PathBuf>;

    /// Store a pre-image under `overwritten/<relative>`.
    fn snapshot_before_overwrite(&self, absolute: &Path, relative: &str) -> DeployResult<()>;

    /// Store a pre-image under `removed/<relative>`.
    fn snapshot_before_removal(&self, absolute: &Path, relative: &str) -> DeployResult<()>;
}

/// Backup store used when backups are disabled
pub struct NoopBackupStore;

impl BackupStore for NoopBackupStore {
    fn snapshot_root(&self) -> Option<PathBuf> {
        None
    }

    fn snapshot_before_overwrite(&self, _absolute: &Path, _relative: &str) -> DeployResult<()> {
        Ok(())
    }

    fn snapshot_before_removal(&self, _absolute: &Path, _relative: &str) -> DeployResult<()> {
        Ok(())
    }
}

impl<T: BackupStore + ?Sized> BackupStore for Box<T> {
    fn begin_run(&self) {
        (**self).begin_run()
    }

    fn snapshot_root(&self) -> Option<PathBuf> {
        (**self).snapshot_root()
    }

    fn snapshot_before_overwrite(&self, absolute: &Path, relative: &str) -> DeployResult<()> {
        (**self).snapshot_before_overwrite(absolute, relative)
    }

    fn snapshot_before_removal(&self, absolute: &Path, relative: &str) -> DeployResult<()> {
        (**self).snapshot_before_removal(absolute, relative)
    }
}
