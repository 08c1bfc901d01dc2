//! Filesystem backup store
//!
//! Pre-images go to `<backup_dir>/bk_<YYYYmmdd_HHMMSS>/{overwritten,removed}/<rel>`.
//! Each run names its snapshot directory on first use and never reuses an
//! existing one: a second run within the same second gets a `_1`, `_2`, ...
//! suffix.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Local;

use crate::domain::ports::BackupStore;
use crate::error::{DeployError, DeployResult};
use crate::infrastructure::fs::replace_with_link;

const SNAPSHOT_PREFIX: &str = "bk_";
const OVERWRITTEN_DIR: &str = "overwritten";
const REMOVED_DIR: &str = "removed";

/// Backup store rooted at the configured backup directory
#[derive(Debug)]
pub struct FsBackupStore {
    backup_dir: PathBuf,
    snapshot: Mutex<Option<PathBuf>>,
}

impl FsBackupStore {
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_dir: backup_dir.into(),
            snapshot: Mutex::new(None),
        }
    }

    fn current(&self) -> MutexGuard<'_, Option<PathBuf>> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot directory for this run, named on first call.
    fn snapshot_dir(&self) -> PathBuf {
        self.current()
            .get_or_insert_with(|| next_snapshot_name(&self.backup_dir))
            .clone()
    }

    fn capture(&self, section: &str, absolute: &Path, relative: &str) -> DeployResult<()> {
        let dest = self.snapshot_dir().join(section).join(relative);
        let fail = |source: io::Error| DeployError::BackupFailed {
            path: relative.to_string(),
            source,
        };

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(fail)?;
        }
        let is_link = fs::symlink_metadata(absolute)
            .map_err(fail)?
            .file_type()
            .is_symlink();
        if is_link {
            replace_with_link(absolute, &dest).map_err(fail)?;
        } else {
            fs::copy(absolute, &dest).map_err(fail)?;
        }
        tracing::debug!(path = relative, backup = %dest.display(), "captured pre-image");
        Ok(())
    }
}

impl BackupStore for FsBackupStore {
    fn begin_run(&self) {
        *self.current() = None;
    }

    fn snapshot_root(&self) -> Option<PathBuf> {
        Some(self.snapshot_dir())
    }

    fn snapshot_before_overwrite(&self, absolute: &Path, relative: &str) -> DeployResult<()> {
        self.capture(OVERWRITTEN_DIR, absolute, relative)
    }

    fn snapshot_before_removal(&self, absolute: &Path, relative: &str) -> DeployResult<()> {
        self.capture(REMOVED_DIR, absolute, relative)
    }
}

fn next_snapshot_name(backup_dir: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let base = backup_dir.join(format!("{SNAPSHOT_PREFIX}{stamp}"));
    if !base.exists() {
        return base;
    }
    (1..)
        .map(|n| backup_dir.join(format!("{SNAPSHOT_PREFIX}{stamp}_{n}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(base)
}

/// Summary of one snapshot on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSummary {
    pub name: String,
    pub path: PathBuf,
    pub overwritten: usize,
    pub removed: usize,
}

/// List snapshots under `backup_dir`, newest first.
///
/// A missing backup directory lists as empty.
pub fn list_snapshots(backup_dir: &Path) -> DeployResult<Vec<SnapshotSummary>> {
    let read = match fs::read_dir(backup_dir) {
        Ok(read) => read,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(DeployError::io(backup_dir, e)),
    };

    let mut snapshots = Vec::new();
    for entry in read {
        let entry = entry.map_err(|e| DeployError::io(backup_dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();
        if !name.starts_with(SNAPSHOT_PREFIX) || !path.is_dir() {
            continue;
        }
        snapshots.push(SnapshotSummary {
            overwritten: count_files(&path.join(OVERWRITTEN_DIR)),
            removed: count_files(&path.join(REMOVED_DIR)),
            name,
            path,
        });
    }

    snapshots.sort_by(|a, b| snapshot_key(&b.name).cmp(&snapshot_key(&a.name)));
    Ok(snapshots)
}

/// Sort key: timestamp, then numeric suffix.
fn snapshot_key(name: &str) -> (String, u32) {
    let rest = name.trim_start_matches(SNAPSHOT_PREFIX);
    let mut parts = rest.splitn(3, '_');
    let date = parts.next().unwrap_or_default();
    let time = parts.next().unwrap_or_default();
    let suffix = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    (format!("{date}_{time}"), suffix)
}

fn count_files(dir: &Path) -> usize {
    let Ok(read) = fs::read_dir(dir) else {
        return 0;
    };
    read.filter_map(Result::ok)
        .map(|entry| match entry.file_type() {
            Ok(ft) if ft.is_dir() => count_files(&entry.path()),
            Ok(_) => 1,
            Err(_) => 0,
        })
        .sum()
}
