//! Run lock
//!
//! One deployment per target root at a time. The lock is an advisory
//! exclusive lock on a sentinel file inside the root; the operating system
//! drops it when the holder exits, so a crashed run never leaves a stale lock.
//! The sentinel's contents (pid and start time) are informational only.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{DeployError, DeployResult};

/// Sentinel file created under the target root
pub const LOCK_FILE_NAME: &str = ".deploy.lock";

/// Lock over a target root
#[derive(Debug, Clone)]
pub struct RunLock {
    root: PathBuf,
    path: PathBuf,
}

impl RunLock {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let path = root.join(LOCK_FILE_NAME);
        Self { root, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Take the lock without waiting.
    ///
    /// Fails with `AlreadyRunning` when another holder has it.
    pub fn acquire(&self) -> DeployResult<RunLockGuard> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| DeployError::io(&self.path, e))?;

        if let Err(e) = FileExt::try_lock_exclusive(&file) {
            if is_contended(&e) {
                tracing::debug!(path = %self.path.display(), "lock held by another run");
                return Err(DeployError::AlreadyRunning {
                    root: self.root.clone(),
                });
            }
            return Err(DeployError::io(&self.path, e));
        }

        let stamp = format!(
            "pid={}\nstarted={}\n",
            std::process::id(),
            chrono::Utc::now().to_rfc3339()
        );
        let write = file
            .set_len(0)
            .and_then(|()| file.write_all(stamp.as_bytes()))
            .and_then(|()| file.flush());
        if let Err(e) = write {
            tracing::warn!(path = %self.path.display(), error = %e, "could not write lock stamp");
        }

        tracing::debug!(path = %self.path.display(), "lock acquired");
        Ok(RunLockGuard {
            file,
            path: self.path.clone(),
        })
    }
}

fn is_contended(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::WouldBlock
        || (err.raw_os_error().is_some()
            && err.raw_os_error() == fs2::lock_contended_error().raw_os_error())
}

/// Holds the lock until dropped
#[derive(Debug)]
pub struct RunLockGuard {
    file: File,
    path: PathBuf,
}

impl RunLockGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLockGuard {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), error = %e, "could not release lock");
        } else {
            tracing::debug!(path = %self.path.display(), "lock released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn second_acquire_fails_while_first_is_held() {
        let dir = tempdir().unwrap();
        let lock = RunLock::new(dir.path());

        let guard = lock.acquire().unwrap();
        let err = RunLock::new(dir.path()).acquire().unwrap_err();

        assert!(matches!(err, DeployError::AlreadyRunning { ref root } if root == dir.path()));
        drop(guard);
    }

    #[test]
    fn lock_is_released_on_drop() {
        let dir = tempdir().unwrap();
        let lock = RunLock::new(dir.path());

        drop(lock.acquire().unwrap());
        let _again = lock.acquire().unwrap();
        assert!(matches!(
            RunLock::new(dir.path()).acquire(),
            Err(DeployError::AlreadyRunning { .. })
        ));
    }

    #[test]
    fn stale_sentinel_does_not_block() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(LOCK_FILE_NAME), "pid=99999\n").unwrap();

        let _guard = RunLock::new(dir.path()).acquire().unwrap();
        let stamp = fs::read_to_string(dir.path().join(LOCK_FILE_NAME)).unwrap();
        assert!(stamp.starts_with(&format!("pid={}\n", std::process::id())));
    }

    #[test]
    fn missing_root_is_io_error() {
        let dir = tempdir().unwrap();
        let err = RunLock::new(dir.path().join("missing")).acquire().unwrap_err();
        assert!(matches!(err, DeployError::Io { .. }));
    }
}
