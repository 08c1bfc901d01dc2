//! Target-side file operations
//!
//! Writes go through a temp file in the destination directory and are
//! renamed into place, so a crash never leaves a half-written file.

use std::fs;
use std::io;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::domain::services::EntryKind;
use crate::error::{DeployError, DeployResult};

/// Create `path` as a directory unless it already is one.
///
/// A non-directory at `path` is a copy failure for `relative`.
pub fn ensure_dir(path: &Path, relative: &str) -> DeployResult<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(DeployError::CopyFailed {
            path: relative.to_string(),
            source: io::Error::new(
                io::ErrorKind::AlreadyExists,
                "a file exists where a directory is expected",
            ),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(path).map_err(|source| DeployError::CopyFailed {
                path: relative.to_string(),
                source,
            })
        }
        Err(source) => Err(DeployError::CopyFailed {
            path: relative.to_string(),
            source,
        }),
    }
}

/// Copy `src` over `dest` atomically with mode 0644.
///
/// Parent directories are created as needed. A directory at `dest` is a copy
/// failure. A symlink at `src` is recreated as a link, never followed.
pub fn copy_file(src: &Path, dest: &Path, relative: &str) -> DeployResult<()> {
    let fail = |source: io::Error| DeployError::CopyFailed {
        path: relative.to_string(),
        source,
    };

    if fs::symlink_metadata(dest).is_ok_and(|m| m.is_dir()) {
        return Err(fail(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "a directory exists where a file is expected",
        )));
    }

    let parent = dest
        .parent()
        .ok_or_else(|| fail(io::Error::new(io::ErrorKind::InvalidInput, "no parent directory")))?;
    fs::create_dir_all(parent).map_err(fail)?;

    if fs::symlink_metadata(src).map_err(fail)?.file_type().is_symlink() {
        return replace_with_link(src, dest).map_err(fail);
    }

    let mut reader = fs::File::open(src).map_err(fail)?;
    let mut temp = NamedTempFile::new_in(parent).map_err(fail)?;
    io::copy(&mut reader, temp.as_file_mut()).map_err(fail)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(temp.path(), fs::Permissions::from_mode(0o644)).map_err(fail)?;
    }

    temp.persist(dest).map_err(|e| fail(e.error))?;
    Ok(())
}

/// Point `dest` at the same target as the link at `src`.
pub(crate) fn replace_with_link(src: &Path, dest: &Path) -> io::Result<()> {
    let target = fs::read_link(src)?;
    match fs::remove_file(dest) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(&target, dest)
    }
    #[cfg(not(unix))]
    {
        let _ = target;
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "symbolic links are only supported on unix",
        ))
    }
}

/// Remove a file or an empty directory from the target.
///
/// Non-empty directories are left alone and reported as an error.
pub fn remove_entry(path: &Path, kind: EntryKind) -> io::Result<()> {
    match kind {
        EntryKind::File => fs::remove_file(path),
        EntryKind::Directory => fs::remove_dir(path),
    }
}
