//! Archive extraction
//!
//! Unpacks a revision tarball into a staging directory and locates the single
//! wrapper directory GitHub puts around every archive (`<repo>-<ref>/`).

use std::fs;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use crate::error::{DeployError, DeployResult};

/// Extract `archive` into `stage_dir` and return the wrapper directory.
///
/// The archive file is removed after extraction. Any top-level layout other
/// than exactly one directory is a `MalformedArchive` error.
pub fn extract(archive: &Path, stage_dir: &Path) -> DeployResult<PathBuf> {
    fs::create_dir_all(stage_dir).map_err(|e| DeployError::io(stage_dir, e))?;

    let file = fs::File::open(archive).map_err(|e| DeployError::io(archive, e))?;
    let mut tarball = tar::Archive::new(GzDecoder::new(file));
    tarball.set_preserve_permissions(false);
    tarball
        .unpack(stage_dir)
        .map_err(|e| DeployError::MalformedArchive {
            reason: format!("could not unpack: {e}"),
        })?;

    if let Err(e) = fs::remove_file(archive) {
        tracing::warn!(path = %archive.display(), error = %e, "could not remove archive after extraction");
    }

    single_top_level_dir(stage_dir)
}

fn single_top_level_dir(stage_dir: &Path) -> DeployResult<PathBuf> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(stage_dir).map_err(|e| DeployError::io(stage_dir, e))? {
        let entry = entry.map_err(|e| DeployError::io(stage_dir, e))?;
        entries.push(entry);
    }

    match entries.as_slice() {
        [] => Err(DeployError::MalformedArchive {
            reason: "archive is empty".to_string(),
        }),
        [only] => {
            let is_dir = only
                .file_type()
                .map_err(|e| DeployError::io(only.path(), e))?
                .is_dir();
            if is_dir {
                tracing::debug!(root = %only.path().display(), "located staged root");
                Ok(only.path())
            } else {
                Err(DeployError::MalformedArchive {
                    reason: format!(
                        "top-level entry {} is not a directory",
                        only.file_name().to_string_lossy()
                    ),
                })
            }
        }
        many => Err(DeployError::MalformedArchive {
            reason: format!("expected one top-level directory, found {} entries", many.len()),
        }),
    }
}
