//! Source Provider Port
//!
//! Fetches one revision of a repository as an archive file.

use std::path::{Path, PathBuf};

use crate::domain::value_objects::RevisionSelector;
use crate::error::DeployResult;

/// Trait for archive sources
///
/// Implementations:
/// - GithubArchiveSource: streams a codeload tarball over HTTPS
/// - test doubles that copy a prepared archive
pub trait SourceProvider {
    /// Download the archive for `selector` into `dest_dir` and return its path.
    ///
    /// Fails with `DeployError::FetchFailed` and leaves no partial file behind.
    fn fetch(&self, selector: &RevisionSelector, dest_dir: &Path) -> DeployResult<PathBuf>;
}
