//! Deploy Report
//!
//! What a run did (or, for a dry run, would do).

use std::path::PathBuf;

use crate::domain::services::SyncEntry;

/// A stale path that could not be pruned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneEntryFailed {
    pub path: String,
    pub message: String,
}

/// Outcome of a deploy run
#[derive(Debug, Clone, Default)]
pub struct DeployReport {
    /// Resolved revision, `owner/repo @ ref`
    pub revision: String,
    /// Files written to the target
    pub copied: Vec<String>,
    /// Subset of `copied` that replaced an existing file
    pub overwritten: Vec<String>,
    /// Directories ensured
    pub ensured: usize,
    /// Paths removed from the target
    pub pruned: Vec<String>,
    /// Paths that could not be removed
    pub prune_failures: Vec<PruneEntryFailed>,
    /// Snapshot directory for this run, when backups are enabled
    pub backup_snapshot: Option<PathBuf>,
    pub dry_run: bool,
    /// Planned entries (dry run only)
    pub planned: Vec<SyncEntry>,
    /// Paths that would be pruned (dry run only)
    pub prune_candidates: Vec<String>,
}

impl DeployReport {
    pub fn new(revision: impl Into<String>, dry_run: bool) -> Self {
        Self {
            revision: revision.into(),
            dry_run,
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.prune_failures.is_empty()
    }

    pub fn has_changes(&self) -> bool {
        !self.copied.is_empty() || !self.pruned.is_empty()
    }
}
