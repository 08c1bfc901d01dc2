//! Deploy Use Case
//!
//! Orchestrates one deployment run:
//! 1. Authorize the caller and resolve the revision
//! 2. Take the run lock on the target root
//! 3. Download and extract the archive into a private staging directory
//! 4. Plan from the staged tree
//! 5. Sync the plan into the target, backing up anything overwritten
//! 6. Prune target paths that are no longer in the source
//! 7. Clean up staging and release the lock
//!
//! Each step is a phase reported through the `DeployEventSink`. Staging and
//! the lock are RAII guards, so they are released on every exit path.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use subtle::ConstantTimeEq;

use crate::config::Config;
use crate::domain::policies::ExclusionSet;
use crate::domain::ports::{
    BackupStore, DeployEvent, DeployEventSink, DeployPhase, NoopEventSink, SourceProvider,
};
use crate::domain::services::{
    index_from_listing, plan_from_listing, prune_candidates, SyncAction, SyncPlan, TreeEntry,
};
use crate::domain::value_objects::RevisionSelector;
use crate::error::{DeployError, DeployResult};
use crate::infrastructure::archive;
use crate::infrastructure::fs::{
    copy_file, ensure_dir, list_tree, remove_entry, UnreadableEntry,
};
use crate::infrastructure::lock::RunLock;

use super::options::DeployRequest;
use super::result::{DeployReport, PruneEntryFailed};

const STAGING_PREFIX: &str = "sluice-stage-";
const STAGE_SUBDIR: &str = "stage";

/// Deploy use case - orchestrates the deployment flow
///
/// Parameterized by its ports so tests can substitute the archive source and
/// the backup store.
pub struct DeployUseCase<S, B>
where
    S: SourceProvider,
    B: BackupStore,
{
    config: Config,
    source: S,
    backup: B,
}

/// Reports phase transitions to the sink and the log
struct PhaseTracker {
    sink: Arc<dyn DeployEventSink>,
    current: DeployPhase,
}

impl PhaseTracker {
    fn new(sink: Arc<dyn DeployEventSink>) -> Self {
        Self {
            sink,
            current: DeployPhase::Idle,
        }
    }

    fn enter(&mut self, phase: DeployPhase) {
        tracing::info!(phase = %phase, from = %self.current, "deploy phase");
        self.current = phase;
        self.sink.on_event(DeployEvent::Phase(phase));
    }
}

impl<S, B> DeployUseCase<S, B>
where
    S: SourceProvider,
    B: BackupStore,
{
    pub fn new(config: Config, source: S, backup: B) -> Self {
        Self {
            config,
            source,
            backup,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute a deploy run without event reporting
    pub fn execute(&self, request: &DeployRequest) -> DeployResult<DeployReport> {
        self.execute_with_events(request, Arc::new(NoopEventSink))
    }

    /// Execute a deploy run, reporting progress to `sink`
    pub fn execute_with_events(
        &self,
        request: &DeployRequest,
        sink: Arc<dyn DeployEventSink>,
    ) -> DeployResult<DeployReport> {
        let mut tracker = PhaseTracker::new(sink.clone());

        match self.run(request, &sink, &mut tracker) {
            Ok(report) => {
                tracker.enter(DeployPhase::Done);
                sink.on_event(DeployEvent::Completed {
                    copied: if report.dry_run {
                        report.planned.iter().filter(|e| e.action == SyncAction::Copy).count()
                    } else {
                        report.copied.len()
                    },
                    pruned: if report.dry_run {
                        report.prune_candidates.len()
                    } else {
                        report.pruned.len()
                    },
                    prune_failures: report.prune_failures.len(),
                    dry_run: report.dry_run,
                });
                Ok(report)
            }
            Err(err) => {
                tracker.enter(DeployPhase::Failed);
                tracing::error!(error = %err, target_touched = err.target_touched(), "deploy failed");
                sink.on_event(DeployEvent::Failed {
                    message: err.to_string(),
                    target_touched: err.target_touched(),
                });
                Err(err)
            }
        }
    }

    fn run(
        &self,
        request: &DeployRequest,
        sink: &Arc<dyn DeployEventSink>,
        tracker: &mut PhaseTracker,
    ) -> DeployResult<DeployReport> {
        self.authorize(request.token.as_deref())?;
        self.config.validate()?;
        let selector = request.selector(&self.config)?;
        let root = self.config.root.as_path();

        tracker.enter(DeployPhase::Locking);
        let guard = RunLock::new(root).acquire()?;
        self.backup.begin_run();
        sink.on_event(DeployEvent::Started {
            revision: selector.to_string(),
            root: root.to_path_buf(),
        });

        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir()
            .map_err(|e| DeployError::io(std::env::temp_dir(), e))?;
        tracing::debug!(staging = %staging.path().display(), "created staging directory");

        let outcome = self.run_locked(&selector, request.dry_run, staging.path(), sink, tracker);

        tracker.enter(DeployPhase::CleaningUp);
        let staging_path = staging.path().to_path_buf();
        if let Err(e) = staging.close() {
            tracing::warn!(path = %staging_path.display(), error = %e, "could not remove staging directory");
        }
        drop(guard);

        outcome
    }

    /// Constant-time check of the presented token against the configured secret.
    fn authorize(&self, token: Option<&str>) -> DeployResult<()> {
        let expected = self
            .config
            .secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(DeployError::Unauthorized)?;
        let given = token.unwrap_or_default();
        if bool::from(given.as_bytes().ct_eq(expected.as_bytes())) {
            Ok(())
        } else {
            Err(DeployError::Unauthorized)
        }
    }

    fn run_locked(
        &self,
        selector: &RevisionSelector,
        dry_run: bool,
        staging: &Path,
        sink: &Arc<dyn DeployEventSink>,
        tracker: &mut PhaseTracker,
    ) -> DeployResult<DeployReport> {
        tracker.enter(DeployPhase::Fetching);
        let archive_path = self.source.fetch(selector, staging)?;
        let bytes = fs::metadata(&archive_path)
            .map_err(|e| DeployError::io(&archive_path, e))?
            .len();
        sink.on_event(DeployEvent::Downloaded { bytes });

        tracker.enter(DeployPhase::Staging);
        let staged_root = archive::extract(&archive_path, &staging.join(STAGE_SUBDIR))?;

        tracker.enter(DeployPhase::Indexing);
        let exclusions = self.config.effective_excludes();
        let listing = list_tree(&staged_root, &exclusions)?;
        if let Some(bad) = listing.unreadable.first() {
            return Err(DeployError::MalformedArchive {
                reason: format!("{}: {}", bad.path, bad.message),
            });
        }
        let plan = plan_from_listing(&listing.entries, &exclusions);
        let index = index_from_listing(&listing.entries, &exclusions);
        sink.on_event(DeployEvent::Planned {
            directories: plan.ensure_count(),
            files: plan.copy_count(),
        });

        let mut report = DeployReport::new(selector.to_string(), dry_run);

        if dry_run {
            report.planned = plan.entries().to_vec();
            if self.config.prune.enabled {
                let (candidates, unreadable) = self.stale_entries(&index, &exclusions)?;
                for entry in unreadable {
                    self.record_prune_failure(&entry.path, entry.message, sink, &mut report);
                }
                report.prune_candidates = candidates.into_iter().map(|e| e.relative_path).collect();
            }
            return Ok(report);
        }

        tracker.enter(DeployPhase::Syncing);
        self.sync(&plan, &staged_root, sink, &mut report)?;

        if self.config.prune.enabled {
            tracker.enter(DeployPhase::Pruning);
            self.prune(&index, &exclusions, sink, &mut report);
        }

        Ok(report)
    }

    fn sync(
        &self,
        plan: &SyncPlan,
        staged_root: &Path,
        sink: &Arc<dyn DeployEventSink>,
        report: &mut DeployReport,
    ) -> DeployResult<()> {
        let root = self.config.root.as_path();

        report.backup_snapshot = self.backup.snapshot_root();
        if let Some(snapshot) = &report.backup_snapshot {
            sink.on_event(DeployEvent::BackupLocation {
                snapshot: snapshot.clone(),
            });
        }

        for entry in plan.iter() {
            let rel = entry.relative_path.as_str();
            let dest = root.join(rel);
            match entry.action {
                SyncAction::Ensure => {
                    ensure_dir(&dest, rel)?;
                    report.ensured += 1;
                }
                SyncAction::Copy => {
                    let existing = fs::symlink_metadata(&dest).is_ok_and(|m| !m.is_dir());
                    if existing {
                        self.backup.snapshot_before_overwrite(&dest, rel)?;
                    }
                    copy_file(&staged_root.join(rel), &dest, rel)?;
                    tracing::debug!(path = rel, overwritten = existing, "copied");

                    report.copied.push(rel.to_string());
                    if existing {
                        report.overwritten.push(rel.to_string());
                    }
                    if sink.wants_detailed_events() {
                        sink.on_event(DeployEvent::FileCopied {
                            path: rel.to_string(),
                            backed_up: existing && report.backup_snapshot.is_some(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Target entries absent from the source, deepest first, plus the
    /// target entries that could not be read.
    fn stale_entries(
        &self,
        index: &BTreeSet<String>,
        exclusions: &ExclusionSet,
    ) -> DeployResult<(Vec<TreeEntry>, Vec<UnreadableEntry>)> {
        let target = list_tree(&self.config.root, exclusions)?;
        let candidates = prune_candidates(&target.entries, index, exclusions);
        Ok((candidates, target.unreadable))
    }

    /// Remove stale paths. Failures are recorded per entry and never abort the run.
    fn prune(
        &self,
        index: &BTreeSet<String>,
        exclusions: &ExclusionSet,
        sink: &Arc<dyn DeployEventSink>,
        report: &mut DeployReport,
    ) {
        let candidates = match self.stale_entries(index, exclusions) {
            Ok((candidates, unreadable)) => {
                for entry in unreadable {
                    self.record_prune_failure(&entry.path, entry.message, sink, report);
                }
                candidates
            }
            Err(e) => {
                self.record_prune_failure(".", e.to_string(), sink, report);
                return;
            }
        };

        let root = self.config.root.as_path();
        for entry in candidates {
            let rel = entry.relative_path.as_str();
            let abs = root.join(rel);

            if !entry.is_dir() {
                if let Err(e) = self.backup.snapshot_before_removal(&abs, rel) {
                    self.record_prune_failure(rel, e.to_string(), sink, report);
                    continue;
                }
            }

            match remove_entry(&abs, entry.kind) {
                Ok(()) => {
                    tracing::debug!(path = rel, "pruned");
                    report.pruned.push(rel.to_string());
                    if sink.wants_detailed_events() {
                        sink.on_event(DeployEvent::Pruned {
                            path: rel.to_string(),
                        });
                    }
                }
                Err(e) => self.record_prune_failure(rel, e.to_string(), sink, report),
            }
        }
    }

    fn record_prune_failure(
        &self,
        path: &str,
        message: String,
        sink: &Arc<dyn DeployEventSink>,
        report: &mut DeployReport,
    ) {
        tracing::warn!(path, error = %message, "could not prune");
        sink.on_event(DeployEvent::PruneFailed {
            path: path.to_string(),
            message: message.clone(),
        });
        report.prune_failures.push(PruneEntryFailed {
            path: path.to_string(),
            message,
        });
    }
}
