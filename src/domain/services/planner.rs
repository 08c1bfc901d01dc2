//! Sync planning service
//!
//! Pure domain logic for converging the target tree to the staged tree.
//! The planner works on tree listings and never touches the filesystem;
//! `infrastructure::fs::walk` produces the listings.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::domain::policies::{is_excluded, ExclusionSet};
use crate::domain::value_objects::path::{depth, is_within};

/// Kind of a tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Directory,
    File,
}

/// One path found while walking a tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreeEntry {
    /// Normalized `/`-separated path relative to the walked root
    pub relative_path: String,
    pub kind: EntryKind,
}

impl TreeEntry {
    pub fn dir(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            kind: EntryKind::Directory,
        }
    }

    pub fn file(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            kind: EntryKind::File,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// What to do with a planned path on the target side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Create the directory if absent
    Ensure,
    /// Back up any existing file, then write the staged bytes
    Copy,
}

/// A single planned operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEntry {
    pub relative_path: String,
    pub kind: EntryKind,
    pub action: SyncAction,
}

/// Ordered operations that converge the target to the staged tree.
///
/// A directory's `Ensure` always precedes every entry nested beneath it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    entries: Vec<SyncEntry>,
}

impl SyncPlan {
    pub fn entries(&self) -> &[SyncEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &SyncEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of files the plan will write
    pub fn copy_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.action == SyncAction::Copy)
            .count()
    }

    /// Number of directories the plan will ensure
    pub fn ensure_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.action == SyncAction::Ensure)
            .count()
    }
}

/// Segment-wise lexical order: a parent sorts before all of its descendants.
fn tree_order(a: &str, b: &str) -> Ordering {
    a.split('/').cmp(b.split('/'))
}

/// Build the sync plan from a listing of the staged tree.
///
/// Excluded entries are dropped. The listing is put in tree order first, so
/// the parent-before-child guarantee holds for any input order.
pub fn plan_from_listing(listing: &[TreeEntry], exclusions: &ExclusionSet) -> SyncPlan {
    let mut kept: Vec<&TreeEntry> = listing
        .iter()
        .filter(|e| !e.relative_path.is_empty())
        .filter(|e| !is_excluded(&e.relative_path, exclusions))
        .collect();
    kept.sort_by(|a, b| tree_order(&a.relative_path, &b.relative_path));
    kept.dedup_by(|a, b| a.relative_path == b.relative_path);

    let entries = kept
        .into_iter()
        .map(|e| SyncEntry {
            relative_path: e.relative_path.clone(),
            kind: e.kind,
            action: match e.kind {
                EntryKind::Directory => SyncAction::Ensure,
                EntryKind::File => SyncAction::Copy,
            },
        })
        .collect();

    SyncPlan { entries }
}

/// Set of relative paths present in the source, used to decide what to prune.
pub fn index_from_listing(listing: &[TreeEntry], exclusions: &ExclusionSet) -> BTreeSet<String> {
    listing
        .iter()
        .filter(|e| !e.relative_path.is_empty())
        .filter(|e| !is_excluded(&e.relative_path, exclusions))
        .map(|e| e.relative_path.clone())
        .collect()
}

/// Order for removal: deeper paths first, ties in reverse lexical order.
pub fn deepest_first(a: &str, b: &str) -> Ordering {
    depth(b).cmp(&depth(a)).then_with(|| b.cmp(a))
}

/// Target entries absent from the source index and not excluded, in removal order.
///
/// A directory holding an excluded entry is kept, since removing it could
/// never succeed.
pub fn prune_candidates(
    target_listing: &[TreeEntry],
    source_index: &BTreeSet<String>,
    exclusions: &ExclusionSet,
) -> Vec<TreeEntry> {
    let mut candidates: Vec<TreeEntry> = target_listing
        .iter()
        .filter(|e| !e.relative_path.is_empty())
        .filter(|e| !source_index.contains(&e.relative_path))
        .filter(|e| !is_excluded(&e.relative_path, exclusions))
        .filter(|e| !(e.is_dir() && holds_excluded(&e.relative_path, exclusions)))
        .cloned()
        .collect();
    candidates.sort_by(|a, b| deepest_first(&a.relative_path, &b.relative_path));
    candidates.dedup_by(|a, b| a.relative_path == b.relative_path);
    candidates
}

fn holds_excluded(dir: &str, exclusions: &ExclusionSet) -> bool {
    exclusions
        .entries()
        .iter()
        .any(|entry| entry != dir && is_within(entry, dir))
}
