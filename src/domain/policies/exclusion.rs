//! Exclusion Policy
//!
//! Decides which relative paths under the target root are local-only and must
//! never be copied over, backed up, or pruned.

use crate::domain::value_objects::path::{is_within, normalize_relative};

/// Normalized set of excluded relative paths.
///
/// Each entry excludes itself and everything nested beneath it. Entries are
/// compared segment-wise, so `foo` does not exclude `foo2`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    entries: Vec<String>,
}

impl ExclusionSet {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<String> = entries
            .into_iter()
            .map(|e| normalize_relative(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        entries.sort();
        entries.dedup();
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether `relative_path` equals an exclusion entry or is nested under one.
pub fn is_excluded(relative_path: &str, exclusions: &ExclusionSet) -> bool {
    let rel = normalize_relative(relative_path);
    exclusions.entries.iter().any(|entry| is_within(&rel, entry))
}
