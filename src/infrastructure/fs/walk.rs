//! Tree walker
//!
//! Produces parent-before-child listings with the `ignore` walker. All of
//! the walker's gitignore and hidden-file filtering is switched off: only the
//! exclusion set decides what is skipped, and an excluded directory is never
//! descended into.
//!
//! Entries that cannot be read are collected instead of ending the walk, so
//! callers decide whether one bad entry is fatal.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::domain::policies::{is_excluded, ExclusionSet};
use crate::domain::services::{EntryKind, TreeEntry};
use crate::domain::value_objects::path::{is_within, relative_to};
use crate::error::{DeployError, DeployResult};

const NON_UTF8_NAME: &str = "file name is not valid UTF-8";

/// Path the walker could not list or name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreadableEntry {
    /// Relative path, `.` for the root itself
    pub path: String,
    pub message: String,
}

/// Result of walking one tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeListing {
    pub entries: Vec<TreeEntry>,
    pub unreadable: Vec<UnreadableEntry>,
}

/// List every non-excluded entry below `root`, parents first, siblings by name.
///
/// Symlinks are not followed and are listed as files. A missing or
/// non-directory root is an error. Unreadable directories and non-UTF-8
/// names are reported in `unreadable`, and neither they nor their ancestors
/// appear in `entries`.
pub fn list_tree(root: &Path, exclusions: &ExclusionSet) -> DeployResult<TreeListing> {
    let meta = fs::metadata(root).map_err(|e| DeployError::io(root, e))?;
    if !meta.is_dir() {
        return Err(DeployError::io(
            root,
            std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
        ));
    }

    let filter_root = root.to_path_buf();
    let filter_exclusions = exclusions.clone();

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| match relative_to(&filter_root, entry.path()) {
            Some(rel) => !is_excluded(&rel, &filter_exclusions),
            None => true,
        })
        .build();

    let mut listing = TreeListing::default();
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                let path = error_path(&err)
                    .map(|p| display_relative(root, p))
                    .unwrap_or_else(|| ".".to_string());
                tracing::warn!(path = %path, error = %err, "could not read entry");
                listing.unreadable.push(UnreadableEntry {
                    path,
                    message: err.to_string(),
                });
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }
        let Some(relative_path) = relative_to(root, entry.path()) else {
            let path = display_relative(root, entry.path());
            tracing::warn!(path = %path, "skipping entry with non-UTF-8 name");
            listing.unreadable.push(UnreadableEntry {
                path,
                message: NON_UTF8_NAME.to_string(),
            });
            continue;
        };
        let kind = match entry.file_type() {
            Some(ft) if ft.is_dir() => EntryKind::Directory,
            _ => EntryKind::File,
        };
        listing.entries.push(TreeEntry {
            relative_path,
            kind,
        });
    }

    if !listing.unreadable.is_empty() {
        let unreadable = &listing.unreadable;
        listing.entries.retain(|e| {
            !unreadable
                .iter()
                .any(|u| is_within(&u.path, &e.relative_path))
        });
    }

    tracing::debug!(
        root = %root.display(),
        entries = listing.entries.len(),
        unreadable = listing.unreadable.len(),
        "listed tree"
    );
    Ok(listing)
}

fn error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.as_path()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child.as_path()),
        _ => None,
    }
}

fn display_relative(root: &Path, path: &Path) -> String {
    let stripped: PathBuf = path.strip_prefix(root).unwrap_or(path).to_path_buf();
    let shown = stripped.to_string_lossy().replace('\\', "/");
    if shown.is_empty() {
        ".".to_string()
    } else {
        shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::plan_from_listing;
    use tempfile::tempdir;

    fn build_tree(root: &Path) {
        fs::create_dir_all(root.join("css")).unwrap();
        fs::create_dir_all(root.join("config")).unwrap();
        fs::create_dir_all(root.join(".github/workflows")).unwrap();
        fs::write(root.join("index.html"), "<h1>hi</h1>").unwrap();
        fs::write(root.join("css/site.css"), "body{}").unwrap();
        fs::write(root.join("config/secrets.json"), "{}").unwrap();
        fs::write(root.join(".github/workflows/ci.yml"), "on: push").unwrap();
        fs::write(root.join(".htaccess"), "Options -Indexes").unwrap();
    }

    fn paths(listing: &TreeListing) -> Vec<&str> {
        listing
            .entries
            .iter()
            .map(|e| e.relative_path.as_str())
            .collect()
    }

    #[test]
    fn list_tree_includes_hidden_files_and_orders_parents_first() {
        let dir = tempdir().unwrap();
        build_tree(dir.path());

        let listing = list_tree(dir.path(), &ExclusionSet::empty()).unwrap();
        let paths = paths(&listing);

        assert!(listing.unreadable.is_empty());
        assert!(paths.contains(&".htaccess"));
        let dir_pos = paths.iter().position(|p| *p == ".github/workflows").unwrap();
        let file_pos = paths
            .iter()
            .position(|p| *p == ".github/workflows/ci.yml")
            .unwrap();
        assert!(dir_pos < file_pos);
        assert!(listing
            .entries
            .iter()
            .any(|e| e.relative_path == "css" && e.kind == EntryKind::Directory));
    }

    #[test]
    fn list_tree_does_not_descend_into_excluded_dirs() {
        let dir = tempdir().unwrap();
        build_tree(dir.path());

        let listing = list_tree(dir.path(), &ExclusionSet::new([".github"])).unwrap();
        assert!(paths(&listing)
            .iter()
            .all(|p| !p.starts_with(".github")));
    }

    #[test]
    fn list_tree_ignores_gitignore_files() {
        let dir = tempdir().unwrap();
        build_tree(dir.path());
        fs::write(dir.path().join(".gitignore"), "css/\n").unwrap();

        let listing = list_tree(dir.path(), &ExclusionSet::empty()).unwrap();
        assert!(paths(&listing).contains(&"css/site.css"));
    }

    #[test]
    fn plan_of_unchanged_tree_is_stable() {
        let dir = tempdir().unwrap();
        build_tree(dir.path());
        let excl = ExclusionSet::new(["config/secrets.json"]);

        let first = plan_from_listing(&list_tree(dir.path(), &excl).unwrap().entries, &excl);
        let second = plan_from_listing(&list_tree(dir.path(), &excl).unwrap().entries, &excl);

        assert_eq!(first, second);
        assert!(first
            .iter()
            .all(|e| e.relative_path != "config/secrets.json"));
    }

    #[test]
    fn list_tree_missing_root_is_io_error() {
        let dir = tempdir().unwrap();
        let err = list_tree(&dir.path().join("nope"), &ExclusionSet::empty()).unwrap_err();
        assert!(matches!(err, DeployError::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_dir_is_reported_and_walk_continues() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("locked")).unwrap();
        fs::write(dir.path().join("locked/inner.txt"), "x").unwrap();
        fs::write(dir.path().join("stale.txt"), "x").unwrap();
        fs::write(dir.path().join("zz.txt"), "x").unwrap();
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(&locked).is_ok() {
            // Permission bits do not bind this user (root)
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let listing = list_tree(dir.path(), &ExclusionSet::empty()).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(paths(&listing), vec!["stale.txt", "zz.txt"]);
        assert_eq!(listing.unreadable.len(), 1);
        assert_eq!(listing.unreadable[0].path, "locked");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_name_is_reported_not_mangled() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        fs::write(dir.path().join(OsStr::from_bytes(b"bad\xff.txt")), "x").unwrap();
        fs::write(dir.path().join("good.txt"), "x").unwrap();

        let listing = list_tree(dir.path(), &ExclusionSet::empty()).unwrap();

        assert_eq!(paths(&listing), vec!["good.txt"]);
        assert_eq!(listing.unreadable.len(), 1);
        assert_eq!(listing.unreadable[0].message, NON_UTF8_NAME);
        assert!(listing.unreadable[0].path.starts_with("bad"));
    }
}
