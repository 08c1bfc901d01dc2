//! Relative Path Helpers
//!
//! Every policy decision works on `/`-separated relative path strings, so
//! platform separators never leak into exclusion or prune logic.

use std::path::{Component, Path};

/// Normalize a relative path to canonical `/`-separated form.
///
/// Backslashes become `/`, and empty and `.` segments are dropped, so
/// `"\\foo\\.\\bar/"` becomes `"foo/bar"`.
pub fn normalize_relative(path: &str) -> String {
    path.replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Relative path of `path` below `root` in canonical form.
///
/// Returns `None` when `path` is not under `root`, is `root` itself,
/// contains a `..` component, or has a segment that is not valid UTF-8.
pub fn relative_to(root: &Path, path: &Path) -> Option<String> {
    let stripped = path.strip_prefix(root).ok()?;
    let mut segments = Vec::new();
    for component in stripped.components() {
        match component {
            Component::Normal(name) => segments.push(name.to_str()?.to_string()),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/// Number of segments in a normalized relative path.
pub fn depth(relative: &str) -> usize {
    relative.split('/').filter(|s| !s.is_empty()).count()
}

/// Whether `relative` equals `ancestor` or is nested beneath it, segment-wise.
pub fn is_within(relative: &str, ancestor: &str) -> bool {
    if ancestor.is_empty() {
        return false;
    }
    match relative.strip_prefix(ancestor) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}
