//! Revision Selector Value Object

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// What kind of ref a selector points at; decides the archive endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// `v1.2.3` or `1.2.3`
    Tag,
    /// Full 40-character commit SHA
    Commit,
    /// Anything else
    Branch,
}

/// `{owner, repo, ref}` resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionSelector {
    owner: String,
    repo: String,
    reference: String,
}

impl RevisionSelector {
    /// Build a selector, trimming whitespace. `None` if any part is empty.
    pub fn new(owner: &str, repo: &str, reference: &str) -> Option<Self> {
        let (owner, repo, reference) = (owner.trim(), repo.trim(), reference.trim());
        if owner.is_empty() || repo.is_empty() || reference.is_empty() {
            return None;
        }
        Some(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            reference: reference.to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn ref_kind(&self) -> RefKind {
        static TAG: OnceLock<Regex> = OnceLock::new();
        static SHA: OnceLock<Regex> = OnceLock::new();

        let tag = TAG.get_or_init(|| {
            Regex::new(r"^v?[0-9]+\.[0-9]+\.[0-9]+$").expect("valid tag regex")
        });
        let sha = SHA.get_or_init(|| Regex::new(r"^[0-9a-fA-F]{40}$").expect("valid sha regex"));

        if tag.is_match(&self.reference) {
            RefKind::Tag
        } else if sha.is_match(&self.reference) {
            RefKind::Commit
        } else {
            RefKind::Branch
        }
    }
}

impl fmt::Display for RevisionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} @ {}", self.owner, self.repo, self.reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(reference: &str) -> RevisionSelector {
        RevisionSelector::new("acme", "site", reference).unwrap()
    }

    #[test]
    fn semver_refs_are_tags() {
        assert_eq!(sel("v1.2.3").ref_kind(), RefKind::Tag);
        assert_eq!(sel("10.0.21").ref_kind(), RefKind::Tag);
    }

    #[test]
    fn partial_or_prerelease_versions_are_branches() {
        assert_eq!(sel("v1.2").ref_kind(), RefKind::Branch);
        assert_eq!(sel("v1.2.3-rc1").ref_kind(), RefKind::Branch);
        assert_eq!(sel("release/v1.2.3").ref_kind(), RefKind::Branch);
    }

    #[test]
    fn non_ascii_digits_are_not_tags() {
        assert_eq!(sel("v\u{661}.\u{662}.\u{663}").ref_kind(), RefKind::Branch);
    }

    #[test]
    fn full_sha_is_commit() {
        assert_eq!(
            sel("0123456789abcdef0123456789abcdef01234567").ref_kind(),
            RefKind::Commit
        );
        assert_eq!(sel("0123456").ref_kind(), RefKind::Branch);
    }

    #[test]
    fn new_trims_and_rejects_empty_parts() {
        let s = RevisionSelector::new(" acme ", "site", " main\n").unwrap();
        assert_eq!(s.owner(), "acme");
        assert_eq!(s.reference(), "main");
        assert!(RevisionSelector::new("", "site", "main").is_none());
        assert!(RevisionSelector::new("acme", "site", "  ").is_none());
    }

    #[test]
    fn display_matches_transcript_form() {
        assert_eq!(sel("main").to_string(), "acme/site @ main");
    }
}
