//! Deploy Request
//!
//! What the trigger asked for: which revision, which credential, and whether
//! to stop after planning.

use crate::config::{Config, ConfigError};
use crate::domain::value_objects::RevisionSelector;

/// Inputs for one deploy run
#[derive(Debug, Clone, Default)]
pub struct DeployRequest {
    /// Key into the `[repos]` table; unknown keys fall back to `[source]`
    pub repo_key: Option<String>,
    /// Overrides the selected owner
    pub owner: Option<String>,
    /// Overrides the selected repository name
    pub repo: Option<String>,
    /// Overrides the selected ref
    pub reference: Option<String>,
    /// Shared secret presented by the caller
    pub token: Option<String>,
    /// Stop after planning
    pub dry_run: bool,
}

impl DeployRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repo_key(mut self, key: Option<String>) -> Self {
        self.repo_key = key;
        self
    }

    pub fn with_owner(mut self, owner: Option<String>) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_repo(mut self, repo: Option<String>) -> Self {
        self.repo = repo;
        self
    }

    pub fn with_reference(mut self, reference: Option<String>) -> Self {
        self.reference = reference;
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Resolve the revision to deploy against `config`.
    ///
    /// Overrides apply only when non-blank after trimming.
    pub fn selector(&self, config: &Config) -> Result<RevisionSelector, ConfigError> {
        let base = self
            .repo_key
            .as_deref()
            .map(str::trim)
            .and_then(|key| config.repos.get(key))
            .unwrap_or(&config.source);

        let pick = |over: &Option<String>, fallback: &str| -> String {
            over.as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
                .to_string()
        };

        let owner = pick(&self.owner, &base.owner);
        let repo = pick(&self.repo, &base.repo);
        let reference = pick(&self.reference, &base.reference);

        RevisionSelector::new(&owner, &repo, &reference).ok_or_else(|| ConfigError::Invalid {
            key: "source".to_string(),
            message: "owner, repo and ref must all be set".to_string(),
        })
    }
}
