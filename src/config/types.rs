//! Configuration type definitions

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::policies::ExclusionSet;
use crate::domain::value_objects::path::normalize_relative;
use crate::infrastructure::lock::LOCK_FILE_NAME;

use super::loader::{self, ConfigWarning, CONFIG_FILE_NAME};
use super::ConfigError;

/// Repository coordinates plus the ref deployed when none is requested
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RepoConfig {
    #[serde(default)]
    pub owner: String,

    #[serde(default)]
    pub repo: String,

    #[serde(rename = "ref", default = "default_ref")]
    pub reference: String,
}

impl RepoConfig {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            reference: reference.into(),
        }
    }
}

fn default_ref() -> String {
    "main".to_string()
}

/// Backup snapshot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directory under the target root that holds `bk_<timestamp>` snapshots
    #[serde(default = "default_backup_dir")]
    pub dir: String,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: default_backup_dir(),
        }
    }
}

fn default_backup_dir() -> String {
    "backups".to_string()
}

/// Prune configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PruneConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_archive_base_url() -> String {
    "https://codeload.github.com".to_string()
}

fn default_exclude() -> Vec<String> {
    vec![
        CONFIG_FILE_NAME.to_string(),
        ".git".to_string(),
        ".github".to_string(),
    ]
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Shared secret every deploy request must present
    #[serde(default)]
    pub secret: Option<String>,

    /// Live tree being deployed into
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Network timeout for the archive download
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Bearer token for private repositories
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_archive_base_url")]
    pub archive_base_url: String,

    /// Relative paths under `root` that are never touched
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub source: RepoConfig,

    /// Alternate repositories selectable by key
    #[serde(default)]
    pub repos: BTreeMap<String, RepoConfig>,

    #[serde(default)]
    pub backup: BackupConfig,

    #[serde(default)]
    pub prune: PruneConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            secret: None,
            root: default_root(),
            timeout_secs: default_timeout_secs(),
            token: None,
            archive_base_url: default_archive_base_url(),
            exclude: default_exclude(),
            source: RepoConfig {
                reference: default_ref(),
                ..RepoConfig::default()
            },
            repos: BTreeMap::new(),
            backup: BackupConfig::default(),
            prune: PruneConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        loader::load_with_warnings(path)
    }

    /// Load from an explicit path, `./sluice.toml`, the user config dir, or defaults
    pub fn load_or_default(
        explicit: Option<&Path>,
    ) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        loader::load_or_default(explicit)
    }

    /// Apply environment variable overrides (SLUICE_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self, |key| std::env::var(key).ok())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Absolute path of the backup directory under the target root
    pub fn backup_root(&self) -> PathBuf {
        self.root.join(&self.backup.dir)
    }

    /// Configured excludes plus the backup directory and the lock sentinel.
    pub fn effective_excludes(&self) -> ExclusionSet {
        let mut entries = self.exclude.clone();
        entries.push(self.backup.dir.clone());
        entries.push(LOCK_FILE_NAME.to_string());
        ExclusionSet::new(entries)
    }

    /// Copy of this config with secrets replaced, for display
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.secret.is_some() {
            config.secret = Some("<redacted>".to_string());
        }
        if config.token.as_deref().is_some_and(|t| !t.is_empty()) {
            config.token = Some("<redacted>".to_string());
        }
        config
    }

    /// Reject configurations that cannot drive a deployment.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_backup_dir(&self.backup.dir)?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if !self.root.is_dir() {
            return Err(ConfigError::Invalid {
                key: "root".to_string(),
                message: format!("{} is not a directory", self.root.display()),
            });
        }
        Ok(())
    }
}

/// `backup.dir` must name a directory strictly inside the root.
fn validate_backup_dir(dir: &str) -> Result<(), ConfigError> {
    let invalid = |message: &str| ConfigError::Invalid {
        key: "backup.dir".to_string(),
        message: message.to_string(),
    };

    if normalize_relative(dir.trim()).is_empty() {
        return Err(invalid("must name a directory under the root"));
    }
    let escapes = Path::new(dir)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        || dir.starts_with('/')
        || dir.starts_with('\\')
        || dir.split(['/', '\\']).any(|segment| segment == "..");
    if escapes {
        return Err(invalid("must be a relative path inside the root"));
    }
    Ok(())
}
