//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use super::types::Config;
use super::ConfigError;

/// File name looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "sluice.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load from an explicit path, the working directory, the user config, or defaults.
///
/// An explicit path must exist. The implicit locations are optional. A relative
/// `root` is resolved against the directory of the file it was read from.
pub fn load_or_default(
    explicit: Option<&Path>,
) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    if let Some(path) = explicit {
        let (config, warnings) = load_with_warnings(path)?;
        return Ok((anchor_root(config, path), warnings));
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        let (config, warnings) = load_with_warnings(&local)?;
        return Ok((anchor_root(config, &local), warnings));
    }

    if let Some(dir) = dirs::config_dir() {
        let user = dir.join("sluice").join("config.toml");
        if user.is_file() {
            let (config, warnings) = load_with_warnings(&user)?;
            return Ok((anchor_root(config, &user), warnings));
        }
    }

    Ok((Config::default(), Vec::new()))
}

fn anchor_root(mut config: Config, config_path: &Path) -> Config {
    if config.root.is_relative() {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                config.root = parent.join(&config.root);
            }
        }
    }
    config
}

/// Apply `SLUICE_*` overrides read through `lookup`.
pub fn with_env_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(root) = lookup("SLUICE_ROOT") {
        config.root = PathBuf::from(root);
    }

    if let Some(secret) = lookup("SLUICE_SECRET") {
        config.secret = Some(secret);
    }

    if let Some(token) = lookup("SLUICE_GITHUB_TOKEN") {
        config.token = Some(token);
    }

    // Unparseable values keep the file setting
    if let Some(timeout) = lookup("SLUICE_TIMEOUT_SECS") {
        if let Ok(secs) = timeout.trim().parse::<u64>() {
            config.timeout_secs = secs;
        }
    }

    if let Some(val) = lookup("SLUICE_BACKUP") {
        config.backup.enabled = parse_flag(&val);
    }

    if let Some(val) = lookup("SLUICE_PRUNE") {
        config.prune.enabled = parse_flag(&val);
    }

    // SLUICE_EXCLUDE (comma-separated, appended)
    if let Some(extra) = lookup("SLUICE_EXCLUDE") {
        config.exclude.extend(
            extra
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        );
    }

    config
}

fn parse_flag(val: &str) -> bool {
    let val = val.trim().to_lowercase();
    val != "false" && val != "0" && val != "no" && val != "off"
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "secret",
        "root",
        "timeout_secs",
        "token",
        "archive_base_url",
        "exclude",
        "source",
        "repos",
        "owner",
        "repo",
        "ref",
        "backup",
        "enabled",
        "dir",
        "prune",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
