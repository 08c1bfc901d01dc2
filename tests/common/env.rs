//! Test environment builder for isolated Sluice testing.
//!
//! Provides `TestEnv` - a temp work directory holding `sluice.toml` and the
//! `site/` web root, plus helpers to run the Sluice binary inside it.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

use super::server::ArchiveServer;
use super::fixtures::config_toml;

/// Environment variables that would leak host configuration into a test run
const SCRUBBED_VARS: &[&str] = &[
    "SLUICE_ROOT",
    "SLUICE_SECRET",
    "SLUICE_TOKEN",
    "SLUICE_TIMEOUT_SECS",
    "SLUICE_GITHUB_TOKEN",
    "SLUICE_BACKUP",
    "SLUICE_PRUNE",
    "SLUICE_EXCLUDE",
    "RUST_LOG",
];

/// Result of running a Sluice CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated work directory with config, web root, and archive server
pub struct TestEnv {
    pub work_dir: TempDir,
    pub server: ArchiveServer,
    sluice_bin: PathBuf,
}

impl TestEnv {
    pub fn builder() -> TestEnvBuilder {
        TestEnvBuilder::new()
    }

    /// Path of the web root
    pub fn site_root(&self) -> PathBuf {
        self.work_dir.path().join("site")
    }

    /// Path relative to the web root
    pub fn site_path(&self, relative: &str) -> PathBuf {
        self.site_root().join(relative)
    }

    pub fn read_site_file(&self, relative: &str) -> String {
        std::fs::read_to_string(self.site_path(relative))
            .unwrap_or_else(|e| panic!("Failed to read site file {}: {}", relative, e))
    }

    /// Run sluice in the work directory
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    /// Run sluice in the work directory with extra env vars
    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(&self.sluice_bin);
        cmd.current_dir(self.work_dir.path())
            .args(args)
            .env("HOME", self.work_dir.path())
            .env("XDG_CONFIG_HOME", self.work_dir.path().join(".config"));
        for var in SCRUBBED_VARS {
            cmd.env_remove(var);
        }
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute sluice");
        output_to_result(output)
    }

    /// Every file under the web root with its contents, sorted by path
    pub fn site_snapshot(&self) -> Vec<(String, String)> {
        snapshot(&self.site_root(), &self.site_root())
    }
}

fn snapshot(root: &Path, dir: &Path) -> Vec<(String, String)> {
    let mut out = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            let rel = path
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            if rel == ".deploy.lock" {
                continue;
            }
            if path.is_dir() {
                out.push((format!("{rel}/"), String::new()));
                out.extend(snapshot(root, &path));
            } else {
                out.push((rel, std::fs::read_to_string(&path).unwrap_or_default()));
            }
        }
    }
    out.sort();
    out
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

/// Builder for TestEnv with fluent API
pub struct TestEnvBuilder {
    site_files: Vec<(String, String)>,
    server: Option<ArchiveServer>,
    config: Option<String>,
}

impl TestEnvBuilder {
    pub fn new() -> Self {
        Self {
            site_files: Vec::new(),
            server: None,
            config: None,
        }
    }

    /// Pre-existing file in the web root
    pub fn with_site_file(mut self, relative: &str, contents: &str) -> Self {
        self.site_files
            .push((relative.to_string(), contents.to_string()));
        self
    }

    /// Archive endpoint the config points at
    pub fn with_server(mut self, server: ArchiveServer) -> Self {
        self.server = Some(server);
        self
    }

    /// Replace the generated `sluice.toml`
    pub fn with_config(mut self, toml: &str) -> Self {
        self.config = Some(toml.to_string());
        self
    }

    pub fn build(self) -> TestEnv {
        let work_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let site = work_dir.path().join("site");
        std::fs::create_dir_all(&site).expect("Failed to create site root");

        for (relative, contents) in &self.site_files {
            let full = site.join(relative);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent).expect("Failed to create directories");
            }
            std::fs::write(&full, contents).expect("Failed to write site file");
        }

        let server = self.server.unwrap_or_else(ArchiveServer::not_found);
        let config = self
            .config
            .unwrap_or_else(|| config_toml(server.base_url()));
        std::fs::write(work_dir.path().join("sluice.toml"), config)
            .expect("Failed to write config");

        TestEnv {
            work_dir,
            server,
            sluice_bin: PathBuf::from(env!("CARGO_BIN_EXE_sluice")),
        }
    }
}

impl Default for TestEnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}
