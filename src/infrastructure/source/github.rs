//! GitHub codeload archive source
//!
//! Streams the tarball of one revision to disk. Tag-like refs use the tags
//! namespace, full commit SHAs are addressed directly, everything else is a
//! branch.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::ports::SourceProvider;
use crate::domain::value_objects::{RefKind, RevisionSelector};
use crate::error::{DeployError, DeployResult};

/// File name of the downloaded archive inside the staging directory
pub const ARCHIVE_FILE_NAME: &str = "source.tar.gz";

/// Downloads revision tarballs from a codeload-compatible endpoint
#[derive(Debug, Clone)]
pub struct GithubArchiveSource {
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl GithubArchiveSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            timeout,
        }
    }

    /// Send `Authorization: Bearer <token>` for private repositories
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    fn user_agent() -> String {
        format!("sluice/{}", env!("CARGO_PKG_VERSION"))
    }

    fn download(&self, url: &str, dest: &Path) -> DeployResult<u64> {
        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();
        let mut request = agent.get(url).set("User-Agent", &Self::user_agent());
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        let response = request.call().map_err(|e| match e {
            ureq::Error::Status(code, resp) => DeployError::FetchFailed {
                status: Some(code),
                message: resp.status_text().to_string(),
            },
            ureq::Error::Transport(transport) => DeployError::FetchFailed {
                status: None,
                message: transport.to_string(),
            },
        })?;

        let status = response.status();
        if !(200..300).contains(&status) {
            return Err(DeployError::FetchFailed {
                status: Some(status),
                message: response.status_text().to_string(),
            });
        }

        let mut file = fs::File::create(dest).map_err(|e| DeployError::io(dest, e))?;
        let mut reader = response.into_reader();
        let bytes = io::copy(&mut reader, &mut file).map_err(|e| DeployError::FetchFailed {
            status: None,
            message: format!("failed to write archive: {e}"),
        })?;
        file.sync_all().map_err(|e| DeployError::io(dest, e))?;

        if bytes == 0 {
            return Err(DeployError::FetchFailed {
                status: Some(status),
                message: "empty archive".to_string(),
            });
        }
        Ok(bytes)
    }
}

impl SourceProvider for GithubArchiveSource {
    fn fetch(&self, selector: &RevisionSelector, dest_dir: &Path) -> DeployResult<PathBuf> {
        let url = archive_url(&self.base_url, selector);
        let dest = dest_dir.join(ARCHIVE_FILE_NAME);
        tracing::debug!(%url, dest = %dest.display(), "downloading archive");

        match self.download(&url, &dest) {
            Ok(bytes) => {
                tracing::info!(bytes, "archive downloaded");
                Ok(dest)
            }
            Err(e) => {
                if let Err(cleanup) = fs::remove_file(&dest) {
                    if cleanup.kind() != io::ErrorKind::NotFound {
                        tracing::warn!(path = %dest.display(), error = %cleanup, "could not remove partial archive");
                    }
                }
                Err(e)
            }
        }
    }
}

/// Archive URL for `selector` under `base_url`.
///
/// Every path segment is percent-encoded, including `/` inside branch names.
pub fn archive_url(base_url: &str, selector: &RevisionSelector) -> String {
    let base = base_url.trim_end_matches('/');
    let owner = encode_segment(selector.owner());
    let repo = encode_segment(selector.repo());
    let reference = encode_segment(selector.reference());
    match selector.ref_kind() {
        RefKind::Tag => format!("{base}/{owner}/{repo}/tar.gz/refs/tags/{reference}"),
        RefKind::Commit => format!("{base}/{owner}/{repo}/tar.gz/{reference}"),
        RefKind::Branch => format!("{base}/{owner}/{repo}/tar.gz/refs/heads/{reference}"),
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
