//! Archive sources
//!
//! Implementations of the `SourceProvider` port.

mod github;

pub use github::{archive_url, GithubArchiveSource, ARCHIVE_FILE_NAME};
