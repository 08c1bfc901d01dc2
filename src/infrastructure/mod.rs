//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Tree walking and target-side file operations
//! - `source/` - Archive download (GitHub codeload)
//! - `archive` - Tarball extraction into the staging directory
//! - `backup` - Timestamped pre-image snapshots
//! - `lock` - Run lock over the sentinel file
//! - `events/` - Progress transcript sinks (text, JSON)

pub mod archive;
pub mod backup;
pub mod events;
pub mod fs;
pub mod lock;
pub mod source;

// Re-export for convenience
pub use backup::{list_snapshots, FsBackupStore, SnapshotSummary};
pub use events::{JsonEventSink, TextEventSink};
pub use lock::{RunLock, RunLockGuard, LOCK_FILE_NAME};
pub use source::GithubArchiveSource;
