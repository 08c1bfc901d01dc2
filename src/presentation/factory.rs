//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::sync::Arc;

use crate::application::DeployUseCase;
use crate::config::Config;
use crate::domain::ports::{BackupStore, DeployEventSink, NoopBackupStore};
use crate::infrastructure::{FsBackupStore, GithubArchiveSource, JsonEventSink, TextEventSink};

/// Type alias for the concrete DeployUseCase with all dependencies
pub type ConcreteDeployUseCase = DeployUseCase<GithubArchiveSource, Box<dyn BackupStore>>;

/// Create a deploy use case for `config`
///
/// Backups go to `<root>/<backup.dir>` unless disabled.
pub fn create_deploy_use_case(config: Config) -> ConcreteDeployUseCase {
    let source = GithubArchiveSource::new(config.archive_base_url.clone(), config.timeout())
        .with_token(config.token.clone());
    let backup: Box<dyn BackupStore> = if config.backup.enabled {
        Box::new(FsBackupStore::new(config.backup_root()))
    } else {
        Box::new(NoopBackupStore)
    };

    DeployUseCase::new(config, source, backup)
}

/// Progress sink for the requested output format
pub fn create_event_sink(json: bool, verbose: u8) -> Arc<dyn DeployEventSink> {
    if json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(TextEventSink::stdout(verbose > 0))
    }
}
