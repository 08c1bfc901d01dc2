//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod backup_store;
pub mod deploy_events;
pub mod source_provider;

pub use backup_store::{BackupStore, NoopBackupStore};
pub use deploy_events::{DeployEvent, DeployEventSink, DeployPhase, NoopEventSink};
pub use source_provider::SourceProvider;
