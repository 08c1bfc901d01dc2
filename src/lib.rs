//! Sluice - shell-free deployer for live web roots
//!
//! Sluice replaces the contents of a web root with one revision of a GitHub
//! repository, downloaded as an archive over HTTPS. Local-only paths are
//! preserved, everything overwritten or removed is kept in a timestamped
//! backup, and a run lock keeps two deployments from touching the same root.
//!
//! ## Layers
//!
//! - `domain` - exclusion policy, sync planning, ports
//! - `infrastructure` - archive download and extraction, filesystem, lock, backups
//! - `application` - the deploy use case
//! - `presentation` - dependency wiring for the binary

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{DeployReport, DeployRequest, DeployUseCase, PruneEntryFailed};
pub use config::{Config, ConfigError, ConfigWarning};
pub use domain::policies::{is_excluded, ExclusionSet};
pub use domain::value_objects::{RefKind, RevisionSelector};
pub use error::{DeployError, DeployResult};
