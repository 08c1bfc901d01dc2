//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (policies, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DeployUseCase` - lock, fetch, stage, plan, sync, prune, clean up

pub mod deploy;

pub use deploy::{DeployReport, DeployRequest, DeployUseCase, PruneEntryFailed};
