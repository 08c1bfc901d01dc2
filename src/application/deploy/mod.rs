//! Deploy Module
//!
//! Orchestrates one deployment run.
//!
//! ## Structure
//!
//! - `options` - Request types (`DeployRequest`)
//! - `result` - Report types (`DeployReport`, `PruneEntryFailed`)
//! - `use_case` - Core use case logic (`DeployUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use sluice::application::deploy::{DeployRequest, DeployUseCase};
//!
//! let use_case = DeployUseCase::new(config, source, backup);
//! let report = use_case.execute(&DeployRequest::new().with_token(Some(secret)))?;
//! ```

mod options;
mod result;
mod use_case;

pub use options::DeployRequest;
pub use result::{DeployReport, PruneEntryFailed};
pub use use_case::DeployUseCase;
