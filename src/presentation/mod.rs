//! Presentation Layer
//!
//! This layer handles:
//! - Creating use cases with infrastructure dependencies
//! - Choosing the progress sink for the requested output format
//!
//! ## Usage
//!
//! ```ignore
//! use sluice::presentation::factory;
//!
//! let use_case = factory::create_deploy_use_case(config);
//! let report = use_case.execute_with_events(&request, factory::create_event_sink(json, verbose))?;
//! ```

pub mod factory;

pub use factory::{create_deploy_use_case, create_event_sink, ConcreteDeployUseCase};
