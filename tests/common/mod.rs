//! Common test utilities for Sluice CLI tests.
//!
//! This module provides:
//! - `TestEnv`: isolated work directory with a config file and a web root
//! - `ArchiveServer`: throwaway HTTP responder serving a tarball
//! - Assertion macros: `assert_output_contains!`
//! - Fixtures: tarball builder and config template

#![allow(dead_code)]

pub mod assertions;
pub mod env;
pub mod fixtures;
pub mod server;

pub use assertions::*;
pub use env::*;
pub use fixtures::*;
pub use server::*;
