//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

pub mod path;
mod revision;

pub use revision::{RefKind, RevisionSelector};
