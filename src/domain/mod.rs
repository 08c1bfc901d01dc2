//! Domain Layer
//!
//! Pure deployment logic without network access.
//!
//! ## Structure
//!
//! - `value_objects/` - Immutable value types (RevisionSelector, relative paths)
//! - `policies/` - Business rules (ExclusionSet)
//! - `services/` - Domain services (sync planner, prune ordering)
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - Policies and services work on listings, never on the disk
//! 2. **Pure Functions** - Services are stateless and testable
//! 3. **Ports & Adapters** - Network and backup side effects go through traits

pub mod policies;
pub mod ports;
pub mod services;
pub mod value_objects;
