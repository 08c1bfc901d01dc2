//! Domain Policies
//!
//! Business rules that govern which paths a deployment may touch.

mod exclusion;

pub use exclusion::{is_excluded, ExclusionSet};
