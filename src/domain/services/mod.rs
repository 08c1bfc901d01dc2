//! Domain Services
//!
//! Pure business logic services that operate on tree listings.
//! These services have no I/O dependencies and are easily testable.

mod planner;

pub use planner::{
    deepest_first, index_from_listing, plan_from_listing, prune_candidates, EntryKind, SyncAction,
    SyncEntry, SyncPlan, TreeEntry,
};
