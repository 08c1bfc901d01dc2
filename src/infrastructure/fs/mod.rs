//! File System Operations
//!
//! Walking trees into listings and applying plan entries to the target.

mod local;
mod walk;

pub(crate) use local::replace_with_link;
pub use local::{copy_file, ensure_dir, remove_entry};
pub use walk::{list_tree, TreeListing, UnreadableEntry};
