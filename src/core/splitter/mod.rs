//! Folder splitting.
//!
//! Sends logos and videos to fixed folders and spreads everything else across
//! folders named by calendar day, merging short days so folders do not end up
//! nearly empty.

mod types;
mod planner;
mod executor;

pub use types::*;
pub use planner::FolderPlanner;
pub use executor::FolderSplitter;
