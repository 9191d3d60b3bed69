//! # Pipeline Module
//!
//! Runs the post-download workflow over a batch of local files.
//!
//! ## Pipeline Stages
//! 1. **Hash** - Content hash for every file (unreadable files stay put)
//! 2. **Deduplicate** - First file per hash is kept, later copies are deleted
//! 3. **Classify** - Colour depth for images, to spot logos
//! 4. **Split** - Logos and videos to fixed folders, the rest into dated folders
//!
//! ## Ordering
//! Files are processed in the order given. Hashing may optionally run on a
//! rayon pool, but keep/delete decisions are always taken sequentially in input
//! order, so the first file seen for a hash is the one kept.

mod executor;

pub use executor::{Pipeline, PipelineBuilder, PipelineConfig, PipelineResult, RemovedDuplicate};
