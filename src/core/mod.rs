//! # Core Module
//!
//! The processing engine. It never talks to the device: it receives files that
//! are already on local disk, each with an optional creation time.
//!
//! ## Modules
//! - `descriptor` - Per-file state (path, creation time, cached hash and depth)
//! - `classifier` - Media kind from extension, colour depth from pixels
//! - `hasher` - Streaming content fingerprints
//! - `registry` - First-claimant index for deduplication
//! - `splitter` - Fixed and dated folder assignment, and the moves
//! - `scanner` - Lists a local download folder (CLI input)
//! - `pipeline` - Orchestrates the full workflow

pub mod classifier;
pub mod descriptor;
pub mod hasher;
pub mod pipeline;
pub mod registry;
pub mod scanner;
pub mod splitter;

// Re-export commonly used types
pub use classifier::{ColorDepth, MediaKind};
pub use descriptor::{DownloadedFile, FileDescriptor};
pub use hasher::{ContentHash, ContentHasher};
pub use pipeline::{Pipeline, PipelineResult};
pub use registry::{DedupRegistry, Registration};
pub use splitter::{FolderSplitter, SplitConfig};
