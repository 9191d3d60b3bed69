//! # Device Media Sorter
//!
//! Post-processing for media freshly offloaded from a portable device.
//!
//! ## What It Does
//! - **Deduplicate** - Byte-identical files are detected by content hash; only the
//!   first one seen survives
//! - **Classify** - Photos, logos/drawings, videos and everything else
//! - **Split** - Logos and videos go to fixed buckets, the rest is spread across
//!   dated folders with a minimum occupancy per folder
//!
//! ## Architecture
//! - `core` - The processing engine (no device access, no UI)
//! - `events` - Event-driven progress reporting
//! - `error` - Error types with paths and context
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{MediaSorterError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or GUI).
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
