//! # Scanner Module
//!
//! Lists the files sitting in a local download folder.
//!
//! The device layer normally hands over paths and creation times directly;
//! this scanner reproduces that input for a folder already on disk, so the
//! pipeline can be driven from the command line.
//!
//! ## Creation Time
//! 1. EXIF `DateTimeOriginal`, then EXIF `DateTime`
//! 2. Filesystem creation time
//! 3. Otherwise absent
//!
//! ## Example
//! ```rust,ignore
//! use device_media_sorter::core::scanner::{LocalScanner, ScanConfig};
//!
//! let scanner = LocalScanner::new(ScanConfig::default());
//! let result = scanner.scan(Path::new("/media/phone-dump"))?;
//! ```

mod dates;
mod walker;

pub use dates::{creation_time, exif_creation_time};
pub use walker::{LocalScanner, ScanConfig};

use crate::core::descriptor::DownloadedFile;
use crate::error::ScanError;

/// Result of a scan operation
#[derive(Debug)]
pub struct ScanResult {
    /// Files found, sorted by name
    pub files: Vec<DownloadedFile>,
    /// Entries that could not be read (non-fatal)
    pub errors: Vec<ScanError>,
}
