//! # media-sort CLI
//!
//! Command-line interface for the device media sorter.
//!
//! ## Usage
//! ```bash
//! media-sort process ~/Downloads/phone --min-per-folder 10
//! media-sort process ~/Downloads/phone --max-per-folder 200 --output json
//! ```

mod cli;

use device_media_sorter::Result;

fn main() -> Result<()> {
    device_media_sorter::init_tracing();
    cli::run()
}
