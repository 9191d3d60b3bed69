//! # Classifier Module
//!
//! Tags files as image, video or other, and spots logos among the images.
//!
//! ## Rules
//! - Kind comes from the file extension only (case-insensitive):
//!   images are `bmp`, `jpg`, `jpeg`, `png`, `gif`; videos are `mp4`, `avi`.
//!   A file with a misleading extension is misclassified; nothing sniffs content.
//! - For images the decoded pixel layout gives a colour depth in bits.
//! - A logo is an image with a known colour depth of at most 8 bits.

mod depth;

pub use depth::{color_depth, color_depth_of_layout, ColorDepth};

use serde::{Deserialize, Serialize};
use std::path::Path;

const IMAGE_EXTENSIONS: &[&str] = &["bmp", "jpg", "jpeg", "png", "gif"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi"];

/// Coarse media kind derived from the extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

impl MediaKind {
    /// Classify from a lower- or upper-case extension (without the dot)
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Image
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Video
        } else {
            MediaKind::Other
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
            MediaKind::Other => write!(f, "other"),
        }
    }
}

/// Classify a file by its name
pub fn classify(path: &Path) -> MediaKind {
    path.extension()
        .and_then(|e| e.to_str())
        .map(MediaKind::from_extension)
        .unwrap_or(MediaKind::Other)
}

/// Logo predicate: an image whose colour depth is known and at most 8 bits
pub fn is_logo(kind: MediaKind, depth: Option<ColorDepth>) -> bool {
    kind == MediaKind::Image && depth.is_some_and(|d| d.is_low_color())
}
