//! # Descriptor Module
//!
//! Per-file state for one downloaded file.
//!
//! A `FileDescriptor` is the single source of truth for where a file currently
//! lives. Derived attributes are computed by explicit steps
//! ([`FileDescriptor::ensure_hash`], [`FileDescriptor::ensure_classified`]) and
//! cached; once computed they are never recomputed, even if the bytes on disk
//! change afterwards.

use crate::core::classifier::{self, ColorDepth, MediaKind};
use crate::core::hasher::{ContentHash, ContentHasher};
use crate::error::{ClassifyError, HashError, MoveError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A file already materialized on local disk, as handed over by the device layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadedFile {
    /// Absolute local path
    pub path: PathBuf,
    /// Creation time reported by the source, if any
    pub created: Option<NaiveDateTime>,
}

impl DownloadedFile {
    pub fn new(path: impl Into<PathBuf>, created: Option<NaiveDateTime>) -> Self {
        Self {
            path: path.into(),
            created,
        }
    }
}

/// Metadata for one downloaded file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDescriptor {
    path: PathBuf,
    created: Option<NaiveDateTime>,
    kind: MediaKind,
    content_hash: Option<ContentHash>,
    color_depth: Option<ColorDepth>,
}

impl FileDescriptor {
    /// Create a descriptor; the media kind is fixed here from the extension
    pub fn new(path: impl Into<PathBuf>, created: Option<NaiveDateTime>) -> Self {
        let path = path.into();
        let kind = classifier::classify(&path);
        Self {
            path,
            created,
            kind,
            content_hash: None,
            color_depth: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    pub fn parent_folder(&self) -> Option<&Path> {
        self.path.parent()
    }

    pub fn created(&self) -> Option<NaiveDateTime> {
        self.created
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// The cached content hash, if [`Self::ensure_hash`] has succeeded
    pub fn content_hash(&self) -> Option<&ContentHash> {
        self.content_hash.as_ref()
    }

    /// The cached colour depth; `None` for non-images or before classification
    pub fn color_depth(&self) -> Option<ColorDepth> {
        self.color_depth
    }

    /// Derived from the kind and colour depth on every call
    pub fn is_logo(&self) -> bool {
        classifier::is_logo(self.kind, self.color_depth)
    }

    /// Compute the content hash unless it is already cached
    pub fn ensure_hash(&mut self, hasher: &ContentHasher) -> Result<&ContentHash, HashError> {
        let hash = match self.content_hash.take() {
            Some(hash) => hash,
            None => hasher.hash_file(&self.path)?,
        };
        Ok(self.content_hash.insert(hash))
    }

    /// Store a hash computed elsewhere (e.g. on a worker thread).
    ///
    /// Ignored if a hash is already cached.
    pub fn set_hash(&mut self, hash: ContentHash) {
        if self.content_hash.is_none() {
            self.content_hash = Some(hash);
        }
    }

    /// Inspect the pixel layout of an image unless already done.
    ///
    /// Returns `Ok(None)` for non-images. On failure nothing is cached and
    /// [`Self::is_logo`] stays false.
    pub fn ensure_classified(&mut self) -> Result<Option<ColorDepth>, ClassifyError> {
        if self.kind != MediaKind::Image {
            return Ok(None);
        }
        if self.color_depth.is_none() {
            self.color_depth = Some(classifier::color_depth(&self.path)?);
        }
        Ok(self.color_depth)
    }

    /// Move the file into `subfolder`, an existing directory next to it.
    ///
    /// The folder is not created here. On any failure the recorded path is
    /// left untouched.
    pub fn move_under(&mut self, subfolder: &str) -> Result<&Path, MoveError> {
        let (parent, name) = match (self.path.parent(), self.path.file_name()) {
            (Some(parent), Some(name)) => (parent, name),
            _ => {
                return Err(MoveError::InvalidPath {
                    path: self.path.clone(),
                })
            }
        };

        let folder = parent.join(subfolder);
        if !folder.is_dir() {
            return Err(MoveError::FolderMissing { folder });
        }

        let target = folder.join(name);
        // rename() silently replaces files on unix
        if target.exists() {
            return Err(MoveError::TargetExists { path: target });
        }

        fs::rename(&self.path, &target).map_err(|source| MoveError::Io {
            from: self.path.clone(),
            to: target.clone(),
            source,
        })?;

        self.path = target;
        Ok(&self.path)
    }
}
