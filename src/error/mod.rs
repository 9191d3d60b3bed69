//! # Error Module
//!
//! Error types for the device media sorter.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - every error names the file or folder involved
//! - **Per-file scope** - a failing file is reported and skipped, the run goes on

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error.
///
/// Per-file stage errors are collected as messages in the run result; only
/// failures that stop a run surface here.
#[derive(Error, Debug)]
pub enum MediaSorterError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Processing finished with {failures} file error(s)")]
    Incomplete { failures: usize },
}

/// Errors that occur while enumerating downloaded files
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while computing a content hash
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while inspecting an image's pixel layout
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("Failed to decode image {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Failed to open image file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while removing a duplicate
#[derive(Error, Debug)]
pub enum DedupError {
    #[error("Listed more than once, kept a single entry: {path}")]
    RepeatedInput { path: PathBuf },

    #[error("Failed to delete duplicate {path}: {source}")]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while moving a file into a subfolder
#[derive(Error, Debug)]
pub enum MoveError {
    #[error("Target already exists: {path}")]
    TargetExists { path: PathBuf },

    #[error("Destination folder does not exist: {folder}")]
    FolderMissing { folder: PathBuf },

    #[error("File has no name or parent folder: {path}")]
    InvalidPath { path: PathBuf },

    #[error("Failed to move {from} to {to}: {source}")]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while preparing a bucket folder
#[derive(Error, Debug)]
pub enum FolderError {
    #[error("Failed to create folder {path}: {source}")]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Skipped {file}: folder {folder} could not be created")]
    BucketUnavailable { file: PathBuf, folder: PathBuf },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, MediaSorterError>;
