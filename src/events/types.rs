//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the processing pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Hashing phase events
    Hash(HashEvent),
    /// Duplicate detection events
    Dedup(DedupEvent),
    /// Classification phase events
    Classify(ClassifyEvent),
    /// Folder splitting events
    Split(SplitEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during the hashing phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HashEvent {
    /// Hashing has started
    Started { total_files: usize },
    /// Progress update during hashing
    Progress(HashProgress),
    /// A file could not be read; it is left in place
    Error { path: PathBuf, message: String },
    /// Hashing completed
    Completed { total_hashed: usize, failed: usize },
}

/// Progress information during hashing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashProgress {
    /// Number of files hashed so far
    pub completed: usize,
    /// Total number of files to hash
    pub total: usize,
    /// Current file being hashed
    pub current_path: PathBuf,
}

/// Events during duplicate detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DedupEvent {
    /// A duplicate was deleted from disk
    DuplicateRemoved { path: PathBuf, kept: PathBuf },
    /// A duplicate was found but could not be deleted
    Error { path: PathBuf, message: String },
    /// Deduplication completed
    Completed { kept: usize, removed: usize },
}

/// Events during classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClassifyEvent {
    /// Classification has started
    Started { total_files: usize },
    /// An image was recognized as a logo
    LogoDetected { path: PathBuf, bits: i32 },
    /// An image could not be decoded; it is treated as a photo
    Error { path: PathBuf, message: String },
    /// Classification completed
    Completed { images: usize, logos: usize, videos: usize },
}

/// Events during folder splitting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SplitEvent {
    /// Splitting has started
    Started { total_files: usize, dated_folders: usize },
    /// A destination folder was created
    FolderCreated { path: PathBuf },
    /// A file was moved into its folder
    FileMoved { from: PathBuf, to: PathBuf },
    /// A file could not be moved; it stays where it was
    Error { path: PathBuf, message: String },
    /// Splitting completed
    Completed { files_moved: usize, folders_created: usize },
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started { total_files: usize },
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed
    Completed { summary: PipelineSummary },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Hashing,
    Deduplicating,
    Classifying,
    Splitting,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Files handed to the pipeline
    pub total_files: usize,
    /// Duplicates deleted from disk
    pub duplicates_removed: usize,
    /// Files moved to the logo folder
    pub logos: usize,
    /// Files moved to the video folder
    pub videos: usize,
    /// Number of dated folders used
    pub dated_folders: usize,
    /// Per-file errors (non-fatal)
    pub errors: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Hashing => write!(f, "Hashing"),
            PipelinePhase::Deduplicating => write!(f, "Removing duplicates"),
            PipelinePhase::Classifying => write!(f, "Classifying"),
            PipelinePhase::Splitting => write!(f, "Sorting into folders"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Hash(HashEvent::Progress(HashProgress {
            completed: 10,
            total: 50,
            current_path: PathBuf::from("/dl/IMG_0001.JPG"),
        }));

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Hash(HashEvent::Progress(p)) => {
                assert_eq!(p.total, 50);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn pipeline_summary_is_serializable() {
        let summary = PipelineSummary {
            total_files: 1000,
            duplicates_removed: 150,
            logos: 12,
            videos: 40,
            dated_folders: 9,
            errors: 0,
            duration_ms: 5000,
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"duplicates_removed\":150"));
    }

    #[test]
    fn phases_have_readable_names() {
        assert_eq!(PipelinePhase::Splitting.to_string(), "Sorting into folders");
    }
}
