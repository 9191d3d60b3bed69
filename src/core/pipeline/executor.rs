//! Pipeline execution implementation.

use crate::core::classifier::MediaKind;
use crate::core::descriptor::{DownloadedFile, FileDescriptor};
use crate::core::hasher::{ContentHash, ContentHasher, DEFAULT_CHUNK_SIZE};
use crate::core::registry::{DedupRegistry, Registration};
use crate::core::splitter::{FolderSplitter, SplitConfig, SplitReport};
use crate::error::{DedupError, HashError, MediaSorterError};
use crate::events::{
    null_sender, ClassifyEvent, DedupEvent, Event, EventSender, HashEvent, HashProgress,
    PipelineEvent, PipelinePhase, PipelineSummary,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// A duplicate that was deleted, and the file it duplicated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedDuplicate {
    pub path: PathBuf,
    pub kept: PathBuf,
}

/// Result of pipeline execution
#[derive(Debug)]
pub struct PipelineResult {
    /// Kept files, with their final locations
    pub files: Vec<FileDescriptor>,
    /// Duplicates deleted from disk
    pub duplicates: Vec<RemovedDuplicate>,
    /// Files that could not be read; left where they were
    pub unreadable: Vec<PathBuf>,
    /// Outcome of the folder split
    pub split: SplitReport,
    /// Files handed to the pipeline
    pub total_files: usize,
    /// Per-file errors (non-fatal)
    pub errors: Vec<String>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl PipelineResult {
    /// True when no per-file error occurred
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    fn empty() -> Self {
        Self {
            files: Vec::new(),
            duplicates: Vec::new(),
            unreadable: Vec::new(),
            split: SplitReport::default(),
            total_files: 0,
            errors: Vec::new(),
            duration_ms: 0,
        }
    }
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Folder splitting rules
    pub split: SplitConfig,
    /// Hash files on the rayon pool
    pub parallel_hashing: bool,
    /// Read size for hashing
    pub chunk_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            split: SplitConfig::default(),
            parallel_hashing: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    /// Minimum files a dated folder holds before a day change may close it
    pub fn min_files_per_folder(mut self, min: usize) -> Self {
        self.config.split.min_files_per_folder = min;
        self
    }

    /// Hard cap per dated folder (None = no cap)
    pub fn max_files_per_folder(mut self, max: Option<usize>) -> Self {
        self.config.split.max_files_per_folder = max;
        self
    }

    /// Replace the whole split configuration
    pub fn split_config(mut self, config: SplitConfig) -> Self {
        self.config.split = config;
        self
    }

    pub fn parallel_hashing(mut self, parallel: bool) -> Self {
        self.config.parallel_hashing = parallel;
        self
    }

    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            config: self.config,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The post-download processing pipeline
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline without events
    pub fn run(&self, inputs: Vec<DownloadedFile>) -> Result<PipelineResult, MediaSorterError> {
        self.run_with_events(inputs, &null_sender())
    }

    /// Run the pipeline with event reporting.
    ///
    /// Only an invalid configuration is an `Err`; per-file failures are collected
    /// in [`PipelineResult::errors`].
    pub fn run_with_events(
        &self,
        inputs: Vec<DownloadedFile>,
        events: &EventSender,
    ) -> Result<PipelineResult, MediaSorterError> {
        self.validate()?;

        let start_time = Instant::now();
        let total_files = inputs.len();
        events.send(Event::Pipeline(PipelineEvent::Started { total_files }));

        if inputs.is_empty() {
            info!("No files to process");
            let result = PipelineResult::empty();
            events.send(Event::Pipeline(PipelineEvent::Completed {
                summary: Self::summary(&result),
            }));
            return Ok(result);
        }

        info!("Processing {} downloaded files", total_files);
        let mut errors = Vec::new();

        // Phase 1: Hashing
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Hashing,
        }));
        let descriptors: Vec<FileDescriptor> = inputs
            .into_iter()
            .map(|input| FileDescriptor::new(input.path, input.created))
            .collect();
        let (hashed, unreadable) = self.hash_all(descriptors, events, &mut errors);

        // Phase 2: Deduplicating
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Deduplicating,
        }));
        let (mut files, duplicates) = Self::deduplicate(hashed, events, &mut errors);

        // Phase 3: Classifying
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Classifying,
        }));
        Self::classify(&mut files, events, &mut errors);

        // Phase 4: Splitting
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Splitting,
        }));
        let splitter = FolderSplitter::new(self.config.split.clone());
        let plan = splitter.plan(&files);
        let split = splitter.execute(&plan, &mut files, events);
        errors.extend(split.errors.iter().cloned());

        let result = PipelineResult {
            files,
            duplicates,
            unreadable,
            split,
            total_files,
            errors,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            "Done: {} kept, {} duplicates removed, {} errors",
            result.files.len(),
            result.duplicates.len(),
            result.errors.len()
        );
        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: Self::summary(&result),
        }));

        Ok(result)
    }

    fn validate(&self) -> Result<(), MediaSorterError> {
        self.config
            .split
            .validate()
            .map_err(MediaSorterError::Config)?;
        if self.config.chunk_size == 0 {
            return Err(MediaSorterError::Config(
                "hash chunk size must be at least 1 byte".to_string(),
            ));
        }
        Ok(())
    }

    /// Hash every descriptor; returns (hashed, unreadable paths) in input order
    fn hash_all(
        &self,
        descriptors: Vec<FileDescriptor>,
        events: &EventSender,
        errors: &mut Vec<String>,
    ) -> (Vec<FileDescriptor>, Vec<PathBuf>) {
        let total = descriptors.len();
        let hasher = ContentHasher::new().chunk_size(self.config.chunk_size);
        let completed = AtomicUsize::new(0);

        events.send(Event::Hash(HashEvent::Started { total_files: total }));

        let hash_one = |descriptor: &FileDescriptor| -> Result<ContentHash, HashError> {
            let hash = hasher.hash_file(descriptor.path());
            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
            events.send(Event::Hash(HashEvent::Progress(HashProgress {
                completed: done,
                total,
                current_path: descriptor.path().to_path_buf(),
            })));
            hash
        };

        let outcomes: Vec<Result<ContentHash, HashError>> = if self.config.parallel_hashing {
            descriptors.par_iter().map(hash_one).collect()
        } else {
            descriptors.iter().map(hash_one).collect()
        };

        let mut hashed = Vec::with_capacity(total);
        let mut unreadable = Vec::new();

        for (mut descriptor, outcome) in descriptors.into_iter().zip(outcomes) {
            match outcome {
                Ok(hash) => {
                    descriptor.set_hash(hash);
                    hashed.push(descriptor);
                }
                Err(e) => {
                    warn!("{}", e);
                    events.send(Event::Hash(HashEvent::Error {
                        path: descriptor.path().to_path_buf(),
                        message: e.to_string(),
                    }));
                    errors.push(e.to_string());
                    unreadable.push(descriptor.path().to_path_buf());
                }
            }
        }

        events.send(Event::Hash(HashEvent::Completed {
            total_hashed: hashed.len(),
            failed: unreadable.len(),
        }));

        (hashed, unreadable)
    }

    /// Keep the first file per hash and delete the rest from disk
    fn deduplicate(
        hashed: Vec<FileDescriptor>,
        events: &EventSender,
        errors: &mut Vec<String>,
    ) -> (Vec<FileDescriptor>, Vec<RemovedDuplicate>) {
        let mut registry = DedupRegistry::new();
        let mut kept: Vec<FileDescriptor> = Vec::with_capacity(hashed.len());
        let mut removed = Vec::new();

        for descriptor in hashed {
            match registry.register(kept.len(), &descriptor) {
                Some(Registration::Kept) => kept.push(descriptor),
                Some(Registration::DuplicateOf(original)) => {
                    let path = descriptor.path().to_path_buf();
                    if is_same_file(&path, &original.path) {
                        // The kept entry is this very file; deleting it would lose the only copy
                        let error = DedupError::RepeatedInput { path: path.clone() };
                        warn!("{}", error);
                        events.send(Event::Dedup(DedupEvent::Error {
                            path,
                            message: error.to_string(),
                        }));
                        errors.push(error.to_string());
                        continue;
                    }
                    match fs::remove_file(&path) {
                        Ok(()) => {
                            info!(
                                "Removed duplicate {} (same as {})",
                                path.display(),
                                original.path.display()
                            );
                            events.send(Event::Dedup(DedupEvent::DuplicateRemoved {
                                path: path.clone(),
                                kept: original.path.clone(),
                            }));
                            removed.push(RemovedDuplicate {
                                path,
                                kept: original.path,
                            });
                        }
                        Err(source) => {
                            // Still dropped from the working set: it must not be sorted twice
                            let error = DedupError::DeleteFailed { path: path.clone(), source };
                            warn!("{}", error);
                            events.send(Event::Dedup(DedupEvent::Error {
                                path,
                                message: error.to_string(),
                            }));
                            errors.push(error.to_string());
                        }
                    }
                }
                // set_hash ran for every descriptor that reaches this point
                None => kept.push(descriptor),
            }
        }

        debug!("{} distinct contents", registry.len());
        events.send(Event::Dedup(DedupEvent::Completed {
            kept: kept.len(),
            removed: removed.len(),
        }));

        (kept, removed)
    }

    /// Work out colour depth for images; decode failures only cost the logo check
    fn classify(files: &mut [FileDescriptor], events: &EventSender, errors: &mut Vec<String>) {
        events.send(Event::Classify(ClassifyEvent::Started {
            total_files: files.len(),
        }));

        let mut images = 0;
        let mut logos = 0;
        let mut videos = 0;

        for file in files.iter_mut() {
            match file.kind() {
                MediaKind::Video => videos += 1,
                MediaKind::Image => images += 1,
                MediaKind::Other => {}
            }

            match file.ensure_classified() {
                Ok(Some(depth)) if file.is_logo() => {
                    logos += 1;
                    events.send(Event::Classify(ClassifyEvent::LogoDetected {
                        path: file.path().to_path_buf(),
                        bits: depth.bits(),
                    }));
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("{}", e);
                    events.send(Event::Classify(ClassifyEvent::Error {
                        path: file.path().to_path_buf(),
                        message: e.to_string(),
                    }));
                    errors.push(e.to_string());
                }
            }
        }

        events.send(Event::Classify(ClassifyEvent::Completed {
            images,
            logos,
            videos,
        }));
    }

    fn summary(result: &PipelineResult) -> PipelineSummary {
        PipelineSummary {
            total_files: result.total_files,
            duplicates_removed: result.duplicates.len(),
            logos: result.split.logo_count,
            videos: result.split.video_count,
            dated_folders: result.split.dated_folders.len(),
            errors: result.errors.len(),
            duration_ms: result.duration_ms,
        }
    }
}

/// Two entries naming one file, either literally or once resolved
fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
