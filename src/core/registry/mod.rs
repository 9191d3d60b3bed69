//! # Registry Module
//!
//! Run-scoped index from content hash to the first file that claimed it.
//!
//! The registry only decides; deleting the duplicate and dropping it from the
//! working set is up to the caller. `register` takes `&mut self`, so the
//! check-then-insert is a single step for whoever holds the registry. Callers
//! that share one across threads must wrap it in a lock for the whole call.

use crate::core::descriptor::FileDescriptor;
use crate::core::hasher::ContentHash;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::PathBuf;

/// The file kept for a given content hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeptFile {
    /// Position of the kept descriptor in the caller's working set
    pub index: usize,
    /// Where the kept file lived when it was registered
    pub path: PathBuf,
}

/// Outcome of registering a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// First file with this hash
    Kept,
    /// Another file already claimed this hash
    DuplicateOf(KeptFile),
}

impl Registration {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Registration::DuplicateOf(_))
    }
}

/// Content hash to first claimant, for a single run
#[derive(Debug, Default)]
pub struct DedupRegistry {
    claims: HashMap<ContentHash, KeptFile>,
}

impl DedupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the descriptor at `index` of the working set.
    ///
    /// Returns `None` when the descriptor has no content hash yet; such a file
    /// cannot take part in deduplication.
    pub fn register(&mut self, index: usize, descriptor: &FileDescriptor) -> Option<Registration> {
        let hash = descriptor.content_hash()?;
        Some(self.claim(hash.clone(), index, descriptor.path().to_path_buf()))
    }

    /// Claim `hash` for the file at `index` unless someone already has
    pub fn claim(&mut self, hash: ContentHash, index: usize, path: PathBuf) -> Registration {
        match self.claims.entry(hash) {
            Entry::Occupied(existing) => Registration::DuplicateOf(existing.get().clone()),
            Entry::Vacant(slot) => {
                slot.insert(KeptFile { index, path });
                Registration::Kept
            }
        }
    }

    /// Number of distinct hashes seen
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}
