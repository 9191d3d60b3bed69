//! # Hasher Module
//!
//! Computes content fingerprints used as deduplication keys.
//!
//! The file is streamed through MD5 in fixed-size chunks, so memory use does
//! not depend on file size. The digest only depends on the bytes: name,
//! timestamps and location play no part.
//!
//! ## Example
//! ```rust,ignore
//! use device_media_sorter::core::hasher::ContentHasher;
//!
//! let hasher = ContentHasher::new();
//! let hash = hasher.hash_file(&path)?;
//! println!("{}", hash);
//! ```

use crate::error::HashError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Default read size for streaming
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// A 128-bit content digest, lower-case hex without separators
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentHash(String);

impl ContentHash {
    /// Wrap an already computed hex digest
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Get the digest as a hex string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Streams files through the digest
#[derive(Debug, Clone)]
pub struct ContentHasher {
    chunk_size: usize,
}

impl ContentHasher {
    /// Create a hasher with the default chunk size
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the read chunk size in bytes (minimum 1)
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    /// Hash the file at `path`
    pub fn hash_file(&self, path: &Path) -> Result<ContentHash, HashError> {
        let io_error = |source| HashError::IoError {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_error)?;
        self.hash_reader(&mut file).map_err(io_error)
    }

    /// Hash everything readable from `reader`
    pub fn hash_reader<R: Read>(&self, reader: &mut R) -> std::io::Result<ContentHash> {
        let mut context = md5::Context::new();
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            let read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            context.consume(&buffer[..read]);
        }

        Ok(ContentHash(format!("{:x}", context.compute())))
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn empty_input_has_known_digest() {
        let hash = ContentHasher::new().hash_reader(&mut &b""[..]).unwrap();
        assert_eq!(hash.as_str(), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn digest_is_lowercase_hex_128_bits() {
        let hash = ContentHasher::new()
            .hash_reader(&mut &b"The quick brown fox jumps over the lazy dog"[..])
            .unwrap();
        assert_eq!(hash.as_str(), "9e107d9d372bb6826bd81d3542a419d6");
        assert_eq!(hash.as_str().len(), 32);
    }

    #[test]
    fn chunk_size_does_not_change_digest() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let small = ContentHasher::new().chunk_size(7).hash_reader(&mut &data[..]).unwrap();
        let large = ContentHasher::new().hash_reader(&mut &data[..]).unwrap();
        assert_eq!(small, large);
    }

    #[test]
    fn identical_bytes_hash_equal_regardless_of_name() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("IMG_0001.JPG");
        let sub = dir.path().join("elsewhere");
        fs::create_dir(&sub).unwrap();
        let b = sub.join("copy.bin");
        fs::write(&a, b"same bytes").unwrap();
        fs::write(&b, b"same bytes").unwrap();

        let hasher = ContentHasher::new();
        assert_eq!(hasher.hash_file(&a).unwrap(), hasher.hash_file(&b).unwrap());
    }

    #[test]
    fn different_bytes_hash_differently() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.jpg");
        let b = dir.path().join("b.jpg");
        fs::write(&a, b"one").unwrap();
        fs::write(&b, b"two").unwrap();

        let hasher = ContentHasher::new();
        assert_ne!(hasher.hash_file(&a).unwrap(), hasher.hash_file(&b).unwrap());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ContentHasher::new()
            .hash_file(Path::new("/nonexistent/file.jpg"))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/file.jpg"));
    }
}
