//! # Hasher Module
//!
//! Streams a file through 128-bit XXH3 to get a content digest.
//!
//! XXH3 is not cryptographic. At 128 bits an accidental collision between
//! two different tracks is not a practical concern, and it is far faster
//! than a cryptographic hash on large FLAC files.

use crate::error::HashError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use xxhash_rust::xxh3::Xxh3;

/// Read size per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Digest of a file's full byte content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest(pub u128);

impl ContentDigest {
    pub fn to_hex(&self) -> String {
        format!("{:032x}", self.0)
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Computes [`ContentDigest`]s in fixed-size chunks
#[derive(Debug, Clone)]
pub struct ContentHasher {
    chunk_size: usize,
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ContentHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different chunk size (zero is bumped to one byte)
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Hash the file, or explain why it could not be read
    pub fn try_digest(&self, path: &Path) -> Result<ContentDigest, HashError> {
        let io_error = |source: std::io::Error| HashError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_error)?;
        let mut hasher = Xxh3::new();
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            let read = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(io_error(e)),
            };
            hasher.update(&buffer[..read]);
        }

        Ok(ContentDigest(hasher.digest128()))
    }

    /// Hash the file; `None` means skip it for duplicate comparison
    pub fn digest(&self, path: &Path) -> Option<ContentDigest> {
        match self.try_digest(path) {
            Ok(digest) => Some(digest),
            Err(e) => {
                tracing::warn!(error = %e, "could not hash file, skipping");
                None
            }
        }
    }
}
