//! Types for the dedup module.

use crate::core::cancel::CancelFlag;
use crate::core::hasher::{ContentDigest, DEFAULT_CHUNK_SIZE};
use crate::core::scanner::ScanConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What happens to a duplicate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RemovalMode {
    /// Delete permanently
    #[default]
    Delete,
    /// Move to the system trash / recycle bin
    Trash,
}

/// Configuration for a deduplication batch
#[derive(Debug, Clone)]
pub struct DedupOptions {
    pub scan: ScanConfig,
    /// Hash and report only; remove nothing
    pub dry_run: bool,
    pub removal: RemovalMode,
    /// Skip hashing files whose size no other candidate shares
    pub size_prefilter: bool,
    pub chunk_size: usize,
    pub cancel: Option<CancelFlag>,
}

impl Default for DedupOptions {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            dry_run: false,
            removal: RemovalMode::Delete,
            size_prefilter: true,
            chunk_size: DEFAULT_CHUNK_SIZE,
            cancel: None,
        }
    }
}

/// A file whose content matches an earlier file in scan order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateMatch {
    pub duplicate: PathBuf,
    /// First-seen file with the same digest; never touched
    pub original: PathBuf,
    pub digest: ContentDigest,
    pub size_bytes: u64,
}

/// Result of a deduplication batch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DedupSummary {
    pub files_found: usize,
    pub files_hashed: usize,
    /// Not hashed because no other candidate had the same size
    pub skipped_unique_size: usize,
    /// Unreadable files, left out of the comparison
    pub hash_failures: usize,
    /// Paths that reach an already-registered file through a symlink
    pub aliases_skipped: usize,
    pub duplicates_found: usize,
    /// Duplicates removed (or, in a dry run, that would be removed)
    pub duplicates_removed: usize,
    pub removal_failures: usize,
    pub bytes_reclaimed: u64,
    pub dry_run: bool,
    pub cancelled: bool,
    pub duration_ms: u64,
}
