//! Types for the organize module.

use crate::core::cancel::CancelFlag;
use crate::core::scanner::ScanConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for an organize batch
#[derive(Debug, Clone, Default)]
pub struct OrganizeOptions {
    pub scan: ScanConfig,
    /// Plan and report only; create and move nothing
    pub dry_run: bool,
    pub cancel: Option<CancelFlag>,
}

/// Where one file is going
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub target: PathBuf,
    /// Numeric suffix used to avoid a collision (0 = none)
    pub suffix: usize,
}

/// Result of an organize batch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizeSummary {
    pub files_found: usize,
    /// Files moved (or, in a dry run, files that would be moved)
    pub files_moved: usize,
    pub files_failed: usize,
    /// Files that needed a " (n)" suffix
    pub collisions_resolved: usize,
    pub folders_created: usize,
    pub dry_run: bool,
    pub cancelled: bool,
    pub duration_ms: u64,
}
