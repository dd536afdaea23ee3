//! # Core Module
//!
//! The UI-agnostic organizing and deduplication engine.
//!
//! ## Modules
//! - `sanitize` - Cleans tag values for use as file and folder names
//! - `metadata` - Reads artist/title/album/genre with defaults
//! - `scanner` - Discovers audio files in directories
//! - `organize` - Files tracks into Genre/Artist/Album
//! - `hasher` - Computes content digests
//! - `dedup` - Removes byte-identical duplicates
//! - `cancel` - Stops a batch between files

pub mod cancel;
pub mod dedup;
pub mod hasher;
pub mod metadata;
pub mod organize;
pub mod sanitize;
pub mod scanner;

// Re-export commonly used types
pub use cancel::CancelFlag;
pub use dedup::{deduplicate_music, DedupOptions, DedupSummary, Deduplicator, RemovalMode};
pub use hasher::{ContentDigest, ContentHasher};
pub use metadata::{MetadataResolver, TagReader, TrackMetadata};
pub use organize::{organize_music_files, OrganizeOptions, OrganizeSummary, Organizer};
pub use sanitize::sanitize;
pub use scanner::{AudioFormat, FileScanner, ScanConfig};
