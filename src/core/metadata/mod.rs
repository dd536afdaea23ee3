//! # Metadata Module
//!
//! Resolves the four tags that decide where a track is filed.
//!
//! ## Extracted Fields
//! - Artist (default "Unknown Artist")
//! - Title (default "Unknown Title")
//! - Album (default "Singles")
//! - Genre (default "Unknown Genre")
//!
//! Tag parsing sits behind [`TagReader`]. The resolver never fails: an
//! unreadable file, a missing tag container, or a tag that sanitizes to
//! nothing all fall back to the field's default.

mod lofty_reader;

pub use lofty_reader::LoftyTagReader;

use super::sanitize::sanitize;
use crate::error::MetadataError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ARTIST: &str = "Unknown Artist";
pub const DEFAULT_TITLE: &str = "Unknown Title";
pub const DEFAULT_ALBUM: &str = "Singles";
pub const DEFAULT_GENRE: &str = "Unknown Genre";

/// Raw, unsanitized tag values as read from the file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTags {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
}

/// Reads tags from an audio file.
///
/// `Ok(None)` means the file was readable but carried no tag container.
pub trait TagReader {
    fn read_tags(&self, path: &Path) -> Result<Option<RawTags>, MetadataError>;
}

/// Sanitized track metadata; every field is always populated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub artist: String,
    pub title: String,
    pub album: String,
    pub genre: String,
}

impl Default for TrackMetadata {
    fn default() -> Self {
        Self {
            artist: DEFAULT_ARTIST.to_string(),
            title: DEFAULT_TITLE.to_string(),
            album: DEFAULT_ALBUM.to_string(),
            genre: DEFAULT_GENRE.to_string(),
        }
    }
}

impl TrackMetadata {
    /// Build from raw tags, applying sanitization and per-field defaults
    pub fn from_raw(raw: RawTags) -> Self {
        Self {
            artist: field_or_default(raw.artist, DEFAULT_ARTIST),
            title: field_or_default(raw.title, DEFAULT_TITLE),
            album: field_or_default(raw.album, DEFAULT_ALBUM),
            genre: field_or_default(raw.genre, DEFAULT_GENRE),
        }
    }
}

fn field_or_default(value: Option<String>, default: &str) -> String {
    value
        .map(|v| sanitize(&v))
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Turns a file path into [`TrackMetadata`], absorbing every failure
pub struct MetadataResolver<R = LoftyTagReader> {
    reader: R,
}

impl MetadataResolver<LoftyTagReader> {
    pub fn new() -> Self {
        Self {
            reader: LoftyTagReader,
        }
    }
}

impl Default for MetadataResolver<LoftyTagReader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: TagReader> MetadataResolver<R> {
    /// Use a custom tag reader
    pub fn with_reader(reader: R) -> Self {
        Self { reader }
    }

    pub fn resolve(&self, path: &Path) -> TrackMetadata {
        match self.reader.read_tags(path) {
            Ok(Some(raw)) => TrackMetadata::from_raw(raw),
            Ok(None) => {
                tracing::debug!(file = %path.display(), "no tag container, using defaults");
                TrackMetadata::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "tag read failed, using defaults");
                TrackMetadata::default()
            }
        }
    }
}
