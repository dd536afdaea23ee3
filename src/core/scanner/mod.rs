//! # Scanner Module
//!
//! Discovers audio files in a music folder.
//!
//! ## Supported Formats
//! - MP3 (.mp3)
//! - FLAC (.flac)
//! - AAC/ALAC in MP4 (.m4a)
//! - WAV (.wav)
//! - Ogg Vorbis (.ogg)
//!
//! Extensions are compared case-insensitively. Nothing else is ever
//! scanned, moved, hashed, or deleted.
//!
//! ## Example
//! ```rust,ignore
//! use music_organizer::core::scanner::{FileScanner, ScanConfig};
//!
//! let scanner = FileScanner::new(ScanConfig::default());
//! for path in scanner.scan(Path::new("/music"))? {
//!     println!("{}", path?.display());
//! }
//! ```

mod filter;
mod walker;

pub use filter::AudioFilter;
pub use walker::{FileScanner, ScanConfig, ScanIter};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Audio formats on the allow-list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioFormat {
    Mp3,
    Flac,
    M4a,
    Wav,
    Ogg,
}

impl AudioFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "flac" => Some(AudioFormat::Flac),
            "m4a" => Some(AudioFormat::M4a),
            "wav" => Some(AudioFormat::Wav),
            "ogg" => Some(AudioFormat::Ogg),
            _ => None,
        }
    }

    /// Detect format from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}
