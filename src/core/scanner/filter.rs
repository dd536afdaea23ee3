//! File filtering logic for the scanner.

use super::AudioFormat;
use std::path::Path;

/// Filters files down to the fixed audio allow-list
#[derive(Debug, Clone)]
pub struct AudioFilter {
    /// Whether to include hidden files
    include_hidden: bool,
}

impl AudioFilter {
    pub fn new() -> Self {
        Self {
            include_hidden: true,
        }
    }

    /// Include hidden files (starting with .)
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Check if a file should be included
    pub fn should_include(&self, path: &Path) -> bool {
        if !self.include_hidden {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    return false;
                }
            }
        }

        AudioFormat::from_path(path).is_some()
    }
}

impl Default for AudioFilter {
    fn default() -> Self {
        Self::new()
    }
}
