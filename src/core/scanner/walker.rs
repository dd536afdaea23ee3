//! Directory walking implementation using walkdir.

use super::filter::AudioFilter;
use crate::error::ScanError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Configuration for the directory scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Descend into subdirectories (false = direct children only)
    pub recursive: bool,
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            follow_symlinks: false,
            include_hidden: true,
        }
    }
}

impl ScanConfig {
    pub fn recursive(recursive: bool) -> Self {
        Self {
            recursive,
            ..Default::default()
        }
    }
}

/// Scanner implementation using the walkdir crate
#[derive(Debug, Clone)]
pub struct FileScanner {
    config: ScanConfig,
    filter: AudioFilter,
}

impl FileScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let filter = AudioFilter::new().with_hidden(config.include_hidden);
        Self { config, filter }
    }

    /// Start a lazy scan of `root`.
    ///
    /// Fails up front if `root` is missing or not a directory. Later
    /// enumeration failures arrive as `Err` items.
    pub fn scan(&self, root: &Path) -> Result<ScanIter, ScanError> {
        if !root.exists() {
            return Err(ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        if !root.is_dir() {
            return Err(ScanError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let mut walker = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .min_depth(1);

        if !self.config.recursive {
            walker = walker.max_depth(1);
        }

        Ok(ScanIter {
            inner: walker.into_iter(),
            filter: self.filter.clone(),
            include_hidden: self.config.include_hidden,
        })
    }

    /// Scan eagerly, failing on the first enumeration error.
    ///
    /// The returned order is traversal order.
    pub fn scan_all(&self, root: &Path) -> Result<Vec<PathBuf>, ScanError> {
        let paths = self.scan(root)?.collect::<Result<Vec<_>, _>>()?;
        tracing::info!(root = %root.display(), count = paths.len(), "scan finished");
        Ok(paths)
    }
}

/// Lazy sequence of candidate audio files, in traversal order
pub struct ScanIter {
    inner: walkdir::IntoIter,
    filter: AudioFilter,
    include_hidden: bool,
}

impl Iterator for ScanIter {
    type Item = Result<PathBuf, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(map_walk_error(e))),
            };

            if entry.file_type().is_dir() {
                if !self.include_hidden && is_hidden(entry.path()) {
                    self.inner.skip_current_dir();
                }
                continue;
            }

            // Without follow_links this is the link itself, so symlinked
            // files never become candidates.
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if !self.filter.should_include(path) {
                continue;
            }

            tracing::debug!(file = %path.display(), "candidate found");
            return Some(Ok(entry.into_path()));
        }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

fn map_walk_error(e: walkdir::Error) -> ScanError {
    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();

    if e.io_error().map(|io| io.kind()) == Some(std::io::ErrorKind::PermissionDenied) {
        return ScanError::PermissionDenied { path };
    }

    let source = match e.into_io_error() {
        Some(io) => io,
        None => std::io::Error::new(std::io::ErrorKind::Other, "filesystem loop detected"),
    };
    ScanError::ReadDirectory { path, source }
}
