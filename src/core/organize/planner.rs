//! Target path planning for organize batches.
//!
//! Layout: `root/{genre}/{artist}/{album}/{artist} - {title}[ (n)].{ext}`.
//! Existing libraries depend on this exact shape.

use super::types::PlannedMove;
use crate::core::metadata::TrackMetadata;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// `"{artist} - {title}"`
pub fn base_name(metadata: &TrackMetadata) -> String {
    format!("{} - {}", metadata.artist, metadata.title)
}

/// `root/genre/artist/album`
pub fn target_dir(root: &Path, metadata: &TrackMetadata) -> PathBuf {
    root.join(&metadata.genre)
        .join(&metadata.artist)
        .join(&metadata.album)
}

/// Lower-cased extension with its dot, or empty when there is none
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// File name for the given collision suffix (0 = no suffix)
pub fn file_name(base: &str, ext: &str, suffix: usize) -> String {
    if suffix == 0 {
        format!("{}{}", base, ext)
    } else {
        format!("{} ({}){}", base, suffix, ext)
    }
}

/// Anything at the path counts, including a dangling symlink
fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Computes collision-free targets.
///
/// Real runs probe the disk at call time. Dry runs also remember what they
/// have handed out, since nothing actually lands on disk.
pub struct TargetPlanner {
    root: PathBuf,
    remember_planned: bool,
    planned: HashSet<PathBuf>,
}

impl TargetPlanner {
    pub fn new(root: &Path, dry_run: bool) -> Self {
        Self {
            root: root.to_path_buf(),
            remember_planned: dry_run,
            planned: HashSet::new(),
        }
    }

    pub fn plan(&mut self, source: &Path, metadata: &TrackMetadata) -> PlannedMove {
        let dir = target_dir(&self.root, metadata);
        let base = base_name(metadata);
        let ext = dotted_extension(source);

        let mut suffix = 0;
        let mut target = dir.join(file_name(&base, &ext, suffix));
        while is_occupied(&target) || self.planned.contains(&target) {
            suffix += 1;
            target = dir.join(file_name(&base, &ext, suffix));
        }

        if self.remember_planned {
            self.planned.insert(target.clone());
        }

        PlannedMove {
            source: source.to_path_buf(),
            target,
            suffix,
        }
    }
}
