//! Exact-duplicate removal.
//!
//! Files are hashed in scan order. The first file seen for a digest is the
//! one that stays; every later file with the same digest is removed. Files
//! that cannot be read are left out of the comparison entirely.

mod prefilter;
mod remover;
mod types;

pub use prefilter::{file_sizes, needs_hashing};
pub use remover::remove_duplicate;
pub use types::*;

use crate::core::hasher::{ContentDigest, ContentHasher};
use crate::core::scanner::{FileScanner, ScanConfig};
use crate::error::Result;
use crate::events::{DedupEvent, ProgressSink};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Runs deduplication batches
pub struct Deduplicator {
    scanner: FileScanner,
    hasher: ContentHasher,
    options: DedupOptions,
}

impl Deduplicator {
    pub fn new(options: DedupOptions) -> Self {
        Self {
            scanner: FileScanner::new(options.scan.clone()),
            hasher: ContentHasher::with_chunk_size(options.chunk_size),
            options,
        }
    }

    /// Hash every candidate and pair each repeat with its first-seen file.
    ///
    /// Stops early (returning what it has) if cancelled between files.
    pub fn find_duplicates(
        &self,
        candidates: &[PathBuf],
        summary: &mut DedupSummary,
    ) -> Vec<DuplicateMatch> {
        let sizes = file_sizes(candidates);
        let hash_mask = if self.options.size_prefilter {
            needs_hashing(&sizes)
        } else {
            vec![true; candidates.len()]
        };

        let mut first_seen: HashMap<ContentDigest, PathBuf> = HashMap::new();
        let mut duplicates = Vec::new();

        for ((path, size), wanted) in candidates.iter().zip(&sizes).zip(hash_mask) {
            if self.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            if !wanted {
                summary.skipped_unique_size += 1;
                continue;
            }

            let Some(digest) = self.hasher.digest(path) else {
                summary.hash_failures += 1;
                continue;
            };
            summary.files_hashed += 1;

            match first_seen.entry(digest) {
                Entry::Occupied(original) => {
                    // Only a provably different file may be removed
                    if !matches!(same_file::is_same_file(path, original.get()), Ok(false)) {
                        summary.aliases_skipped += 1;
                        tracing::debug!(
                            path = %path.display(),
                            original = %original.get().display(),
                            "same file reached twice, skipping"
                        );
                        continue;
                    }
                    tracing::debug!(
                        duplicate = %path.display(),
                        original = %original.get().display(),
                        %digest,
                        "duplicate found"
                    );
                    duplicates.push(DuplicateMatch {
                        duplicate: path.clone(),
                        original: original.get().clone(),
                        digest,
                        size_bytes: size.unwrap_or(0),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(path.clone());
                }
            }
        }

        duplicates
    }

    /// Deduplicate everything under `root`.
    ///
    /// Only a scan failure is returned as `Err`; a duplicate that cannot be
    /// removed is reported and skipped.
    pub fn run(&self, root: &Path, sink: &mut dyn ProgressSink) -> Result<DedupSummary> {
        let start = Instant::now();
        let dry_run = self.options.dry_run;
        let mut summary = DedupSummary {
            dry_run,
            ..Default::default()
        };

        sink.emit(DedupEvent::Started.into());
        tracing::info!(root = %root.display(), dry_run, "deduplication started");

        let candidates = self.scanner.scan_all(root)?;
        summary.files_found = candidates.len();

        let duplicates = self.find_duplicates(&candidates, &mut summary);
        if summary.cancelled {
            return Ok(finish(summary, sink, start));
        }

        summary.duplicates_found = duplicates.len();
        sink.emit(
            DedupEvent::Found {
                count: duplicates.len(),
            }
            .into(),
        );

        self.remove_duplicates(duplicates, &mut summary, sink);

        Ok(finish(summary, sink, start))
    }

    /// Remove (or in a dry run, report) each duplicate in order.
    ///
    /// A failed removal is reported and the rest still go ahead.
    pub fn remove_duplicates(
        &self,
        duplicates: Vec<DuplicateMatch>,
        summary: &mut DedupSummary,
        sink: &mut dyn ProgressSink,
    ) {
        let dry_run = self.options.dry_run;

        for found in duplicates {
            if self.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            if dry_run {
                summary.duplicates_removed += 1;
                summary.bytes_reclaimed += found.size_bytes;
                sink.emit(
                    DedupEvent::Planned {
                        path: found.duplicate,
                    }
                    .into(),
                );
                continue;
            }

            match remove_duplicate(&found.duplicate, self.options.removal) {
                Ok(()) => {
                    summary.duplicates_removed += 1;
                    summary.bytes_reclaimed += found.size_bytes;
                    sink.emit(
                        DedupEvent::Removed {
                            path: found.duplicate,
                        }
                        .into(),
                    );
                }
                Err(e) => {
                    summary.removal_failures += 1;
                    tracing::warn!(file = %found.duplicate.display(), error = %e, "could not remove duplicate");
                    sink.emit(
                        DedupEvent::Failed {
                            path: found.duplicate,
                            message: e.to_string(),
                        }
                        .into(),
                    );
                }
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.options
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.is_cancelled())
    }
}

fn finish(mut summary: DedupSummary, sink: &mut dyn ProgressSink, start: Instant) -> DedupSummary {
    summary.duration_ms = start.elapsed().as_millis() as u64;

    if summary.cancelled {
        tracing::info!(removed = summary.duplicates_removed, "deduplication cancelled");
        sink.emit(DedupEvent::Cancelled.into());
    } else {
        tracing::info!(
            removed = summary.duplicates_removed,
            failed = summary.removal_failures,
            "deduplication finished"
        );
        sink.emit(DedupEvent::Completed.into());
    }

    summary
}

/// Deduplicate `root` with default options
pub fn deduplicate_music(
    root: &Path,
    recursive: bool,
    sink: &mut dyn ProgressSink,
) -> Result<DedupSummary> {
    let options = DedupOptions {
        scan: ScanConfig::recursive(recursive),
        ..Default::default()
    };
    Deduplicator::new(options).run(root, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cancel::CancelFlag;
    use crate::error::OrganizerError;
    use std::fs;
    use tempfile::TempDir;

    fn run(root: &Path, options: DedupOptions) -> (DedupSummary, Vec<String>) {
        let mut lines = Vec::new();
        let summary = Deduplicator::new(options)
            .run(root, &mut |line: &str| lines.push(line.to_string()))
            .unwrap();
        (summary, lines)
    }

    fn flat() -> DedupOptions {
        DedupOptions {
            scan: ScanConfig::recursive(false),
            ..Default::default()
        }
    }

    #[test]
    fn first_seen_survives_in_scan_order() {
        let temp = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = ["x.mp3", "y.mp3", "z.mp3"]
            .iter()
            .map(|name| temp.path().join(name))
            .collect();
        for path in &paths {
            fs::write(path, b"identical").unwrap();
        }

        let dedup = Deduplicator::new(flat());
        let mut summary = DedupSummary::default();
        let found = dedup.find_duplicates(&paths, &mut summary);

        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|m| m.original == paths[0]));
        assert_eq!(found[0].duplicate, paths[1]);
        assert_eq!(found[1].duplicate, paths[2]);
    }

    #[test]
    fn three_copies_and_one_distinct_leave_two() {
        let temp = TempDir::new().unwrap();
        for name in ["a.mp3", "b.mp3", "c.flac"] {
            fs::write(temp.path().join(name), b"same audio").unwrap();
        }
        fs::write(temp.path().join("d.mp3"), b"other song").unwrap();

        let (summary, lines) = run(temp.path(), flat());

        assert_eq!(summary.duplicates_found, 2);
        assert_eq!(summary.duplicates_removed, 2);
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 2);
        assert!(temp.path().join("d.mp3").exists());
        assert_eq!(lines[0], "Starting deduplication...");
        assert_eq!(lines[1], "Found 2 duplicate files.");
        assert_eq!(lines.last().unwrap(), "Deduplication complete.");
    }

    #[test]
    fn prefilter_does_not_change_the_outcome() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.mp3"), b"abc").unwrap();
        fs::write(temp.path().join("b.mp3"), b"abc").unwrap();
        fs::write(temp.path().join("c.mp3"), b"abd").unwrap();
        fs::write(temp.path().join("d.mp3"), b"longer file").unwrap();

        let (with, _) = run(temp.path(), DedupOptions { dry_run: true, ..flat() });
        let (without, _) = run(
            temp.path(),
            DedupOptions {
                dry_run: true,
                size_prefilter: false,
                ..flat()
            },
        );

        assert_eq!(with.duplicates_found, 1);
        assert_eq!(without.duplicates_found, 1);
        assert_eq!(with.skipped_unique_size, 1);
        assert_eq!(without.files_hashed, 4);
    }

    #[test]
    fn second_run_removes_nothing() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.ogg"), b"x").unwrap();
        fs::write(temp.path().join("b.ogg"), b"x").unwrap();

        run(temp.path(), flat());
        let (summary, _) = run(temp.path(), flat());

        assert_eq!(summary.duplicates_found, 0);
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn non_audio_duplicates_are_ignored() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), b"same").unwrap();
        fs::write(temp.path().join("b.txt"), b"same").unwrap();

        let (summary, lines) = run(temp.path(), flat());

        assert_eq!(summary.files_found, 0);
        assert!(temp.path().join("b.txt").exists());
        assert_eq!(lines[1], "Found 0 duplicate files.");
    }

    #[test]
    fn duplicates_in_subfolders_need_recursion() {
        let temp = TempDir::new().unwrap();
        let sub = temp.path().join("Album");
        fs::create_dir(&sub).unwrap();
        fs::write(temp.path().join("a.wav"), b"pcm").unwrap();
        fs::write(sub.join("a.wav"), b"pcm").unwrap();

        let (flat_summary, _) = run(temp.path(), flat());
        assert_eq!(flat_summary.duplicates_found, 0);

        let (deep_summary, _) = run(temp.path(), DedupOptions::default());
        assert_eq!(deep_summary.duplicates_removed, 1);
    }

    #[test]
    fn unreadable_files_are_skipped() {
        let temp = TempDir::new().unwrap();
        let real = temp.path().join("real.mp3");
        fs::write(&real, b"data").unwrap();
        let missing = temp.path().join("missing.mp3");

        let dedup = Deduplicator::new(DedupOptions {
            size_prefilter: false,
            ..flat()
        });
        let mut summary = DedupSummary::default();
        let found = dedup.find_duplicates(&[real, missing], &mut summary);

        assert!(found.is_empty());
        assert_eq!(summary.hash_failures, 1);
        assert_eq!(summary.files_hashed, 1);
    }

    #[test]
    fn dry_run_keeps_every_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.m4a"), b"aac").unwrap();
        fs::write(temp.path().join("b.m4a"), b"aac").unwrap();

        let (summary, lines) = run(temp.path(), DedupOptions { dry_run: true, ..flat() });

        assert_eq!(summary.duplicates_removed, 1);
        assert_eq!(summary.bytes_reclaimed, 3);
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 2);
        assert!(lines.iter().any(|l| l.starts_with("Would remove duplicate:")));
    }

    #[test]
    fn cancelled_batch_removes_nothing() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.mp3"), b"1").unwrap();
        fs::write(temp.path().join("b.mp3"), b"1").unwrap();

        let cancel = CancelFlag::new();
        cancel.cancel();
        let (summary, lines) = run(
            temp.path(),
            DedupOptions {
                cancel: Some(cancel),
                ..flat()
            },
        );

        assert!(summary.cancelled);
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 2);
        assert_eq!(lines.last().unwrap(), "Deduplication cancelled.");
    }

    #[test]
    fn missing_root_is_fatal() {
        let mut sink = |_: &str| {};
        assert!(deduplicate_music(Path::new("/nonexistent/music"), false, &mut sink).is_err());
    }

    #[test]
    fn failed_removal_does_not_stop_the_batch() {
        let temp = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = ["a.mp3", "b.mp3", "c.mp3"]
            .iter()
            .map(|name| temp.path().join(name))
            .collect();
        for path in &paths {
            fs::write(path, b"same take").unwrap();
        }

        let dedup = Deduplicator::new(flat());
        let mut summary = DedupSummary::default();
        let found = dedup.find_duplicates(&paths, &mut summary);
        assert_eq!(found.len(), 2);

        // b.mp3 disappears between hashing and removal
        fs::remove_file(&paths[1]).unwrap();

        let mut lines = Vec::new();
        {
            let mut sink = |line: &str| lines.push(line.to_string());
            dedup.remove_duplicates(found, &mut summary, &mut sink);
            finish(summary.clone(), &mut sink, Instant::now());
        }

        assert_eq!(summary.removal_failures, 1);
        assert_eq!(summary.duplicates_removed, 1);
        assert!(lines[0].starts_with("Error removing duplicate"));
        assert!(lines[0].contains("b.mp3"));
        assert_eq!(lines[1], format!("Removed duplicate: {}", paths[2].display()));
        assert_eq!(lines.last().unwrap(), "Deduplication complete.");
        assert!(paths[0].exists());
        assert!(!paths[2].exists());
    }

    #[cfg(unix)]
    #[test]
    fn protected_duplicate_is_reported_and_others_still_go() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let locked = temp.path().join("Locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("x.mp3"), b"kept in a read-only folder").unwrap();
        fs::write(locked.join("y.mp3"), b"kept in a read-only folder").unwrap();
        fs::write(temp.path().join("p.flac"), b"loose copy").unwrap();
        fs::write(temp.path().join("q.flac"), b"loose copy").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // Root can still delete from a read-only folder
        if fs::write(locked.join(".writable"), b"").is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let (summary, lines) = run(temp.path(), DedupOptions::default());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(summary.duplicates_found, 2);
        assert_eq!(summary.removal_failures, 1);
        assert_eq!(summary.duplicates_removed, 1);
        assert_eq!(fs::read_dir(&locked).unwrap().count(), 2);
        let loose = ["p.flac", "q.flac"]
            .iter()
            .filter(|name| temp.path().join(name).exists())
            .count();
        assert_eq!(loose, 1);
        assert!(lines.iter().any(|l| l.starts_with("Error removing duplicate")));
        assert_eq!(lines.last().unwrap(), "Deduplication complete.");
    }

    #[test]
    fn two_paths_to_one_file_are_not_duplicates() {
        let temp = TempDir::new().unwrap();
        let real = temp.path().join("real.mp3");
        fs::write(&real, b"only copy").unwrap();

        let dedup = Deduplicator::new(flat());
        let mut summary = DedupSummary::default();
        let same_file_again = temp.path().join(".").join("real.mp3");
        let found = dedup.find_duplicates(&[real.clone(), same_file_again], &mut summary);

        assert!(found.is_empty());
        assert_eq!(summary.aliases_skipped, 1);
        assert!(real.exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_track_never_costs_the_real_file() {
        let temp = TempDir::new().unwrap();
        let real = temp.path().join("r.mp3");
        fs::write(&real, b"only copy").unwrap();
        std::os::unix::fs::symlink(&real, temp.path().join("l.mp3")).unwrap();

        let (summary, _) = run(temp.path(), flat());

        assert_eq!(summary.files_found, 1);
        assert_eq!(summary.duplicates_found, 0);
        assert_eq!(fs::read(&real).unwrap(), b"only copy");
    }

    #[cfg(unix)]
    #[test]
    fn followed_folder_alias_never_costs_the_real_file() {
        let temp = TempDir::new().unwrap();
        let album = temp.path().join("album");
        fs::create_dir(&album).unwrap();
        let song = album.join("song.flac");
        fs::write(&song, b"lossless").unwrap();
        std::os::unix::fs::symlink(&album, temp.path().join("alias")).unwrap();

        let options = DedupOptions {
            scan: ScanConfig {
                follow_symlinks: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let (summary, _) = run(temp.path(), options);

        assert_eq!(summary.files_found, 2);
        assert_eq!(summary.aliases_skipped, 1);
        assert_eq!(summary.duplicates_found, 0);
        assert_eq!(fs::read(&song).unwrap(), b"lossless");
    }

    #[cfg(unix)]
    #[test]
    fn traversal_error_is_fatal_and_removes_nothing() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.mp3"), b"twin").unwrap();
        fs::write(temp.path().join("b.mp3"), b"twin").unwrap();
        let album = temp.path().join("Album");
        fs::create_dir(&album).unwrap();
        std::os::unix::fs::symlink(temp.path(), album.join("back")).unwrap();

        let options = DedupOptions {
            scan: ScanConfig {
                follow_symlinks: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut lines = Vec::new();
        let result = Deduplicator::new(options)
            .run(temp.path(), &mut |line: &str| lines.push(line.to_string()));

        assert!(matches!(result, Err(OrganizerError::Scan(_))));
        assert!(temp.path().join("a.mp3").exists());
        assert!(temp.path().join("b.mp3").exists());
        assert_eq!(lines, vec!["Starting deduplication..."]);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subfolder_is_fatal_and_removes_nothing() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.mp3"), b"twin").unwrap();
        fs::write(temp.path().join("b.mp3"), b"twin").unwrap();
        let locked = temp.path().join("Locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores directory permissions
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let mut sink = |_: &str| {};
        let result = Deduplicator::new(DedupOptions::default()).run(temp.path(), &mut sink);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(result, Err(OrganizerError::Scan(_))));
        assert!(temp.path().join("a.mp3").exists());
        assert!(temp.path().join("b.mp3").exists());
    }
}
