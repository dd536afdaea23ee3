//! Music organization module.
//!
//! Moves every scanned track to `root/Genre/Artist/Album/Artist - Title.ext`
//! using its embedded tags. Existing files are never overwritten: a busy
//! target gets a " (1)", " (2)", ... suffix. One file failing never stops
//! the batch.
//!
//! Running twice is not a no-op. A file already sitting at its target sees
//! itself as a collision and moves to the " (1)" name.

mod executor;
mod planner;
mod types;

pub use executor::{ensure_dir, move_file};
pub use planner::{base_name, dotted_extension, file_name, target_dir, TargetPlanner};
pub use types::*;

use crate::core::metadata::{LoftyTagReader, MetadataResolver, TagReader};
use crate::core::scanner::{FileScanner, ScanConfig};
use crate::error::Result;
use crate::events::{OrganizeEvent, ProgressSink};
use std::path::Path;
use std::time::Instant;

/// Runs organize batches
pub struct Organizer<R = LoftyTagReader> {
    scanner: FileScanner,
    resolver: MetadataResolver<R>,
    options: OrganizeOptions,
}

impl Organizer<LoftyTagReader> {
    pub fn new(options: OrganizeOptions) -> Self {
        Self::with_reader(LoftyTagReader, options)
    }
}

impl<R: TagReader> Organizer<R> {
    /// Use a custom tag reader
    pub fn with_reader(reader: R, options: OrganizeOptions) -> Self {
        Self {
            scanner: FileScanner::new(options.scan.clone()),
            resolver: MetadataResolver::with_reader(reader),
            options,
        }
    }

    /// Organize everything under `root`.
    ///
    /// Only a scan failure is returned as `Err`; per-file problems go to
    /// the sink and the batch moves on.
    pub fn run(&self, root: &Path, sink: &mut dyn ProgressSink) -> Result<OrganizeSummary> {
        let start = Instant::now();
        let dry_run = self.options.dry_run;
        let mut summary = OrganizeSummary {
            dry_run,
            ..Default::default()
        };

        sink.emit(OrganizeEvent::Started.into());
        tracing::info!(root = %root.display(), dry_run, "organize started");

        let candidates = self.scanner.scan_all(root)?;
        summary.files_found = candidates.len();
        sink.emit(
            OrganizeEvent::Found {
                count: candidates.len(),
            }
            .into(),
        );

        let mut planner = TargetPlanner::new(root, dry_run);

        for source in candidates {
            if self.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            let metadata = self.resolver.resolve(&source);

            if !dry_run {
                match ensure_dir(&target_dir(root, &metadata)) {
                    Ok(true) => summary.folders_created += 1,
                    Ok(false) => {}
                    Err(e) => {
                        report_failure(sink, &mut summary, &source, e.to_string());
                        continue;
                    }
                }
            }

            let planned = planner.plan(&source, &metadata);
            if planned.suffix > 0 {
                summary.collisions_resolved += 1;
            }

            let original_name = source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            if dry_run {
                summary.files_moved += 1;
                sink.emit(
                    OrganizeEvent::Planned {
                        file_name: original_name,
                        target: planned.target,
                    }
                    .into(),
                );
                continue;
            }

            match move_file(&planned.source, &planned.target) {
                Ok(()) => {
                    summary.files_moved += 1;
                    tracing::debug!(from = %source.display(), to = %planned.target.display(), "moved");
                    sink.emit(
                        OrganizeEvent::Moved {
                            file_name: original_name,
                            target: planned.target,
                        }
                        .into(),
                    );
                }
                Err(e) => report_failure(sink, &mut summary, &source, e.to_string()),
            }
        }

        summary.duration_ms = start.elapsed().as_millis() as u64;

        if summary.cancelled {
            tracing::info!(moved = summary.files_moved, "organize cancelled");
            sink.emit(OrganizeEvent::Cancelled.into());
        } else {
            tracing::info!(
                moved = summary.files_moved,
                failed = summary.files_failed,
                "organize finished"
            );
            sink.emit(OrganizeEvent::Completed.into());
        }

        Ok(summary)
    }

    fn is_cancelled(&self) -> bool {
        self.options
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.is_cancelled())
    }
}

fn report_failure(
    sink: &mut dyn ProgressSink,
    summary: &mut OrganizeSummary,
    source: &Path,
    message: String,
) {
    summary.files_failed += 1;
    tracing::warn!(file = %source.display(), error = %message, "could not organize file");
    sink.emit(
        OrganizeEvent::Failed {
            path: source.to_path_buf(),
            message,
        }
        .into(),
    );
}

/// Organize `root` with default options and lofty tag reading
pub fn organize_music_files(
    root: &Path,
    recursive: bool,
    sink: &mut dyn ProgressSink,
) -> Result<OrganizeSummary> {
    let options = OrganizeOptions {
        scan: ScanConfig::recursive(recursive),
        ..Default::default()
    };
    Organizer::new(options).run(root, sink)
}
