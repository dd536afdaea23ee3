//! # CLI Module
//!
//! Command-line interface for the music organizer.
//!
//! ## Usage
//! ```bash
//! # File everything under ~/Music into Genre/Artist/Album
//! music-org organize ~/Music
//!
//! # Only the top level, and just show what would happen
//! music-org organize ~/Music --no-recursive --dry-run
//!
//! # Remove byte-identical copies, sending them to the trash
//! music-org dedupe ~/Music --trash
//!
//! # JSON lines for scripting
//! music-org dedupe ~/Music --output json
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use music_organizer::core::dedup::{DedupOptions, DedupSummary, Deduplicator, RemovalMode};
use music_organizer::core::organize::{OrganizeOptions, OrganizeSummary, Organizer};
use music_organizer::core::scanner::ScanConfig;
use music_organizer::core::CancelFlag;
use music_organizer::error::{OrganizerError, Result};
use music_organizer::events::{
    DedupEvent, Event, EventChannel, EventReceiver, EventSender, OrganizeEvent,
};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Music Organizer - tidy a music folder from its tags
#[derive(Parser, Debug)]
#[command(name = "music-org")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Move tracks into Genre/Artist/Album/Artist - Title.ext
    Organize {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Remove byte-identical duplicate tracks, keeping the first one found
    Dedupe {
        #[command(flatten)]
        common: CommonArgs,

        /// Move duplicates to the trash instead of deleting them
        #[arg(long)]
        trash: bool,

        /// Hash every file, even ones whose size is unique
        #[arg(long)]
        no_size_prefilter: bool,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Music folder
    path: PathBuf,

    /// Only look at files directly inside the folder
    #[arg(long)]
    no_recursive: bool,

    /// Report what would happen without touching any file
    #[arg(long)]
    dry_run: bool,

    /// Skip hidden files and folders
    #[arg(long)]
    skip_hidden: bool,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl CommonArgs {
    fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            recursive: !self.no_recursive,
            include_hidden: !self.skip_hidden,
            ..Default::default()
        }
    }

    fn root(&self) -> Result<&Path> {
        if self.path.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(OrganizerError::Config(
                "Please select a music folder.".to_string(),
            ));
        }
        Ok(&self.path)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// One JSON object per event, then the summary
    Json,
    /// Bare progress lines
    Plain,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Organize { common } => run_organize(common),
        Commands::Dedupe {
            common,
            trash,
            no_size_prefilter,
        } => run_dedupe(common, trash, !no_size_prefilter),
    }
}

fn run_organize(common: CommonArgs) -> Result<()> {
    music_organizer::init_tracing(common.verbose);
    let root = common.root()?;
    let options = OrganizeOptions {
        scan: common.scan_config(),
        dry_run: common.dry_run,
        cancel: Some(cancel_on_ctrl_c()),
    };

    print_header(common.output, "organization", root, !common.no_recursive);

    let organizer = Organizer::new(options);
    let summary = run_batch(common.output, |sink| organizer.run(root, sink))?;

    match common.output {
        OutputFormat::Pretty => print_organize_summary(&Term::stderr(), &summary),
        OutputFormat::Json => print_json_summary(&summary),
        OutputFormat::Plain => {}
    }

    Ok(())
}

fn run_dedupe(common: CommonArgs, trash: bool, size_prefilter: bool) -> Result<()> {
    music_organizer::init_tracing(common.verbose);
    let root = common.root()?;
    let options = DedupOptions {
        scan: common.scan_config(),
        dry_run: common.dry_run,
        removal: if trash {
            RemovalMode::Trash
        } else {
            RemovalMode::Delete
        },
        size_prefilter,
        cancel: Some(cancel_on_ctrl_c()),
        ..Default::default()
    };

    print_header(common.output, "deduplication", root, !common.no_recursive);

    let deduplicator = Deduplicator::new(options);
    let summary = run_batch(common.output, |sink| deduplicator.run(root, sink))?;

    match common.output {
        OutputFormat::Pretty => print_dedup_summary(&Term::stderr(), &summary),
        OutputFormat::Json => print_json_summary(&summary),
        OutputFormat::Plain => {}
    }

    Ok(())
}

/// Ctrl-C stops the batch at the next file boundary
fn cancel_on_ctrl_c() -> CancelFlag {
    let cancel = CancelFlag::new();
    let handler_flag = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_flag.cancel()) {
        tracing::warn!(error = %e, "could not install Ctrl-C handler");
    }
    cancel
}

/// Run a batch on this thread while a printer thread renders its events
fn run_batch<T, F>(output: OutputFormat, batch: F) -> Result<T>
where
    F: FnOnce(&mut EventSender) -> Result<T>,
{
    let (mut sender, receiver) = EventChannel::new();
    let printer = spawn_printer(receiver, output);

    let result = batch(&mut sender);

    // Drop sender to signal the printer thread to finish
    drop(sender);
    printer.join().ok();

    if let Err(ref e) = result {
        Term::stderr()
            .write_line(&format!("{} {}", style("✗").red().bold(), e))
            .ok();
    }
    result
}

fn spawn_printer(receiver: EventReceiver, output: OutputFormat) -> thread::JoinHandle<()> {
    let spinner = matches!(output, OutputFormat::Pretty).then(|| {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    thread::spawn(move || {
        for event in receiver.iter() {
            match output {
                OutputFormat::Pretty => {
                    if let Some(ref pb) = spinner {
                        if let Some(status) = status_message(&event) {
                            pb.set_message(status);
                        }
                        pb.println(styled_line(&event));
                    }
                }
                OutputFormat::Json => {
                    if let Ok(json) = serde_json::to_string(&event) {
                        println!("{}", json);
                    }
                }
                OutputFormat::Plain => println!("{}", event),
            }
        }

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
    })
}

fn status_message(event: &Event) -> Option<String> {
    match event {
        Event::Organize(OrganizeEvent::Started) => Some("Scanning...".to_string()),
        Event::Organize(OrganizeEvent::Found { count }) => Some(format!("Organizing {} files", count)),
        Event::Dedup(DedupEvent::Started) => Some("Scanning and hashing...".to_string()),
        Event::Dedup(DedupEvent::Found { count }) => Some(format!("Removing {} duplicates", count)),
        _ => None,
    }
}

fn styled_line(event: &Event) -> String {
    let line = event.to_string();
    match event {
        Event::Organize(OrganizeEvent::Failed { .. }) | Event::Dedup(DedupEvent::Failed { .. }) => {
            style(line).red().to_string()
        }
        Event::Organize(OrganizeEvent::Found { .. }) | Event::Dedup(DedupEvent::Found { .. }) => {
            style(line).cyan().to_string()
        }
        Event::Organize(OrganizeEvent::Completed) | Event::Dedup(DedupEvent::Completed) => {
            format!("{} {}", style("✓").green().bold(), line)
        }
        Event::Organize(OrganizeEvent::Cancelled) | Event::Dedup(DedupEvent::Cancelled) => {
            style(line).yellow().to_string()
        }
        Event::Organize(OrganizeEvent::Planned { .. }) | Event::Dedup(DedupEvent::Planned { .. }) => {
            style(line).dim().to_string()
        }
        _ => line,
    }
}

fn print_header(output: OutputFormat, operation: &str, root: &Path, recursive: bool) {
    if matches!(output, OutputFormat::Json) {
        return;
    }

    let term = Term::stderr();
    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Music Organizer").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
    }
    term.write_line(&format!(
        "Starting {} in '{}' (recursive={})...",
        operation,
        display_path(root),
        recursive
    ))
    .ok();
}

fn print_organize_summary(term: &Term, summary: &OrganizeSummary) {
    term.write_line("").ok();
    let verb = if summary.dry_run { "would be moved" } else { "moved" };
    term.write_line(&format!(
        "  {} of {} files {} in {:.1}s",
        style(summary.files_moved).cyan(),
        summary.files_found,
        verb,
        summary.duration_ms as f64 / 1000.0
    ))
    .ok();

    if summary.collisions_resolved > 0 {
        term.write_line(&format!(
            "  {} renamed with a numeric suffix",
            style(summary.collisions_resolved).yellow()
        ))
        .ok();
    }

    if summary.folders_created > 0 {
        term.write_line(&format!(
            "  {} folders created",
            style(summary.folders_created).dim()
        ))
        .ok();
    }

    if summary.files_failed > 0 {
        term.write_line(&format!(
            "  {} files could not be moved",
            style(summary.files_failed).red()
        ))
        .ok();
    }

    if summary.dry_run {
        term.write_line("").ok();
        term.write_line(&format!(
            "{}",
            style("Dry run: no files were moved.").dim()
        ))
        .ok();
    }
}

fn print_dedup_summary(term: &Term, summary: &DedupSummary) {
    term.write_line("").ok();
    term.write_line(&format!(
        "  {} music files scanned in {:.1}s",
        style(summary.files_found).cyan(),
        summary.duration_ms as f64 / 1000.0
    ))
    .ok();

    let verb = if summary.dry_run { "would be removed" } else { "removed" };
    term.write_line(&format!(
        "  {} of {} duplicates {}",
        style(summary.duplicates_removed).cyan(),
        summary.duplicates_found,
        verb
    ))
    .ok();

    term.write_line(&format!(
        "  {} reclaimed",
        style(format_bytes(summary.bytes_reclaimed)).yellow()
    ))
    .ok();

    if summary.hash_failures > 0 {
        term.write_line(&format!(
            "  {} unreadable files skipped",
            style(summary.hash_failures).red()
        ))
        .ok();
    }

    if summary.aliases_skipped > 0 {
        term.write_line(&format!(
            "  {} symlinked paths to already-seen files skipped",
            style(summary.aliases_skipped).dim()
        ))
        .ok();
    }

    if summary.removal_failures > 0 {
        term.write_line(&format!(
            "  {} duplicates could not be removed",
            style(summary.removal_failures).red()
        ))
        .ok();
    }

    if summary.dry_run {
        term.write_line("").ok();
        term.write_line(&format!(
            "{}",
            style("Dry run: no files were removed.").dim()
        ))
        .ok();
    }
}

fn print_json_summary<S: serde::Serialize>(summary: &S) {
    let output = serde_json::json!({ "summary": summary });
    println!("{}", output);
}

fn display_path(path: &Path) -> String {
    match dirs::home_dir() {
        Some(home) => match path.strip_prefix(&home) {
            Ok(rest) => format!("~/{}", rest.display()),
            Err(_) => path.display().to_string(),
        },
        None => path.display().to_string(),
    }
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn recursive_is_the_default() {
        let cli = Cli::try_parse_from(["music-org", "organize", "/music"]).unwrap();
        match cli.command {
            Commands::Organize { common } => {
                assert!(common.scan_config().recursive);
                assert!(!common.dry_run);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn dedupe_flags_parse() {
        let cli = Cli::try_parse_from([
            "music-org",
            "dedupe",
            "/music",
            "--no-recursive",
            "--trash",
            "--output",
            "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Dedupe { common, trash, .. } => {
                assert!(trash);
                assert!(!common.scan_config().recursive);
                assert!(matches!(common.output, OutputFormat::Json));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn blank_folder_is_rejected() {
        let cli = Cli::try_parse_from(["music-org", "organize", "  "]).unwrap();
        match cli.command {
            Commands::Organize { common } => {
                assert!(matches!(common.root(), Err(OrganizerError::Config(_))));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn bytes_are_humanized() {
        assert_eq!(format_bytes(512), "512 bytes");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }
}
