//! # Music Organizer
//!
//! Sorts a music folder into `Genre/Artist/Album/Artist - Title.ext` using
//! embedded tags, and removes byte-identical duplicate tracks.
//!
//! ## Core Philosophy
//! - **Never overwrite** - a busy target name gets a numeric suffix
//! - **Keep going** - one bad file is reported, not fatal
//! - **First seen wins** - exactly one copy of each duplicate survives
//!
//! ## Architecture
//! The library is split into a core engine (UI-agnostic) and presentation layers:
//! - `core` - Organizing and deduplication engine
//! - `events` - Progress reporting through sinks and channels
//! - `error` - Error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{OrganizerError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point. `RUST_LOG`
/// overrides the default level.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
