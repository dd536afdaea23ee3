//! # music-org CLI
//!
//! Command-line interface for the music organizer.
//!
//! ## Usage
//! ```bash
//! music-org organize ~/Music
//! music-org dedupe ~/Music --dry-run
//! ```

mod cli;

use music_organizer::Result;

fn main() -> Result<()> {
    cli::run()
}
