//! Event type definitions for progress reporting.
//!
//! The `Display` text of every event is the progress line shown to users.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// All events emitted by the two batch operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Organizer events
    Organize(OrganizeEvent),
    /// Deduplicator events
    Dedup(DedupEvent),
}

/// Events during an organize batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrganizeEvent {
    /// Organization has started
    Started,
    /// Candidate files were counted
    Found { count: usize },
    /// A file was moved into place
    Moved { file_name: String, target: PathBuf },
    /// Dry run: a file would be moved here
    Planned { file_name: String, target: PathBuf },
    /// A file could not be moved; the batch continues
    Failed { path: PathBuf, message: String },
    /// Stopped at a candidate boundary
    Cancelled,
    /// Organization completed
    Completed,
}

/// Events during a deduplication batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DedupEvent {
    /// Deduplication has started
    Started,
    /// Duplicates were counted
    Found { count: usize },
    /// A duplicate was removed
    Removed { path: PathBuf },
    /// Dry run: a duplicate would be removed
    Planned { path: PathBuf },
    /// A duplicate could not be removed; the batch continues
    Failed { path: PathBuf, message: String },
    /// Stopped at a candidate boundary
    Cancelled,
    /// Deduplication completed
    Completed,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Organize(event) => fmt::Display::fmt(event, f),
            Event::Dedup(event) => fmt::Display::fmt(event, f),
        }
    }
}

impl fmt::Display for OrganizeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrganizeEvent::Started => write!(f, "Starting organization..."),
            OrganizeEvent::Found { count } => write!(f, "Found {} music files.", count),
            OrganizeEvent::Moved { file_name, target } => {
                write!(f, "Moved '{}' to '{}'", file_name, target.display())
            }
            OrganizeEvent::Planned { file_name, target } => {
                write!(f, "Would move '{}' to '{}'", file_name, target.display())
            }
            OrganizeEvent::Failed { path, message } => {
                write!(f, "Error moving {}: {}", path.display(), message)
            }
            OrganizeEvent::Cancelled => write!(f, "Organization cancelled."),
            OrganizeEvent::Completed => write!(f, "Organization complete."),
        }
    }
}

impl fmt::Display for DedupEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DedupEvent::Started => write!(f, "Starting deduplication..."),
            DedupEvent::Found { count } => write!(f, "Found {} duplicate files.", count),
            DedupEvent::Removed { path } => write!(f, "Removed duplicate: {}", path.display()),
            DedupEvent::Planned { path } => {
                write!(f, "Would remove duplicate: {}", path.display())
            }
            DedupEvent::Failed { path, message } => {
                write!(f, "Error removing duplicate {}: {}", path.display(), message)
            }
            DedupEvent::Cancelled => write!(f, "Deduplication cancelled."),
            DedupEvent::Completed => write!(f, "Deduplication complete."),
        }
    }
}

impl From<OrganizeEvent> for Event {
    fn from(event: OrganizeEvent) -> Self {
        Event::Organize(event)
    }
}

impl From<DedupEvent> for Event {
    fn from(event: DedupEvent) -> Self {
        Event::Dedup(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Organize(OrganizeEvent::Moved {
            file_name: "track01.mp3".to_string(),
            target: PathBuf::from("/music/Rock/Band/Album/Band - Song.mp3"),
        });

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, event);
    }

    #[test]
    fn count_notices_read_naturally() {
        assert_eq!(
            OrganizeEvent::Found { count: 0 }.to_string(),
            "Found 0 music files."
        );
        assert_eq!(
            DedupEvent::Found { count: 2 }.to_string(),
            "Found 2 duplicate files."
        );
    }

    #[test]
    fn move_notice_names_source_and_target() {
        let line = OrganizeEvent::Moved {
            file_name: "track01.mp3".to_string(),
            target: PathBuf::from("/music/Pop/A/Singles/A - B.mp3"),
        }
        .to_string();
        assert_eq!(line, "Moved 'track01.mp3' to '/music/Pop/A/Singles/A - B.mp3'");
    }

    #[test]
    fn failure_notices_carry_detail() {
        let line = DedupEvent::Failed {
            path: PathBuf::from("/music/copy.flac"),
            message: "permission denied".to_string(),
        }
        .to_string();
        assert!(line.starts_with("Error removing duplicate /music/copy.flac"));
        assert!(line.ends_with("permission denied"));
    }
}
