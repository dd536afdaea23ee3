//! # Error Module
//!
//! Error types for the music organizer.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Only scan failures are fatal** - per-file failures are reported and skipped

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum OrganizerError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while enumerating the music folder
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while hashing file contents
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the tag reader. The resolver absorbs these into defaults.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Failed to read tags from {path}: {reason}")]
    Read { path: PathBuf, reason: String },
}

/// Per-file failures while moving or removing. Reported, never propagated.
#[derive(Error, Debug)]
pub enum FileOpError {
    #[error("failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to move to {to}: {source}")]
    Move {
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("copy verification failed: source {source_size} bytes, destination {dest_size} bytes")]
    CopyVerification { source_size: u64, dest_size: u64 },

    #[error("{0}")]
    Remove(#[source] std::io::Error),

    #[error("failed to move to trash: {0}")]
    Trash(String),
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, OrganizerError>;
