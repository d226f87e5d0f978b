//! Error types for tonedeck-sync
//!
//! Not-found and forbidden responses are not errors: they come back as
//! [`crate::source::FetchOutcome::Missing`]. Everything here aborts a run.

use std::path::PathBuf;
use thiserror::Error;

/// Sync and export error type
#[derive(Debug, Error)]
pub enum SyncError {
    /// Request could not be completed (connection, timeout, body read)
    #[error("Network error fetching {url}: {message}")]
    Transport { url: String, message: String },

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(String),

    /// Server answered with a status other than success, 403 or 404
    #[error("HTTP status {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    /// Specified directory does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// tonedeck-common error
    #[error("Common error: {0}")]
    Common(#[from] tonedeck_common::Error),
}

/// Result type for sync and export operations
pub type SyncResult<T> = Result<T, SyncError>;
