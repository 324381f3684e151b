//! Error types for Scribe

use scribe_session::{SessionId, StorageError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for Scribe operations
pub type ScribeResult<T> = Result<T, ScribeError>;

/// Main error type for Scribe
///
/// Autosave never produces one of these: snapshot write failures are logged
/// and retried on the next tick.
#[derive(Error, Debug)]
pub enum ScribeError {
    /// Reading or writing a document or state file failed
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot storage failure outside of autosave
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A persisted snapshot could not be read back
    #[error("Snapshot {id} unreadable: {source}")]
    SnapshotUnreadable {
        id: SessionId,
        #[source]
        source: StorageError,
    },

    /// Save was requested for a document without a backing file
    #[error("Document {0} has no file path")]
    NoPath(SessionId),

    /// A clean-only operation was requested for a dirty document
    #[error("Document {0} has unsaved changes")]
    UnsavedChanges(SessionId),

    /// No open document has the given session id
    #[error("Document not found: {0}")]
    DocumentNotFound(SessionId),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rejected user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ScribeError {
    /// IO error with the path it happened on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Short message suitable for showing to the person editing
    pub fn user_message(&self) -> String {
        match self {
            Self::Io { path, .. } => format!("Unable to access {}.", path.display()),
            Self::Storage(_) => "Autosave storage unavailable.".to_string(),
            Self::SnapshotUnreadable { .. } => "Autosave snapshot unreadable.".to_string(),
            Self::NoPath(_) => "No file name yet; use save-as.".to_string(),
            Self::UnsavedChanges(_) => "You have unsaved changes.".to_string(),
            Self::DocumentNotFound(_) => "That document is no longer open.".to_string(),
            Self::Config(message) | Self::InvalidInput(message) => message.clone(),
        }
    }
}
