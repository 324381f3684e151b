//! Snapshot storage abstraction and implementations
//!
//! Provides trait-based storage for autosave snapshots with a
//! local filesystem implementation and an in-memory one for tests.

mod local;
mod memory;

pub use local::LocalSnapshotStorage;
pub use memory::MemorySnapshotStorage;

use crate::{SessionId, Snapshot};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Snapshot not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid session id: {0}")]
    InvalidId(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A persisted snapshot as seen by a directory scan, before it is parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotListing {
    /// Session the snapshot belongs to
    pub session_id: SessionId,

    /// Last write time of the snapshot
    pub modified: DateTime<Utc>,

    /// Location on disk (None for non-file backends)
    pub path: Option<PathBuf>,
}

/// Outcome of reading one listed snapshot
///
/// A failed read only affects its own entry.
#[derive(Debug)]
pub struct SnapshotRead {
    /// The listing the read was attempted for
    pub listing: SnapshotListing,

    /// The parsed snapshot, or why it could not be read
    pub snapshot: StorageResult<Snapshot>,
}

impl SnapshotRead {
    /// Whether the snapshot parsed successfully
    pub fn is_readable(&self) -> bool {
        self.snapshot.is_ok()
    }

    /// The parsed snapshot, if readable
    pub fn readable(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref().ok()
    }

    /// Consume into the parsed snapshot, if readable
    pub fn into_snapshot(self) -> Option<Snapshot> {
        self.snapshot.ok()
    }
}

/// Snapshot storage trait for different backends
#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Write a snapshot, fully replacing any previous one for the session
    async fn save(&self, snapshot: &Snapshot) -> StorageResult<()>;

    /// Load the snapshot of a session
    async fn load(&self, id: &SessionId) -> StorageResult<Snapshot>;

    /// Delete the snapshot of a session
    async fn delete(&self, id: &SessionId) -> StorageResult<()>;

    /// Check if a session has a snapshot
    async fn exists(&self, id: &SessionId) -> StorageResult<bool>;

    /// List persisted snapshots, most recently written first
    async fn list(&self) -> StorageResult<Vec<SnapshotListing>>;

    /// List and read every snapshot, keeping per-entry failures
    async fn load_all(&self) -> StorageResult<Vec<SnapshotRead>> {
        let listings = self.list().await?;
        let mut reads = Vec::with_capacity(listings.len());
        for listing in listings {
            let snapshot = self.load(&listing.session_id).await;
            reads.push(SnapshotRead { listing, snapshot });
        }
        Ok(reads)
    }

    /// The most recently written snapshot that can be read
    async fn latest(&self) -> StorageResult<Option<Snapshot>> {
        for read in self.load_all().await? {
            if let Ok(snapshot) = read.snapshot {
                return Ok(Some(snapshot));
            }
        }
        Ok(None)
    }
}
