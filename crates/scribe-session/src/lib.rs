//! Autosave snapshot persistence for Scribe
//!
//! This crate provides the recovery side of editing sessions:
//! - Session identifiers for open documents
//! - Snapshot records of a document's full text
//! - Trait-based snapshot storage with a local file backend

pub mod snapshot;
pub mod storage;

pub use snapshot::{SessionId, Snapshot};
pub use storage::{
    LocalSnapshotStorage, MemorySnapshotStorage, SnapshotListing, SnapshotRead, SnapshotStorage,
    StorageError, StorageResult,
};
