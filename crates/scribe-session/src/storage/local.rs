//! Local filesystem snapshot storage
//!
//! Stores one JSON file per session in the user's state directory.

use super::{SnapshotListing, SnapshotStorage, StorageError, StorageResult};
use crate::{SessionId, Snapshot};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Local filesystem snapshot storage
///
/// Snapshots are stored as `<session_id>.json` in the given directory,
/// normally `<state dir>/autosave`. The file stem is the session's key; a
/// session id recorded inside the file body is overridden by it on load.
///
/// Each save writes a temporary sibling and renames it over the target,
/// so a reader never observes a half-written snapshot.
pub struct LocalSnapshotStorage {
    /// Directory holding snapshot files
    base_path: PathBuf,
}

impl LocalSnapshotStorage {
    /// Create storage with custom base path
    pub fn with_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Directory holding snapshot files
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Ensure storage directory exists
    async fn ensure_dir(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    /// Get file path for a session ID
    fn snapshot_path(&self, id: &SessionId) -> StorageResult<PathBuf> {
        if !SessionId::is_valid(id.as_str()) {
            return Err(StorageError::InvalidId(id.to_string()));
        }
        Ok(self.base_path.join(format!("{}.json", id)))
    }

    /// Temporary sibling used while a snapshot is being written
    fn temp_path(&self, id: &SessionId) -> PathBuf {
        self.base_path.join(format!(".{}.json.tmp", id))
    }

    /// Build a listing entry for a directory entry, if it is a snapshot file
    async fn listing_for(&self, path: PathBuf) -> StorageResult<Option<SnapshotListing>> {
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            return Ok(None);
        }

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            return Ok(None);
        };
        let session_id = match stem.parse::<SessionId>() {
            Ok(id) => id,
            Err(_) => {
                debug!("Ignoring non-snapshot file {:?}", path);
                return Ok(None);
            }
        };

        let metadata = fs::metadata(&path).await?;
        if !metadata.is_file() {
            return Ok(None);
        }
        let modified: DateTime<Utc> = metadata.modified()?.into();

        Ok(Some(SnapshotListing {
            session_id,
            modified,
            path: Some(path),
        }))
    }
}

#[async_trait]
impl SnapshotStorage for LocalSnapshotStorage {
    async fn save(&self, snapshot: &Snapshot) -> StorageResult<()> {
        let path = self.snapshot_path(&snapshot.session_id)?;
        self.ensure_dir().await?;

        let content = serde_json::to_string_pretty(snapshot)?;
        let temp = self.temp_path(&snapshot.session_id);

        fs::write(&temp, content).await?;
        if let Err(e) = fs::rename(&temp, &path).await {
            // Leave no stray temp file behind on a failed swap
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }

        debug!("Saved snapshot {} to {:?}", snapshot.session_id, path);
        Ok(())
    }

    async fn load(&self, id: &SessionId) -> StorageResult<Snapshot> {
        let path = self.snapshot_path(id)?;

        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }

        let content = fs::read_to_string(&path).await?;
        let mut snapshot: Snapshot = serde_json::from_str(&content)?;
        if snapshot.session_id != *id {
            warn!(
                "Snapshot file {:?} records session {}; using {}",
                path, snapshot.session_id, id
            );
            snapshot.session_id = id.clone();
        }

        debug!("Loaded snapshot {} from {:?}", id, path);
        Ok(snapshot)
    }

    async fn delete(&self, id: &SessionId) -> StorageResult<()> {
        let path = self.snapshot_path(id)?;

        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }

        fs::remove_file(&path).await?;
        debug!("Deleted snapshot {} at {:?}", id, path);

        Ok(())
    }

    async fn exists(&self, id: &SessionId) -> StorageResult<bool> {
        let path = self.snapshot_path(id)?;
        Ok(path.exists())
    }

    async fn list(&self) -> StorageResult<Vec<SnapshotListing>> {
        self.ensure_dir().await?;

        let mut entries = fs::read_dir(&self.base_path).await?;
        let mut listings = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            match self.listing_for(path.clone()).await {
                Ok(Some(listing)) => listings.push(listing),
                Ok(None) => {}
                Err(e) => {
                    warn!("Failed to stat snapshot file {:?}: {}", path, e);
                }
            }
        }

        // Newest first, session id breaks ties so the order is stable
        listings.sort_by(|a, b| {
            b.modified
                .cmp(&a.modified)
                .then_with(|| a.session_id.cmp(&b.session_id))
        });

        Ok(listings)
    }
}
