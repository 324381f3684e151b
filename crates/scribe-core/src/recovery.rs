//! Listing, reopening and discarding autosave snapshots

use crate::error::{ScribeError, ScribeResult};
use crate::workspace::Workspace;
use scribe_session::{SessionId, Snapshot, SnapshotRead, SnapshotStorage, StorageError};
use std::sync::Arc;
use tracing::{info, warn};

/// Access to the snapshots left behind by earlier sessions
#[derive(Clone)]
pub struct Recovery {
    storage: Arc<dyn SnapshotStorage>,
}

impl Recovery {
    pub fn new(storage: Arc<dyn SnapshotStorage>) -> Self {
        Self { storage }
    }

    /// Every persisted snapshot, most recently written first
    ///
    /// An unreadable file shows up as a failed entry; the rest are still
    /// returned.
    pub async fn list_snapshots(&self) -> ScribeResult<Vec<SnapshotRead>> {
        let reads = self.storage.load_all().await?;
        for read in reads.iter().filter(|r| !r.is_readable()) {
            if let Err(e) = &read.snapshot {
                warn!("Snapshot {} unreadable: {}", read.listing.session_id, e);
            }
        }
        Ok(reads)
    }

    /// Read one snapshot
    pub async fn load(&self, id: &SessionId) -> ScribeResult<Snapshot> {
        self.storage.load(id).await.map_err(|source| match source {
            StorageError::Io(_) | StorageError::Serialization(_) => ScribeError::SnapshotUnreadable {
                id: id.clone(),
                source,
            },
            other => ScribeError::Storage(other),
        })
    }

    /// Reopen a snapshot as a dirty document and make it active
    pub fn recover(&self, snapshot: &Snapshot, workspace: &mut Workspace) -> SessionId {
        workspace.recover(snapshot)
    }

    /// Load a snapshot by id and reopen it
    pub async fn recover_id(&self, id: &SessionId, workspace: &mut Workspace) -> ScribeResult<SessionId> {
        let snapshot = self.load(id).await?;
        Ok(self.recover(&snapshot, workspace))
    }

    /// Reopen the newest readable snapshot, if there is one
    pub async fn recover_latest(&self, workspace: &mut Workspace) -> ScribeResult<Option<SessionId>> {
        match self.storage.latest().await? {
            Some(snapshot) => Ok(Some(self.recover(&snapshot, workspace))),
            None => Ok(None),
        }
    }

    /// Delete one snapshot
    pub async fn discard(&self, id: &SessionId) -> ScribeResult<()> {
        self.storage.delete(id).await?;
        info!("Discarded snapshot {}", id);
        Ok(())
    }

    /// Delete every snapshot, readable or not; returns how many went
    pub async fn discard_all(&self) -> ScribeResult<usize> {
        let mut removed = 0;
        for listing in self.storage.list().await? {
            match self.storage.delete(&listing.session_id).await {
                Ok(()) => removed += 1,
                Err(e) => warn!("Could not delete snapshot {}: {}", listing.session_id, e),
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_session::{LocalSnapshotStorage, MemorySnapshotStorage};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_recover_opens_dirty_document() {
        let storage = Arc::new(MemorySnapshotStorage::new());
        let snapshot = Snapshot::new(SessionId::new(), None, "draft content");
        storage.save(&snapshot).await.unwrap();

        let recovery = Recovery::new(storage.clone());
        let mut ws = Workspace::new();
        let id = recovery
            .recover_id(&snapshot.session_id, &mut ws)
            .await
            .unwrap();

        let doc = ws.active().unwrap();
        assert_eq!(doc.id(), &id);
        assert_eq!(doc.get_full_text(), "draft content");
        assert!(doc.is_dirty());

        // The snapshot stays until the document is saved or closed clean
        assert!(storage.exists(&snapshot.session_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(LocalSnapshotStorage::with_path(dir.path()));
        let good = Snapshot::new(SessionId::new(), None, "kept");
        storage.save(&good).await.unwrap();

        let bad: SessionId = "broken".parse().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        let recovery = Recovery::new(storage);
        let reads = recovery.list_snapshots().await.unwrap();
        assert_eq!(reads.len(), 2);
        assert_eq!(reads.iter().filter(|r| r.is_readable()).count(), 1);

        let err = recovery.load(&bad).await.unwrap_err();
        assert_eq!(err.user_message(), "Autosave snapshot unreadable.");

        let mut ws = Workspace::new();
        let id = recovery.recover_latest(&mut ws).await.unwrap().unwrap();
        assert_eq!(ws.get(&id).unwrap().get_full_text(), "kept");
    }

    #[tokio::test]
    async fn test_load_missing_is_storage_error() {
        let recovery = Recovery::new(Arc::new(MemorySnapshotStorage::new()));
        let err = recovery.load(&SessionId::new()).await.unwrap_err();
        assert!(matches!(err, ScribeError::Storage(StorageError::NotFound(_))));

        let mut ws = Workspace::new();
        assert!(recovery.recover_latest(&mut ws).await.unwrap().is_none());
        assert!(ws.is_empty());
    }

    #[tokio::test]
    async fn test_discard() {
        let storage = Arc::new(MemorySnapshotStorage::new());
        for text in ["a", "b", "c"] {
            storage
                .save(&Snapshot::new(SessionId::new(), None, text))
                .await
                .unwrap();
        }
        let recovery = Recovery::new(storage.clone());

        let first = recovery.list_snapshots().await.unwrap()[0]
            .listing
            .session_id
            .clone();
        recovery.discard(&first).await.unwrap();
        assert_eq!(storage.len().await, 2);

        assert_eq!(recovery.discard_all().await.unwrap(), 2);
        assert!(storage.is_empty().await);
    }
}
