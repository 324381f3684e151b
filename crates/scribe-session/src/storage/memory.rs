//! In-memory snapshot storage implementation

use super::{SnapshotListing, SnapshotStorage, StorageError, StorageResult};
use crate::{SessionId, Snapshot};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory snapshot storage (for testing)
///
/// The write time of an entry is the snapshot's own timestamp.
pub struct MemorySnapshotStorage {
    snapshots: RwLock<HashMap<SessionId, Snapshot>>,
}

impl MemorySnapshotStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            snapshots: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored snapshots
    pub async fn len(&self) -> usize {
        self.snapshots.read().await.len()
    }

    /// Whether no snapshot is stored
    pub async fn is_empty(&self) -> bool {
        self.snapshots.read().await.is_empty()
    }
}

impl Default for MemorySnapshotStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStorage for MemorySnapshotStorage {
    async fn save(&self, snapshot: &Snapshot) -> StorageResult<()> {
        let mut snapshots = self.snapshots.write().await;
        snapshots.insert(snapshot.session_id.clone(), snapshot.clone());
        Ok(())
    }

    async fn load(&self, id: &SessionId) -> StorageResult<Snapshot> {
        let snapshots = self.snapshots.read().await;
        snapshots
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &SessionId) -> StorageResult<()> {
        let mut snapshots = self.snapshots.write().await;
        snapshots
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    async fn exists(&self, id: &SessionId) -> StorageResult<bool> {
        let snapshots = self.snapshots.read().await;
        Ok(snapshots.contains_key(id))
    }

    async fn list(&self) -> StorageResult<Vec<SnapshotListing>> {
        let snapshots = self.snapshots.read().await;
        let mut listings: Vec<_> = snapshots
            .values()
            .map(|s| SnapshotListing {
                session_id: s.session_id.clone(),
                modified: s.timestamp,
                path: None,
            })
            .collect();
        listings.sort_by(|a, b| {
            b.modified
                .cmp(&a.modified)
                .then_with(|| a.session_id.cmp(&b.session_id))
        });
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_memory_round_trip() {
        let storage = MemorySnapshotStorage::new();
        let snap = Snapshot::new(SessionId::new(), None, "memo");

        storage.save(&snap).await.unwrap();
        assert_eq!(storage.load(&snap.session_id).await.unwrap(), snap);
        assert_eq!(storage.len().await, 1);

        storage.delete(&snap.session_id).await.unwrap();
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_memory_list_order() {
        let storage = MemorySnapshotStorage::new();

        let mut older = Snapshot::new(SessionId::new(), None, "older");
        older.timestamp = Utc::now() - Duration::seconds(60);
        let newer = Snapshot::new(SessionId::new(), None, "newer");

        storage.save(&older).await.unwrap();
        storage.save(&newer).await.unwrap();

        let listings = storage.list().await.unwrap();
        assert_eq!(listings[0].session_id, newer.session_id);
        assert_eq!(listings[1].session_id, older.session_id);
    }
}
