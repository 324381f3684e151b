//! Periodic recovery snapshots of dirty documents
//!
//! The scheduler does not own a timer. The front end calls [`tick`] from
//! the same event loop that applies edits, so a sweep never overlaps an
//! edit.
//!
//! [`tick`]: AutosaveScheduler::tick

use crate::fingerprint::Fingerprint;
use crate::workspace::Workspace;
use scribe_session::{SessionId, SnapshotStorage};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default seconds between sweeps
pub const DEFAULT_AUTOSAVE_SECONDS: u64 = 15;
/// Shortest interval a user may configure
pub const MIN_AUTOSAVE_SECONDS: u64 = 5;
/// Longest interval a user may configure
pub const MAX_AUTOSAVE_SECONDS: u64 = 600;

/// What one sweep did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutosaveReport {
    /// Snapshots written
    pub written: usize,
    /// Documents skipped because they had no unsaved changes
    pub skipped_clean: usize,
    /// Dirty documents whose content was already snapshotted
    pub skipped_unchanged: usize,
    /// Writes that failed and will be retried next sweep
    pub failed: usize,
}

impl AutosaveReport {
    pub fn is_idle(&self) -> bool {
        self.written == 0 && self.failed == 0
    }
}

/// Writes snapshots of dirty documents, one per session
pub struct AutosaveScheduler {
    storage: Arc<dyn SnapshotStorage>,
    interval: Duration,
    /// Fingerprint of the last snapshot written for each session
    written: HashMap<SessionId, Fingerprint>,
}

impl AutosaveScheduler {
    /// Create a scheduler with the default interval
    pub fn new(storage: Arc<dyn SnapshotStorage>) -> Self {
        Self {
            storage,
            interval: Duration::from_secs(DEFAULT_AUTOSAVE_SECONDS),
            written: HashMap::new(),
        }
    }

    /// Set the interval, clamped to 5..=600 seconds
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.set_interval(interval);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval.clamp(
            Duration::from_secs(MIN_AUTOSAVE_SECONDS),
            Duration::from_secs(MAX_AUTOSAVE_SECONDS),
        );
    }

    /// Forget what was written for a session (its snapshot is gone)
    pub fn forget(&mut self, id: &SessionId) {
        self.written.remove(id);
    }

    /// Whether a snapshot was written for the session's current content
    pub fn is_current(&self, id: &SessionId, fingerprint: &Fingerprint) -> bool {
        self.written.get(id) == Some(fingerprint)
    }

    /// Run one sweep over the open documents
    ///
    /// Failures are logged and counted; they never propagate, so a full
    /// disk cannot interrupt editing.
    pub async fn tick(&mut self, workspace: &Workspace) -> AutosaveReport {
        let mut report = AutosaveReport::default();

        // Closed documents are no longer candidates
        self.written.retain(|id, _| workspace.contains(id));

        for doc in workspace.documents() {
            if !doc.is_dirty() {
                report.skipped_clean += 1;
                continue;
            }

            let fingerprint = doc.fingerprint();
            if self.is_current(doc.id(), &fingerprint) {
                report.skipped_unchanged += 1;
                continue;
            }

            let snapshot = doc.snapshot();
            match self.storage.save(&snapshot).await {
                Ok(()) => {
                    debug!("Autosaved {} ({})", doc.id(), fingerprint.short());
                    self.written.insert(doc.id().clone(), fingerprint);
                    report.written += 1;
                }
                Err(e) => {
                    warn!("Autosave of {} failed, will retry: {}", doc.id(), e);
                    report.failed += 1;
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_session::MemorySnapshotStorage;

    fn scheduler() -> (AutosaveScheduler, Arc<MemorySnapshotStorage>) {
        let storage = Arc::new(MemorySnapshotStorage::new());
        (AutosaveScheduler::new(storage.clone()), storage)
    }

    #[test]
    fn test_interval_clamped() {
        let (default, _) = scheduler();
        assert_eq!(default.interval(), Duration::from_secs(15));

        let fast = default.with_interval(Duration::from_secs(1));
        assert_eq!(fast.interval(), Duration::from_secs(5));

        let (mut slow, _) = scheduler();
        slow.set_interval(Duration::from_secs(3600));
        assert_eq!(slow.interval(), Duration::from_secs(600));
    }

    #[tokio::test]
    async fn test_only_dirty_documents_written() {
        let (mut scheduler, storage) = scheduler();
        let mut ws = Workspace::new();
        let clean = ws.new_document();
        let dirty = ws.new_document();
        ws.get_mut(&dirty)
            .unwrap()
            .buffer_mut()
            .insert_at_cursor("unsaved");

        let report = scheduler.tick(&ws).await;
        assert_eq!(report.written, 1);
        assert_eq!(report.skipped_clean, 1);

        assert!(storage.exists(&dirty).await.unwrap());
        assert!(!storage.exists(&clean).await.unwrap());
        assert_eq!(storage.load(&dirty).await.unwrap().text, "unsaved");
    }

    #[tokio::test]
    async fn test_unchanged_dirty_document_not_rewritten() {
        let (mut scheduler, storage) = scheduler();
        let mut ws = Workspace::new();
        let id = ws.new_document();
        ws.get_mut(&id).unwrap().buffer_mut().insert_at_cursor("a");

        assert_eq!(scheduler.tick(&ws).await.written, 1);
        let second = scheduler.tick(&ws).await;
        assert_eq!(second.written, 0);
        assert_eq!(second.skipped_unchanged, 1);

        ws.get_mut(&id).unwrap().buffer_mut().insert_at_cursor("b");
        assert_eq!(scheduler.tick(&ws).await.written, 1);
        assert_eq!(storage.load(&id).await.unwrap().text, "ab");
    }

    #[tokio::test]
    async fn test_closed_documents_pruned() {
        let (mut scheduler, _) = scheduler();
        let mut ws = Workspace::new();
        let id = ws.new_document();
        ws.get_mut(&id).unwrap().buffer_mut().insert_at_cursor("x");
        scheduler.tick(&ws).await;
        assert_eq!(scheduler.written.len(), 1);

        ws.close(&id, crate::workspace::CloseMode::Discard).unwrap();
        let report = scheduler.tick(&ws).await;
        assert!(report.is_idle());
        assert!(scheduler.written.is_empty());
    }
}
