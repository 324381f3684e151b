//! Editor facade
//!
//! Owns the workspace, the autosave scheduler and recovery, and keeps the
//! snapshot directory and `state.json` consistent with what the user does.

use crate::autosave::{AutosaveReport, AutosaveScheduler};
use crate::config::{EditorState, StateLocations};
use crate::editing::MacroRecorder;
use crate::error::{ScribeError, ScribeResult};
use crate::recovery::Recovery;
use crate::workspace::{CloseMode, CloseOutcome, Workspace};
use scribe_session::{
    LocalSnapshotStorage, SessionId, SnapshotRead, SnapshotStorage, StorageError,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct Editor {
    workspace: Workspace,
    autosave: AutosaveScheduler,
    recovery: Recovery,
    storage: Arc<dyn SnapshotStorage>,
    state: EditorState,
    /// Where `state` is persisted; None keeps it in memory only
    state_file: Option<PathBuf>,
    macros: MacroRecorder,
}

impl Editor {
    /// Open an editor on the given state directory
    pub fn open(locations: &StateLocations) -> ScribeResult<Self> {
        let storage = Arc::new(LocalSnapshotStorage::with_path(locations.autosave_dir()));
        let state_file = locations.state_file();
        let state = EditorState::load(&state_file);
        debug!("Editor state directory: {:?}", locations.state_dir());
        Ok(Self::with_storage(storage, state, Some(state_file)))
    }

    /// Build an editor around any snapshot backend
    pub fn with_storage(
        storage: Arc<dyn SnapshotStorage>,
        state: EditorState,
        state_file: Option<PathBuf>,
    ) -> Self {
        let mut workspace = Workspace::new().with_recent(state.recent());
        workspace.set_save_on_focus_lost(state.save_on_focus_lost);

        let autosave =
            AutosaveScheduler::new(storage.clone()).with_interval(state.autosave_interval());
        let recovery = Recovery::new(storage.clone());

        Self {
            workspace,
            autosave,
            recovery,
            storage,
            state,
            state_file,
            macros: MacroRecorder::new(),
        }
    }

    // ========== Accessors ==========

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn storage(&self) -> &Arc<dyn SnapshotStorage> {
        &self.storage
    }

    pub fn autosave_interval(&self) -> Duration {
        self.autosave.interval()
    }

    pub fn macros(&self) -> &MacroRecorder {
        &self.macros
    }

    pub fn macros_mut(&mut self) -> &mut MacroRecorder {
        &mut self.macros
    }

    /// The active document's id, or an error when nothing is open
    pub fn active_id(&self) -> ScribeResult<SessionId> {
        self.workspace
            .active_id()
            .cloned()
            .ok_or_else(|| ScribeError::invalid_input("No document is open"))
    }

    // ========== Autosave ==========

    /// Run one autosave sweep
    pub async fn autosave_tick(&mut self) -> AutosaveReport {
        let report = self.autosave.tick(&self.workspace).await;
        if !report.is_idle() {
            debug!("Autosave sweep: {:?}", report);
        }
        report
    }

    /// Change the autosave interval and persist it
    pub fn set_autosave_seconds(&mut self, seconds: u64) -> ScribeResult<()> {
        self.state.set_autosave_seconds(seconds)?;
        self.autosave.set_interval(self.state.autosave_interval());
        self.persist_state();
        Ok(())
    }

    pub fn set_save_on_focus_lost(&mut self, enabled: bool) {
        self.state.save_on_focus_lost = enabled;
        self.workspace.set_save_on_focus_lost(enabled);
        self.persist_state();
    }

    // ========== Files ==========

    pub async fn open_file(&mut self, path: impl AsRef<Path>) -> ScribeResult<SessionId> {
        let id = self.workspace.open_file(path).await?;
        self.persist_state();
        Ok(id)
    }

    /// Save a document; its recovery snapshot is no longer needed
    pub async fn save(&mut self, id: &SessionId) -> ScribeResult<PathBuf> {
        let path = self.workspace.save(id).await?;
        self.drop_snapshot(id).await;
        self.persist_state();
        Ok(path)
    }

    pub async fn save_as(&mut self, id: &SessionId, path: impl AsRef<Path>) -> ScribeResult<PathBuf> {
        let path = self.workspace.save_as(id, path).await?;
        self.drop_snapshot(id).await;
        self.persist_state();
        Ok(path)
    }

    /// Handle a document losing focus; returns whether it was saved
    pub async fn focus_lost(&mut self, id: &SessionId) -> ScribeResult<bool> {
        let saved = self.workspace.focus_lost(id).await?;
        if saved {
            self.drop_snapshot(id).await;
            self.persist_state();
        }
        Ok(saved)
    }

    /// Close a document
    ///
    /// A clean document takes its snapshot with it. Discarded changes stay
    /// recoverable, swept to storage once more before the document goes.
    /// Closing the last document opens an empty one.
    pub async fn close(&mut self, id: &SessionId, mode: CloseMode) -> ScribeResult<CloseOutcome> {
        if matches!(mode, CloseMode::Discard) && self.workspace.is_dirty(id)? {
            self.autosave_tick().await;
        }
        let outcome = self.workspace.close(id, mode)?;
        if outcome.was_dirty {
            self.autosave.forget(id);
        } else {
            self.drop_snapshot(id).await;
        }

        if self.workspace.is_empty() {
            self.workspace.new_document();
        }
        Ok(outcome)
    }

    // ========== Recovery ==========

    pub async fn list_snapshots(&self) -> ScribeResult<Vec<SnapshotRead>> {
        self.recovery.list_snapshots().await
    }

    /// Reopen a snapshot by session id
    pub async fn recover(&mut self, id: &SessionId) -> ScribeResult<SessionId> {
        self.recovery.recover_id(id, &mut self.workspace).await
    }

    /// Reopen the newest readable snapshot
    pub async fn recover_latest(&mut self) -> ScribeResult<Option<SessionId>> {
        self.recovery.recover_latest(&mut self.workspace).await
    }

    pub async fn discard_snapshot(&mut self, id: &SessionId) -> ScribeResult<()> {
        self.recovery.discard(id).await?;
        self.autosave.forget(id);
        Ok(())
    }

    /// Remove a session's snapshot, if it has one
    async fn drop_snapshot(&mut self, id: &SessionId) {
        self.autosave.forget(id);
        match self.storage.delete(id).await {
            Ok(()) => debug!("Removed snapshot {}", id),
            Err(StorageError::NotFound(_)) => {}
            Err(e) => warn!("Could not remove snapshot {}: {}", id, e),
        }
    }

    // ========== Macros ==========

    /// Replay the recorded macro into the active document
    pub fn play_macro(&mut self) -> ScribeResult<usize> {
        let id = self.active_id()?;
        let doc = self.workspace.get_mut(&id)?;
        Ok(self.macros.play(doc.buffer_mut()))
    }

    // ========== State ==========

    /// Write `state.json`; failures are logged, never returned
    pub fn persist_state(&mut self) {
        self.state.recent_files = self.workspace.recent_files().as_slice().to_vec();
        let Some(path) = &self.state_file else {
            return;
        };
        if let Err(e) = self.state.save(path) {
            warn!("Could not save editor state: {}", e);
        }
    }

    /// Final sweep and state write before exiting
    pub async fn shutdown(&mut self) -> AutosaveReport {
        let report = self.autosave_tick().await;
        self.persist_state();
        info!(
            "Shut down with {} unsaved document(s)",
            self.workspace.dirty_documents().count()
        );
        report
    }
}
