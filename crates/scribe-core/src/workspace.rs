//! Application state: the open documents and recent files
//!
//! Documents are kept in the order they were opened and looked up by
//! session id. One of them may be active.

use crate::document::Document;
use crate::error::{ScribeError, ScribeResult};
use crate::recent::{RecentFiles, absolute};
use scribe_session::{SessionId, Snapshot};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

/// How to treat unsaved changes when closing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseMode {
    /// Refuse to close a dirty document
    IfClean,
    /// Close even if there are unsaved changes
    Discard,
}

/// What was closed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseOutcome {
    pub id: SessionId,
    pub path: Option<PathBuf>,
    /// Whether unsaved changes were discarded
    pub was_dirty: bool,
}

/// The set of open documents plus editor-wide state
#[derive(Debug, Default)]
pub struct Workspace {
    documents: Vec<Document>,
    active: Option<SessionId>,
    recent: RecentFiles,
    save_on_focus_lost: bool,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a persisted recent-files list
    pub fn with_recent(mut self, recent: RecentFiles) -> Self {
        self.recent = recent;
        self
    }

    // ========== Lookup ==========

    fn position(&self, id: &SessionId) -> ScribeResult<usize> {
        self.documents
            .iter()
            .position(|d| d.id() == id)
            .ok_or_else(|| ScribeError::DocumentNotFound(id.clone()))
    }

    pub fn get(&self, id: &SessionId) -> ScribeResult<&Document> {
        let index = self.position(id)?;
        Ok(&self.documents[index])
    }

    pub fn get_mut(&mut self, id: &SessionId) -> ScribeResult<&mut Document> {
        let index = self.position(id)?;
        Ok(&mut self.documents[index])
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.documents.iter().any(|d| d.id() == id)
    }

    /// Open documents in opening order
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    /// Open documents with unsaved changes
    pub fn dirty_documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter().filter(|d| d.is_dirty())
    }

    /// Document at 0-based position in opening order
    pub fn nth(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    /// Document open on `path`, compared as absolute paths
    pub fn find_by_path(&self, path: impl AsRef<Path>) -> Option<&Document> {
        let wanted = absolute(path.as_ref());
        self.documents
            .iter()
            .find(|d| d.path().map(absolute).as_ref() == Some(&wanted))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn active_id(&self) -> Option<&SessionId> {
        self.active.as_ref()
    }

    pub fn active(&self) -> Option<&Document> {
        let id = self.active.as_ref()?;
        self.documents.iter().find(|d| d.id() == id)
    }

    pub fn active_mut(&mut self) -> Option<&mut Document> {
        let id = self.active.clone()?;
        self.documents.iter_mut().find(|d| *d.id() == id)
    }

    pub fn activate(&mut self, id: &SessionId) -> ScribeResult<()> {
        self.position(id)?;
        self.active = Some(id.clone());
        Ok(())
    }

    // ========== Tracker queries ==========

    pub fn is_dirty(&self, id: &SessionId) -> ScribeResult<bool> {
        Ok(self.get(id)?.is_dirty())
    }

    pub fn mark_saved(&mut self, id: &SessionId) -> ScribeResult<()> {
        self.get_mut(id)?.mark_saved();
        Ok(())
    }

    // ========== Lifecycle ==========

    /// Add a document and make it active
    pub fn insert_document(&mut self, doc: Document) -> SessionId {
        let id = doc.id().clone();
        self.documents.push(doc);
        self.active = Some(id.clone());
        id
    }

    /// Open a new empty document
    pub fn new_document(&mut self) -> SessionId {
        self.insert_document(Document::new_empty())
    }

    /// Open `path`, or activate the document already showing it
    ///
    /// Invalid UTF-8 is replaced rather than refused.
    pub async fn open_file(&mut self, path: impl AsRef<Path>) -> ScribeResult<SessionId> {
        let path = absolute(path.as_ref());

        if let Some(existing) = self.find_by_path(&path) {
            let id = existing.id().clone();
            debug!("{:?} already open as {}", path, id);
            self.active = Some(id.clone());
            return Ok(id);
        }

        let bytes = fs::read(&path)
            .await
            .map_err(|e| ScribeError::io(&path, e))?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!("{:?} is not valid UTF-8, replacing invalid bytes", path);
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        let id = self.insert_document(Document::from_text(Some(path.clone()), text));
        self.recent.add(&path);
        info!("Opened {:?} as {}", path, id);
        Ok(id)
    }

    /// Write a document to its file and mark it saved
    pub async fn save(&mut self, id: &SessionId) -> ScribeResult<PathBuf> {
        let doc = self.get_mut(id)?;
        let path = doc
            .path()
            .map(Path::to_path_buf)
            .ok_or_else(|| ScribeError::NoPath(id.clone()))?;

        fs::write(&path, doc.buffer().text())
            .await
            .map_err(|e| ScribeError::io(&path, e))?;
        doc.mark_saved();

        self.recent.add(&path);
        info!("Saved {} to {:?}", id, path);
        Ok(path)
    }

    /// Give a document a new file path, then save it
    pub async fn save_as(&mut self, id: &SessionId, path: impl AsRef<Path>) -> ScribeResult<PathBuf> {
        let path = absolute(path.as_ref());
        self.get_mut(id)?.set_path(path);
        self.save(id).await
    }

    /// Save a dirty document that has a file, when save-on-focus-lost is on
    pub async fn focus_lost(&mut self, id: &SessionId) -> ScribeResult<bool> {
        if !self.save_on_focus_lost {
            return Ok(false);
        }
        let doc = self.get(id)?;
        if !doc.is_dirty() || doc.path().is_none() {
            return Ok(false);
        }
        self.save(id).await?;
        Ok(true)
    }

    /// Close a document
    pub fn close(&mut self, id: &SessionId, mode: CloseMode) -> ScribeResult<CloseOutcome> {
        let index = self.position(id)?;
        let was_dirty = self.documents[index].is_dirty();
        if was_dirty && mode == CloseMode::IfClean {
            return Err(ScribeError::UnsavedChanges(id.clone()));
        }

        let doc = self.documents.remove(index);
        let path = doc.path().map(Path::to_path_buf);
        doc.close();

        if self.active.as_ref() == Some(id) {
            let next = index.min(self.documents.len().saturating_sub(1));
            self.active = self.documents.get(next).map(|d| d.id().clone());
        }

        Ok(CloseOutcome {
            id: id.clone(),
            path,
            was_dirty,
        })
    }

    /// Open a snapshot as a new, dirty document
    ///
    /// The document takes over the snapshot's session id so later autosaves
    /// replace that snapshot, unless the id is already in use. The file on
    /// disk is not touched.
    pub fn recover(&mut self, snapshot: &Snapshot) -> SessionId {
        let id = if self.contains(&snapshot.session_id) {
            SessionId::new()
        } else {
            snapshot.session_id.clone()
        };
        let id = self.insert_document(Document::from_snapshot(id, snapshot));
        info!("Recovered snapshot {} as {}", snapshot.session_id, id);
        id
    }

    // ========== Settings ==========

    pub fn recent_files(&self) -> &RecentFiles {
        &self.recent
    }

    pub fn recent_files_mut(&mut self) -> &mut RecentFiles {
        &mut self.recent
    }

    pub fn save_on_focus_lost(&self) -> bool {
        self.save_on_focus_lost
    }

    pub fn set_save_on_focus_lost(&mut self, enabled: bool) {
        self.save_on_focus_lost = enabled;
    }
}
