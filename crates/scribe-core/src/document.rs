//! Open documents
//!
//! A document couples a text buffer with the change tracker subscribed to
//! it. The subscription is made once at creation and removed when the
//! document is closed.

use crate::buffer::{SubscriptionId, TextBuffer};
use crate::editing::indent;
use crate::fingerprint::Fingerprint;
use crate::tracker::ChangeTracker;
use scribe_session::{SessionId, Snapshot};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Title used for documents without a backing file
pub const UNTITLED: &str = "Untitled";

/// An open document
#[derive(Debug)]
pub struct Document {
    id: SessionId,
    path: Option<PathBuf>,
    buffer: TextBuffer,
    tracker: Arc<ChangeTracker>,
    subscription: Option<SubscriptionId>,
}

impl Document {
    /// Create an empty, clean, untitled document
    pub fn new_empty() -> Self {
        Self::from_text(None, "")
    }

    /// Create a clean document from existing content
    pub fn from_text(path: Option<PathBuf>, text: impl Into<String>) -> Self {
        Self::with_id(SessionId::new(), path, text)
    }

    /// Create a clean document under a given session id
    pub fn with_id(id: SessionId, path: Option<PathBuf>, text: impl Into<String>) -> Self {
        let mut buffer = TextBuffer::from_text(text);
        let tracker = Arc::new(ChangeTracker::new(buffer.text()));
        let subscription = Some(buffer.subscribe(tracker.clone()));

        Self {
            id,
            path,
            buffer,
            tracker,
            subscription,
        }
    }

    /// Open a document from a snapshot
    ///
    /// The text has never been confirmed saved, so the document starts dirty.
    pub fn from_snapshot(id: SessionId, snapshot: &Snapshot) -> Self {
        let doc = Self::with_id(id, snapshot.file_path.clone(), snapshot.text.clone());
        doc.tracker.mark_dirty();
        doc
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Mutable access to the buffer; every edit reaches the tracker
    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    pub fn get_full_text(&self) -> String {
        self.buffer.get_full_text()
    }

    pub fn is_dirty(&self) -> bool {
        self.tracker.is_dirty()
    }

    /// Record the current text as saved
    pub fn mark_saved(&mut self) {
        self.tracker.mark_saved(self.buffer.text());
    }

    /// Fingerprint of the current text
    pub fn fingerprint(&self) -> Fingerprint {
        self.tracker.current_fingerprint()
    }

    /// Build a snapshot of the current text
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.id.clone(), self.path.clone(), self.buffer.get_full_text())
    }

    /// File name, or "Untitled"
    pub fn display_name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED.to_string())
    }

    /// Display name with a `*` marker while dirty
    pub fn tab_title(&self) -> String {
        let name = self.display_name();
        if self.is_dirty() {
            format!("{} *", name)
        } else {
            name
        }
    }

    /// One-line summary: name, save state, cursor position and size
    pub fn status_line(&self, extra: Option<&str>) -> String {
        let name = self
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| UNTITLED.to_string());
        let state = if self.is_dirty() { "Unsaved" } else { "Saved" };
        let (line, col) = self.buffer.line_col(self.buffer.cursor());

        let mut status = format!(
            "{} | {} | Ln {}, Col {} | {} chars",
            name,
            state,
            line,
            col,
            self.buffer.len_chars()
        );
        if let Some(extra) = extra.filter(|e| !e.is_empty()) {
            status.push_str(" | ");
            status.push_str(extra);
        }
        status
    }

    /// Insert a newline carrying the current line's indentation
    pub fn auto_newline(&mut self) -> bool {
        let indent = indent::newline_indent(self.buffer.current_line());
        self.buffer.insert_at_cursor(&format!("\n{}", indent))
    }

    /// Stop the tracker from following buffer changes; false if it was
    /// already detached
    fn detach(&mut self) -> bool {
        match self.subscription.take() {
            Some(subscription) => self.buffer.unsubscribe(subscription),
            None => false,
        }
    }

    /// Close the document, detaching its tracker from the buffer
    pub fn close(mut self) -> SessionId {
        self.detach();
        debug!("Closed document {}", self.id);
        self.id
    }
}
