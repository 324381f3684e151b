//! Dirty-state tracking via content fingerprints
//!
//! A document is dirty exactly when the fingerprint of its current text
//! differs from the fingerprint recorded at the last save. The flag is
//! recomputed on every change notification, so editing back to the saved
//! text makes the document clean again.

use crate::buffer::{ChangeEvent, ChangeListener};
use crate::fingerprint::Fingerprint;
use parking_lot::Mutex;
use tracing::trace;

#[derive(Debug)]
struct TrackerState {
    /// None until the text has been confirmed saved once
    last_saved: Option<Fingerprint>,
    current: Fingerprint,
    dirty: bool,
}

/// Change tracker for one document
///
/// Shared between the buffer (as a subscriber) and the document (which
/// queries it), hence the interior mutability.
#[derive(Debug)]
pub struct ChangeTracker {
    state: Mutex<TrackerState>,
}

impl ChangeTracker {
    /// Start tracking from `initial_text`, which counts as saved
    pub fn new(initial_text: &str) -> Self {
        let fingerprint = Fingerprint::of(initial_text);
        Self {
            state: Mutex::new(TrackerState {
                last_saved: Some(fingerprint.clone()),
                current: fingerprint,
                dirty: false,
            }),
        }
    }

    /// Recompute the fingerprint of `text` and return the new dirty flag
    pub fn on_content_changed(&self, text: &str) -> bool {
        let current = Fingerprint::of(text);
        let mut state = self.state.lock();
        state.dirty = state.last_saved.as_ref() != Some(&current);
        state.current = current;
        trace!(
            "fingerprint {} dirty={}",
            state.current.short(),
            state.dirty
        );
        state.dirty
    }

    /// Record `text` as saved
    pub fn mark_saved(&self, text: &str) {
        let fingerprint = Fingerprint::of(text);
        let mut state = self.state.lock();
        state.last_saved = Some(fingerprint.clone());
        state.current = fingerprint;
        state.dirty = false;
    }

    /// Forget the saved fingerprint; the text stays dirty until saved
    pub fn mark_dirty(&self) {
        let mut state = self.state.lock();
        state.last_saved = None;
        state.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.state.lock().dirty
    }

    /// Fingerprint of the text as of the last notification
    pub fn current_fingerprint(&self) -> Fingerprint {
        self.state.lock().current.clone()
    }

    pub fn last_saved_fingerprint(&self) -> Option<Fingerprint> {
        self.state.lock().last_saved.clone()
    }
}

impl ChangeListener for ChangeTracker {
    fn on_content_changed(&self, event: &ChangeEvent<'_>) {
        ChangeTracker::on_content_changed(self, event.text);
    }
}
