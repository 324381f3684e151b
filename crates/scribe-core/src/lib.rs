//! Core library for Scribe
//!
//! Scribe tracks whether open documents differ from what was last saved,
//! periodically writes recovery snapshots of the ones that do, and brings
//! those snapshots back as new documents.
//!
//! # Overview
//!
//! - [`buffer::TextBuffer`] owns the text and raises a change notification
//!   after every mutating operation
//! - [`tracker::ChangeTracker`] subscribes to a buffer and derives the dirty
//!   flag from content fingerprints
//! - [`workspace::Workspace`] is the explicit application state: the ordered
//!   set of open documents and the recent-files list
//! - [`autosave::AutosaveScheduler`] writes snapshots of dirty documents on
//!   each timer tick
//! - [`recovery::Recovery`] lists persisted snapshots and reopens them
//! - [`editor::Editor`] wires all of the above together for a front end
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use scribe_core::{Editor, StateLocations};
//!
//! let mut editor = Editor::open(&StateLocations::resolve(None)?)?;
//! let id = editor.workspace_mut().new_document();
//! editor.workspace_mut().get_mut(&id)?.buffer_mut().insert_at_cursor("hello");
//! assert!(editor.workspace().is_dirty(&id)?);
//!
//! // On every timer tick
//! let report = editor.autosave_tick().await;
//! ```

pub mod autosave;
pub mod buffer;
pub mod config;
pub mod document;
pub mod editing;
pub mod editor;
pub mod error;
pub mod fingerprint;
pub mod recent;
pub mod recovery;
pub mod tracker;
pub mod workspace;

pub use autosave::{AutosaveReport, AutosaveScheduler};
pub use buffer::{ChangeEvent, ChangeKind, ChangeListener, SubscriptionId, TextBuffer};
pub use config::{EditorState, StateLocations};
pub use document::Document;
pub use editor::Editor;
pub use error::{ScribeError, ScribeResult};
pub use fingerprint::Fingerprint;
pub use recent::RecentFiles;
pub use recovery::Recovery;
pub use tracker::ChangeTracker;
pub use workspace::{CloseMode, CloseOutcome, Workspace};

pub use scribe_session::{SessionId, Snapshot, SnapshotRead, SnapshotStorage};
