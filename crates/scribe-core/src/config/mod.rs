//! Persisted editor configuration
//!
//! - [`StateLocations`]: where the state file and autosave snapshots live
//! - [`EditorState`]: recent files and options restored across runs

mod locations;
mod state;

pub use locations::{STATE_DIR_ENV, StateLocations};
pub use state::EditorState;
