//! Editor state restored across runs

use crate::autosave::{DEFAULT_AUTOSAVE_SECONDS, MAX_AUTOSAVE_SECONDS, MIN_AUTOSAVE_SECONDS};
use crate::error::{ScribeError, ScribeResult};
use crate::recent::RecentFiles;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Contents of `state.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorState {
    /// Recently opened files, most recent first
    pub recent_files: Vec<PathBuf>,

    /// Seconds between autosave sweeps
    pub autosave_seconds: u64,

    /// Save a dirty document with a file when it loses focus
    pub save_on_focus_lost: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            recent_files: Vec::new(),
            autosave_seconds: DEFAULT_AUTOSAVE_SECONDS,
            save_on_focus_lost: false,
        }
    }
}

impl EditorState {
    /// Load from `path`
    ///
    /// A missing or unreadable file yields the defaults; state is a
    /// convenience and never blocks startup.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No state file at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::load_strict(path) {
            Ok(state) => state,
            Err(e) => {
                warn!("Ignoring state file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Load from `path`, reporting any problem
    pub fn load_strict(path: impl AsRef<Path>) -> ScribeResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ScribeError::io(path, e))?;
        let mut state: Self = serde_json::from_str(&content)
            .map_err(|e| ScribeError::config(format!("Invalid state file {:?}: {}", path, e)))?;
        state.normalize();
        Ok(state)
    }

    /// Write to `path`, creating the parent directory
    pub fn save(&self, path: impl AsRef<Path>) -> ScribeResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ScribeError::io(parent, e))?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ScribeError::config(format!("Cannot serialize state: {}", e)))?;
        std::fs::write(path, content).map_err(|e| ScribeError::io(path, e))?;
        debug!("Saved editor state to {:?}", path);
        Ok(())
    }

    /// Clamp values read from disk into their valid ranges
    fn normalize(&mut self) {
        self.autosave_seconds = self
            .autosave_seconds
            .clamp(MIN_AUTOSAVE_SECONDS, MAX_AUTOSAVE_SECONDS);
        self.recent_files = self.recent().as_slice().to_vec();
    }

    /// Set the autosave interval, rejecting values outside 5..=600 seconds
    pub fn set_autosave_seconds(&mut self, seconds: u64) -> ScribeResult<()> {
        if !(MIN_AUTOSAVE_SECONDS..=MAX_AUTOSAVE_SECONDS).contains(&seconds) {
            return Err(ScribeError::invalid_input(format!(
                "Autosave interval must be between {} and {} seconds",
                MIN_AUTOSAVE_SECONDS, MAX_AUTOSAVE_SECONDS
            )));
        }
        self.autosave_seconds = seconds;
        Ok(())
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_seconds)
    }

    pub fn recent(&self) -> RecentFiles {
        RecentFiles::from_paths(self.recent_files.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let state = EditorState::default();
        assert_eq!(state.autosave_interval(), Duration::from_secs(15));
        assert!(!state.save_on_focus_lost);
        assert!(state.recent_files.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let state = EditorState {
            recent_files: vec![PathBuf::from("/a.txt"), PathBuf::from("/b.txt")],
            autosave_seconds: 30,
            save_on_focus_lost: true,
        };
        state.save(&path).unwrap();

        assert_eq!(EditorState::load(&path), state);
    }

    #[test]
    fn test_missing_and_corrupt_fall_back() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("none.json");
        assert_eq!(EditorState::load(&missing), EditorState::default());

        let corrupt = dir.path().join("state.json");
        std::fs::write(&corrupt, "{ nope").unwrap();
        assert_eq!(EditorState::load(&corrupt), EditorState::default());
        assert!(matches!(
            EditorState::load_strict(&corrupt),
            Err(ScribeError::Config(_))
        ));
    }

    #[test]
    fn test_partial_file_and_clamping() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"autosave_seconds": 2}"#).unwrap();

        let state = EditorState::load(&path);
        assert_eq!(state.autosave_seconds, 5);
        assert!(!state.save_on_focus_lost);

        std::fs::write(&path, r#"{"autosave_seconds": 100000}"#).unwrap();
        assert_eq!(EditorState::load(&path).autosave_seconds, 600);
    }

    #[test]
    fn test_set_autosave_seconds_bounds() {
        let mut state = EditorState::default();
        assert!(state.set_autosave_seconds(4).is_err());
        assert!(state.set_autosave_seconds(601).is_err());
        state.set_autosave_seconds(60).unwrap();
        assert_eq!(state.autosave_seconds, 60);
    }
}
