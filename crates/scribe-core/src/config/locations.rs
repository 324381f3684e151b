//! State directory discovery
//!
//! Everything Scribe persists lives under one directory:
//! - `~/.scribe/state.json`: recent files and options
//! - `~/.scribe/autosave/`: one snapshot per dirty session

use crate::error::{ScribeError, ScribeResult};
use std::path::{Path, PathBuf};

/// Environment variable overriding the state directory
pub const STATE_DIR_ENV: &str = "SCRIBE_STATE_DIR";

/// Locations of persisted state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateLocations {
    state_dir: PathBuf,
}

impl StateLocations {
    /// Use an explicit state directory
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    /// Use `explicit` if given, then `$SCRIBE_STATE_DIR`, then `~/.scribe`
    pub fn resolve(explicit: Option<PathBuf>) -> ScribeResult<Self> {
        if let Some(dir) = explicit {
            return Ok(Self::new(dir));
        }
        if let Some(dir) = std::env::var_os(STATE_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::new(dir));
        }
        let home = dirs::home_dir()
            .ok_or_else(|| ScribeError::config("Cannot determine home directory"))?;
        Ok(Self::new(home.join(".scribe")))
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Path of `state.json`
    pub fn state_file(&self) -> PathBuf {
        self.state_dir.join("state.json")
    }

    /// Directory holding autosave snapshots
    pub fn autosave_dir(&self) -> PathBuf {
        self.state_dir.join("autosave")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let locations = StateLocations::new("/tmp/scribe-state");
        assert_eq!(
            locations.state_file(),
            PathBuf::from("/tmp/scribe-state/state.json")
        );
        assert_eq!(
            locations.autosave_dir(),
            PathBuf::from("/tmp/scribe-state/autosave")
        );
    }

    #[test]
    fn test_explicit_wins() {
        let locations = StateLocations::resolve(Some(PathBuf::from("/explicit"))).unwrap();
        assert_eq!(locations.state_dir(), Path::new("/explicit"));
    }
}
