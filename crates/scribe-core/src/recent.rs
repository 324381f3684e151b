//! Recently opened files

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Maximum number of remembered files
pub const MAX_RECENT: usize = 10;

/// Most-recent-first list of absolute file paths without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentFiles(Vec<PathBuf>);

impl RecentFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a persisted list, dropping duplicates and extras
    pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut recent = Self::new();
        for path in paths {
            if !recent.0.contains(&path) && recent.0.len() < MAX_RECENT {
                recent.0.push(path);
            }
        }
        recent
    }

    /// Move `path` to the front, adding it if new
    pub fn add(&mut self, path: impl AsRef<Path>) {
        let path = absolute(path.as_ref());
        self.0.retain(|p| p != &path);
        self.0.insert(0, path);
        self.0.truncate(MAX_RECENT);
    }

    /// Forget `path`; returns whether it was present
    pub fn remove(&mut self, path: impl AsRef<Path>) -> bool {
        let path = absolute(path.as_ref());
        let before = self.0.len();
        self.0.retain(|p| p != &path);
        self.0.len() != before
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Absolute form of a path without resolving symlinks
pub(crate) fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_moves_to_front() {
        let mut recent = RecentFiles::new();
        recent.add("/a.txt");
        recent.add("/b.txt");
        recent.add("/a.txt");

        assert_eq!(
            recent.as_slice(),
            &[PathBuf::from("/a.txt"), PathBuf::from("/b.txt")]
        );
    }

    #[test]
    fn test_capped() {
        let mut recent = RecentFiles::new();
        for i in 0..15 {
            recent.add(format!("/file{}.txt", i));
        }
        assert_eq!(recent.len(), MAX_RECENT);
        assert_eq!(recent.as_slice()[0], PathBuf::from("/file14.txt"));
        assert_eq!(recent.as_slice()[9], PathBuf::from("/file5.txt"));
    }

    #[test]
    fn test_relative_paths_made_absolute() {
        let mut recent = RecentFiles::new();
        recent.add("notes.txt");
        assert!(recent.as_slice()[0].is_absolute());
        assert!(recent.remove("notes.txt"));
        assert!(recent.is_empty());
    }

    #[test]
    fn test_from_paths_dedupes_and_truncates() {
        let mut paths: Vec<PathBuf> = (0..12).map(|i| PathBuf::from(format!("/f{}", i))).collect();
        paths.insert(1, PathBuf::from("/f0"));

        let recent = RecentFiles::from_paths(paths);
        assert_eq!(recent.len(), MAX_RECENT);
        assert_eq!(recent.as_slice()[1], PathBuf::from("/f1"));
    }
}
