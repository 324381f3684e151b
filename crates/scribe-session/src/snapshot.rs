//! Snapshot data structures
//!
//! Defines the core types for autosave recovery:
//! - SessionId: Opaque identifier of an open document
//! - Snapshot: Persisted recovery copy of a document's text

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use uuid::Uuid;

/// Opaque identifier, stable for the lifetime of an open document.
///
/// Used as the key (and file stem) of the document's snapshot. Ids read
/// from JSON go through the same check as [`FromStr`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh random session id
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is safe to use as a file name stem
    pub fn is_valid(id: &str) -> bool {
        !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SessionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

impl TryFrom<String> for SessionId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if Self::is_valid(&s) {
            Ok(Self(s))
        } else {
            Err(format!("invalid session id: {:?}", s))
        }
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Recovery copy of a document at a point in time.
///
/// A snapshot is immutable once built. The next snapshot for the same
/// session replaces it; no history is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Session the snapshot belongs to
    pub session_id: SessionId,

    /// Backing file of the document, if it had one
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Full document text
    pub text: String,
}

impl Snapshot {
    /// Take a snapshot of `text` now
    pub fn new(session_id: SessionId, file_path: Option<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            session_id,
            file_path,
            timestamp: Utc::now(),
            text: text.into(),
        }
    }

    /// Borrow the backing file path
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Short label for listings: file name or "Untitled"
    pub fn label(&self) -> String {
        self.file_path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string())
    }

    /// First line of the text, truncated for previews
    pub fn preview(&self, max_chars: usize) -> String {
        let first = self.text.lines().next().unwrap_or("").trim();
        let preview: String = first.chars().take(max_chars).collect();
        if preview.len() < first.len() {
            format!("{}...", preview)
        } else {
            preview
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn test_session_id_parse() {
        let id = SessionId::new();
        let parsed: SessionId = id.as_str().parse().unwrap();
        assert_eq!(parsed, id);

        assert!("../escape".parse::<SessionId>().is_err());
        assert!("".parse::<SessionId>().is_err());
        assert!("with space".parse::<SessionId>().is_err());
    }

    #[test]
    fn test_session_id_json_validated() {
        let id: SessionId = serde_json::from_str("\"abc_123\"").unwrap();
        assert_eq!(id.as_str(), "abc_123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc_123\"");

        assert!(serde_json::from_str::<SessionId>("\"../../etc/passwd\"").is_err());
        assert!(serde_json::from_str::<SessionId>("\"\"").is_err());

        let body = r#"{"session_id":"../evil","timestamp":"2024-01-01T00:00:00Z","text":"x"}"#;
        assert!(serde_json::from_str::<Snapshot>(body).is_err());
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snap = Snapshot::new(
            "abc-123".parse().unwrap(),
            Some(PathBuf::from("/tmp/notes.txt")),
            "line one\nline two",
        );
        let value = serde_json::to_value(&snap).unwrap();

        assert_eq!(value["session_id"], "abc-123");
        assert_eq!(value["file_path"], "/tmp/notes.txt");
        assert_eq!(value["text"], "line one\nline two");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_snapshot_round_trip_exact_text() {
        let text = "tabs\tand unicode \u{1F600}\r\nCRLF kept\n\n trailing  ";
        let snap = Snapshot::new(SessionId::new(), None, text);

        let json = serde_json::to_string(&snap).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(back.text.as_bytes(), text.as_bytes());
        assert_eq!(back, snap);
    }

    #[test]
    fn test_label_and_preview() {
        let untitled = Snapshot::new(SessionId::new(), None, "");
        assert_eq!(untitled.label(), "Untitled");
        assert_eq!(untitled.preview(10), "");

        let named = Snapshot::new(
            SessionId::new(),
            Some(PathBuf::from("/home/u/todo.md")),
            "A rather long first line\nsecond",
        );
        assert_eq!(named.label(), "todo.md");
        assert_eq!(named.preview(8), "A rather...");
        assert_eq!(named.preview(100), "A rather long first line");
    }
}
