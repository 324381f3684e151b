//! Editable text buffer
//!
//! The buffer owns a document's text and cursor. Every mutating operation
//! (insert, delete, programmatic replace, undo, redo) notifies subscribers
//! after the text has changed. Operations that leave the text as it was do
//! not notify.
//!
//! Positions are character offsets, clamped to the text.

mod history;
mod listener;

pub use history::DEFAULT_HISTORY_DEPTH;
pub use listener::{ChangeEvent, ChangeKind, ChangeListener, SubscriptionId};

use history::{Edit, History};
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Editable text with a cursor, undo history and change subscribers
pub struct TextBuffer {
    text: String,
    /// Cursor as a char offset in `0..=len_chars`
    cursor: usize,
    history: History,
    listeners: Vec<(SubscriptionId, Arc<dyn ChangeListener>)>,
    next_subscription: u64,
    revision: u64,
}

impl TextBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// Create a buffer holding `text`, cursor at the start
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cursor: 0,
            history: History::default(),
            listeners: Vec::new(),
            next_subscription: 0,
            revision: 0,
        }
    }

    /// Set the number of edits kept for undo
    pub fn with_history_depth(mut self, depth: usize) -> Self {
        self.history = History::new(depth);
        self
    }

    // ========== Subscriptions ==========

    /// Subscribe to change notifications
    pub fn subscribe(&mut self, listener: Arc<dyn ChangeListener>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Remove a subscription; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    /// Number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Revision counter, bumped once per notifying mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ========== Reading ==========

    /// Copy of the full text
    pub fn get_full_text(&self) -> String {
        self.text.clone()
    }

    /// Borrow the full text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters
    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Cursor position (char offset)
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// 1-based line and column of a char offset
    pub fn line_col(&self, pos: usize) -> (usize, usize) {
        let mut line = 1;
        let mut col = 1;
        for ch in self.text.chars().take(pos) {
            if ch == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
        }
        (line, col)
    }

    /// Number of lines; an empty buffer has one
    pub fn line_count(&self) -> usize {
        self.text.matches('\n').count() + 1
    }

    /// Char offset where 1-based `line` starts
    pub fn line_start(&self, line: usize) -> Option<usize> {
        if line == 0 || line > self.line_count() {
            return None;
        }
        if line == 1 {
            return Some(0);
        }
        let mut seen = 1;
        for (i, ch) in self.text.chars().enumerate() {
            if ch == '\n' {
                seen += 1;
                if seen == line {
                    return Some(i + 1);
                }
            }
        }
        None
    }

    /// Text of 1-based `line`, without its newline
    pub fn line_text(&self, line: usize) -> Option<&str> {
        if line == 0 {
            return None;
        }
        self.text.split('\n').nth(line - 1)
    }

    /// Text of the line holding the cursor
    pub fn current_line(&self) -> &str {
        let (line, _) = self.line_col(self.cursor);
        self.line_text(line).unwrap_or("")
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ========== Cursor ==========

    /// Move the cursor, clamped to the text
    pub fn set_cursor(&mut self, pos: usize) {
        self.cursor = pos.min(self.len_chars());
    }

    /// Move the cursor to the start of 1-based `line`, clamped to the last line
    pub fn goto_line(&mut self, line: usize) {
        let line = line.clamp(1, self.line_count());
        if let Some(start) = self.line_start(line) {
            self.cursor = start;
        }
    }

    // ========== Mutations ==========

    /// Insert `s` at `pos`
    pub fn insert(&mut self, pos: usize, s: &str) -> bool {
        self.edit(pos, pos, s, ChangeKind::Insert)
    }

    /// Insert `s` at the cursor, moving the cursor past it
    pub fn insert_at_cursor(&mut self, s: &str) -> bool {
        let pos = self.cursor;
        self.edit(pos, pos, s, ChangeKind::Insert)
    }

    /// Delete the chars in `range`
    pub fn delete(&mut self, range: Range<usize>) -> bool {
        self.edit(range.start, range.end, "", ChangeKind::Delete)
    }

    /// Delete the char before the cursor
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let pos = self.cursor;
        self.edit(pos - 1, pos, "", ChangeKind::Delete)
    }

    /// Delete the char at the cursor
    pub fn delete_forward(&mut self) -> bool {
        let pos = self.cursor;
        if pos >= self.len_chars() {
            return false;
        }
        self.edit(pos, pos + 1, "", ChangeKind::Delete)
    }

    /// Replace the chars in `range` with `s`
    pub fn replace_range(&mut self, range: Range<usize>, s: &str) -> bool {
        self.edit(range.start, range.end, s, ChangeKind::Replace)
    }

    /// Replace the whole text, keeping the cursor where it was when possible
    pub fn set_text(&mut self, s: &str) -> bool {
        let cursor = self.cursor;
        let end = self.len_chars();
        if !self.edit(0, end, s, ChangeKind::Replace) {
            return false;
        }
        self.cursor = cursor.min(self.len_chars());
        true
    }

    /// Revert the last edit
    pub fn undo(&mut self) -> bool {
        let Some(edit) = self.history.pop_undo() else {
            return false;
        };
        self.splice(edit.start, edit.inserted_end(), &edit.removed);
        self.cursor = edit.cursor_before.min(self.len_chars());
        self.history.push_redo(edit);
        self.notify(ChangeKind::Undo);
        true
    }

    /// Re-apply the last reverted edit
    pub fn redo(&mut self) -> bool {
        let Some(edit) = self.history.pop_redo() else {
            return false;
        };
        self.splice(edit.start, edit.removed_end(), &edit.inserted);
        self.cursor = edit.inserted_end();
        self.history.push_undo(edit);
        self.notify(ChangeKind::Redo);
        true
    }

    // ========== Internals ==========

    fn byte_offset(&self, pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(pos)
            .map(|(byte, _)| byte)
            .unwrap_or(self.text.len())
    }

    fn clamp_range(&self, start: usize, end: usize) -> (usize, usize) {
        let len = self.len_chars();
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        (start.min(len), end.min(len))
    }

    /// Replace chars `start..end` with `insert`; None when nothing changed
    fn splice(&mut self, start: usize, end: usize, insert: &str) -> Option<String> {
        let (start, end) = self.clamp_range(start, end);
        let byte_start = self.byte_offset(start);
        let byte_end = self.byte_offset(end);

        if &self.text[byte_start..byte_end] == insert {
            return None;
        }

        let removed = self.text[byte_start..byte_end].to_string();
        self.text.replace_range(byte_start..byte_end, insert);
        Some(removed)
    }

    fn edit(&mut self, start: usize, end: usize, insert: &str, kind: ChangeKind) -> bool {
        let (start, end) = self.clamp_range(start, end);
        let cursor_before = self.cursor;

        let Some(removed) = self.splice(start, end, insert) else {
            return false;
        };

        let inserted_len = insert.chars().count();
        self.cursor = if cursor_before >= end {
            cursor_before - (end - start) + inserted_len
        } else if cursor_before > start {
            start + inserted_len
        } else {
            cursor_before
        };

        self.history.record(Edit {
            start,
            removed,
            inserted: insert.to_string(),
            cursor_before,
        });
        self.notify(kind);
        true
    }

    fn notify(&mut self, kind: ChangeKind) {
        self.revision += 1;
        let event = ChangeEvent {
            text: &self.text,
            kind,
            revision: self.revision,
        };
        for (_, listener) in &self.listeners {
            listener.on_content_changed(&event);
        }
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBuffer")
            .field("len_chars", &self.len_chars())
            .field("cursor", &self.cursor)
            .field("revision", &self.revision)
            .field("subscribers", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Records every notification it receives
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(ChangeKind, String)>>,
    }

    impl ChangeListener for Recorder {
        fn on_content_changed(&self, event: &ChangeEvent<'_>) {
            self.seen.lock().push((event.kind, event.text.to_string()));
        }
    }

    fn recorded() -> (TextBuffer, Arc<Recorder>) {
        let mut buffer = TextBuffer::new();
        let recorder = Arc::new(Recorder::default());
        buffer.subscribe(recorder.clone());
        (buffer, recorder)
    }

    #[test]
    fn test_insert_moves_cursor_and_notifies() {
        let (mut buffer, recorder) = recorded();

        assert!(buffer.insert_at_cursor("hello"));
        assert_eq!(buffer.text(), "hello");
        assert_eq!(buffer.cursor(), 5);

        let seen = recorder.seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], (ChangeKind::Insert, "hello".to_string()));
    }

    #[test]
    fn test_noop_mutations_do_not_notify() {
        let (mut buffer, recorder) = recorded();

        assert!(!buffer.backspace());
        assert!(!buffer.delete_forward());
        assert!(!buffer.insert_at_cursor(""));
        assert!(!buffer.set_text(""));
        assert!(!buffer.undo());

        assert!(recorder.seen.lock().is_empty());
        assert_eq!(buffer.revision(), 0);
    }

    #[test]
    fn test_backspace_and_delete_forward() {
        let mut buffer = TextBuffer::from_text("abcd");
        buffer.set_cursor(2);

        assert!(buffer.backspace());
        assert_eq!(buffer.text(), "acd");
        assert_eq!(buffer.cursor(), 1);

        assert!(buffer.delete_forward());
        assert_eq!(buffer.text(), "ad");
        assert_eq!(buffer.cursor(), 1);
    }

    #[test]
    fn test_multibyte_offsets() {
        let mut buffer = TextBuffer::from_text("héllo wörld");
        buffer.set_cursor(1);
        buffer.delete_forward();
        assert_eq!(buffer.text(), "hllo wörld");

        buffer.replace_range(5..10, "world");
        assert_eq!(buffer.text(), "hllo world");
        assert_eq!(buffer.len_chars(), 10);
    }

    #[test]
    fn test_insert_before_cursor_shifts_it() {
        let mut buffer = TextBuffer::from_text("world");
        buffer.set_cursor(5);
        buffer.insert(0, "hello ");
        assert_eq!(buffer.cursor(), 11);

        buffer.delete(0..6);
        assert_eq!(buffer.text(), "world");
        assert_eq!(buffer.cursor(), 5);
    }

    #[test]
    fn test_reversed_and_out_of_range_are_clamped() {
        let mut buffer = TextBuffer::from_text("abc");
        assert!(buffer.delete(10..1));
        assert_eq!(buffer.text(), "a");

        buffer.set_cursor(99);
        assert_eq!(buffer.cursor(), 1);
    }

    #[test]
    fn test_set_text_keeps_cursor_clamped() {
        let mut buffer = TextBuffer::from_text("a long line of text");
        buffer.set_cursor(7);
        buffer.set_text("short");
        assert_eq!(buffer.cursor(), 5);

        buffer.set_cursor(2);
        buffer.set_text("replaced entirely");
        assert_eq!(buffer.cursor(), 2);
    }

    #[test]
    fn test_undo_redo() {
        let (mut buffer, recorder) = recorded();
        buffer.insert_at_cursor("one");
        buffer.insert_at_cursor(" two");
        buffer.backspace();

        assert!(buffer.undo());
        assert_eq!(buffer.text(), "one two");
        assert!(buffer.undo());
        assert_eq!(buffer.text(), "one");
        assert_eq!(buffer.cursor(), 3);

        assert!(buffer.redo());
        assert_eq!(buffer.text(), "one two");
        assert_eq!(buffer.cursor(), 7);

        let kinds: Vec<ChangeKind> = recorder.seen.lock().iter().map(|(k, _)| *k).collect();
        assert_eq!(
            kinds,
            vec![
                ChangeKind::Insert,
                ChangeKind::Insert,
                ChangeKind::Delete,
                ChangeKind::Undo,
                ChangeKind::Undo,
                ChangeKind::Redo,
            ]
        );
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut buffer = TextBuffer::new();
        buffer.insert_at_cursor("a");
        buffer.undo();
        assert!(buffer.can_redo());

        buffer.insert_at_cursor("b");
        assert!(!buffer.can_redo());
        assert!(!buffer.redo());
    }

    #[test]
    fn test_set_text_is_undoable() {
        let mut buffer = TextBuffer::from_text("original");
        buffer.set_text("rewritten");
        buffer.undo();
        assert_eq!(buffer.text(), "original");
    }

    #[test]
    fn test_unsubscribe() {
        let (mut buffer, recorder) = recorded();
        let closure_hits = Arc::new(Mutex::new(0usize));
        let hits = closure_hits.clone();
        let sub = buffer.subscribe(Arc::new(move |_event: &ChangeEvent<'_>| {
            *hits.lock() += 1;
        }));
        assert_eq!(buffer.subscriber_count(), 2);

        buffer.insert_at_cursor("x");
        assert!(buffer.unsubscribe(sub));
        assert!(!buffer.unsubscribe(sub));
        buffer.insert_at_cursor("y");

        assert_eq!(*closure_hits.lock(), 1);
        assert_eq!(recorder.seen.lock().len(), 2);
    }

    #[test]
    fn test_lines() {
        let mut buffer = TextBuffer::from_text("first\nsecond\n\nfourth");
        assert_eq!(buffer.line_count(), 4);
        assert_eq!(buffer.line_start(2), Some(6));
        assert_eq!(buffer.line_start(4), Some(14));
        assert_eq!(buffer.line_start(5), None);
        assert_eq!(buffer.line_text(3), Some(""));
        assert_eq!(buffer.line_col(8), (2, 3));

        buffer.goto_line(99);
        assert_eq!(buffer.cursor(), 14);
        assert_eq!(buffer.current_line(), "fourth");

        buffer.goto_line(2);
        assert_eq!(buffer.current_line(), "second");
    }

    #[test]
    fn test_history_depth() {
        let mut buffer = TextBuffer::new().with_history_depth(2);
        buffer.insert_at_cursor("a");
        buffer.insert_at_cursor("b");
        buffer.insert_at_cursor("c");

        assert!(buffer.undo());
        assert!(buffer.undo());
        assert!(!buffer.undo());
        assert_eq!(buffer.text(), "a");
    }
}
