//! Undo/redo history

/// Default number of edits kept for undo
pub const DEFAULT_HISTORY_DEPTH: usize = 1000;

/// One applied edit, enough to revert or re-apply it
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Edit {
    /// Char offset where the edit starts
    pub start: usize,
    /// Text that was removed
    pub removed: String,
    /// Text that was inserted
    pub inserted: String,
    /// Cursor before the edit
    pub cursor_before: usize,
}

impl Edit {
    /// Char offset just past the inserted text
    pub fn inserted_end(&self) -> usize {
        self.start + self.inserted.chars().count()
    }

    /// Char offset just past the removed text
    pub fn removed_end(&self) -> usize {
        self.start + self.removed.chars().count()
    }
}

/// Bounded undo and redo stacks
#[derive(Debug, Clone)]
pub(crate) struct History {
    undo: Vec<Edit>,
    redo: Vec<Edit>,
    max_depth: usize,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record a fresh edit; invalidates anything that could be redone
    pub fn record(&mut self, edit: Edit) {
        self.redo.clear();
        self.push_undo(edit);
    }

    pub fn pop_undo(&mut self) -> Option<Edit> {
        self.undo.pop()
    }

    pub fn pop_redo(&mut self) -> Option<Edit> {
        self.redo.pop()
    }

    pub fn push_redo(&mut self, edit: Edit) {
        self.redo.push(edit);
    }

    pub fn push_undo(&mut self, edit: Edit) {
        if self.undo.len() == self.max_depth {
            self.undo.remove(0);
        }
        self.undo.push(edit);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}
