//! Change notification contract of the text buffer

use std::fmt;

/// Kind of mutation that produced a change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Text was inserted
    Insert,
    /// Text was removed
    Delete,
    /// A range (or the whole text) was replaced
    Replace,
    /// An edit was reverted
    Undo,
    /// A reverted edit was re-applied
    Redo,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Insert => write!(f, "insert"),
            ChangeKind::Delete => write!(f, "delete"),
            ChangeKind::Replace => write!(f, "replace"),
            ChangeKind::Undo => write!(f, "undo"),
            ChangeKind::Redo => write!(f, "redo"),
        }
    }
}

/// Notification delivered after a mutation has been applied
#[derive(Debug, Clone, Copy)]
pub struct ChangeEvent<'a> {
    /// Full text after the mutation
    pub text: &'a str,
    /// What kind of mutation happened
    pub kind: ChangeKind,
    /// Buffer revision, incremented once per notifying mutation
    pub revision: u64,
}

/// Subscriber to "content changed" notifications
pub trait ChangeListener: Send + Sync {
    /// Called after every mutating operation that changed the text
    fn on_content_changed(&self, event: &ChangeEvent<'_>);
}

impl<F> ChangeListener for F
where
    F: Fn(&ChangeEvent<'_>) + Send + Sync,
{
    fn on_content_changed(&self, event: &ChangeEvent<'_>) {
        self(event)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);
