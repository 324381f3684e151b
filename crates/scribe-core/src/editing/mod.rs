//! Text-processing helpers used while editing
//!
//! None of these touch files or notifications directly; the ones that edit
//! go through [`TextBuffer`](crate::buffer::TextBuffer) so the change
//! tracker sees every mutation.

pub mod brackets;
pub mod highlight;
pub mod indent;
pub mod macros;
pub mod search;

pub use brackets::{BracketPair, match_at_cursor};
pub use highlight::{Span, TokenKind, highlight_lines};
pub use macros::{KeyInput, MacroEvent, MacroRecorder};
pub use search::SearchQuery;
