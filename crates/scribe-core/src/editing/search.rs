//! Find and replace
//!
//! Needles are matched literally. Ranges are char offsets so they can be
//! handed straight to the buffer.

use crate::buffer::TextBuffer;
use regex::{NoExpand, Regex, RegexBuilder};
use std::ops::Range;

/// A literal search, optionally case sensitive
#[derive(Debug, Clone)]
pub struct SearchQuery {
    needle: String,
    case_sensitive: bool,
    regex: Option<Regex>,
}

impl SearchQuery {
    pub fn new(needle: impl Into<String>, case_sensitive: bool) -> Self {
        let needle = needle.into();
        let regex = if needle.is_empty() {
            None
        } else {
            RegexBuilder::new(&regex::escape(&needle))
                .case_insensitive(!case_sensitive)
                .build()
                .ok()
        };
        Self {
            needle,
            case_sensitive,
            regex,
        }
    }

    pub fn needle(&self) -> &str {
        &self.needle
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Every match in `text`
    pub fn find_all(&self, text: &str) -> Vec<Range<usize>> {
        let Some(regex) = &self.regex else {
            return Vec::new();
        };

        let mut counter = CharCounter::new(text);
        regex
            .find_iter(text)
            .map(|m| counter.char_offset(m.start())..counter.char_offset(m.end()))
            .collect()
    }

    /// First match starting at or after char offset `from`; no wrap-around
    pub fn find_next(&self, text: &str, from: usize) -> Option<Range<usize>> {
        let regex = self.regex.as_ref()?;
        let byte_from = text
            .char_indices()
            .nth(from)
            .map(|(b, _)| b)
            .unwrap_or(text.len());

        let m = regex.find_at(text, byte_from)?;
        let mut counter = CharCounter::new(text);
        Some(counter.char_offset(m.start())..counter.char_offset(m.end()))
    }

    /// Number of matches in `text`
    pub fn count(&self, text: &str) -> usize {
        self.regex
            .as_ref()
            .map(|r| r.find_iter(text).count())
            .unwrap_or(0)
    }

    /// `text` with every match replaced by `replacement`, taken literally
    pub fn replace_all_in(&self, text: &str, replacement: &str) -> String {
        match &self.regex {
            Some(regex) => regex.replace_all(text, NoExpand(replacement)).into_owned(),
            None => text.to_string(),
        }
    }
}

/// Converts increasing byte offsets to char offsets in one pass
struct CharCounter<'a> {
    text: &'a str,
    byte: usize,
    chars: usize,
}

impl<'a> CharCounter<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            byte: 0,
            chars: 0,
        }
    }

    fn char_offset(&mut self, byte: usize) -> usize {
        if byte < self.byte {
            self.byte = 0;
            self.chars = 0;
        }
        self.chars += self.text[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}

/// Find in a buffer, moving the cursor to the end of the hit
///
/// Searches from the cursor when `from_cursor` is set, otherwise from the
/// start of the text.
pub fn find_in_buffer(
    buffer: &mut TextBuffer,
    query: &SearchQuery,
    from_cursor: bool,
) -> Option<Range<usize>> {
    let from = if from_cursor { buffer.cursor() } else { 0 };
    let hit = query.find_next(buffer.text(), from)?;
    buffer.set_cursor(hit.end);
    Some(hit)
}

/// Replace the first match at or after the cursor
///
/// Returns the char range of the inserted replacement; the cursor ends up
/// just after it.
pub fn replace_next(
    buffer: &mut TextBuffer,
    query: &SearchQuery,
    replacement: &str,
) -> Option<Range<usize>> {
    let hit = query.find_next(buffer.text(), buffer.cursor())?;
    buffer.replace_range(hit.clone(), replacement);
    let end = hit.start + replacement.chars().count();
    buffer.set_cursor(end);
    Some(hit.start..end)
}

/// Replace every match as one undoable edit; returns the number replaced
pub fn replace_all(buffer: &mut TextBuffer, query: &SearchQuery, replacement: &str) -> usize {
    let count = query.count(buffer.text());
    if count > 0 {
        let replaced = query.replace_all_in(buffer.text(), replacement);
        buffer.set_text(&replaced);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_by_flag() {
        let text = "Foo foo FOO";
        assert_eq!(SearchQuery::new("foo", false).find_all(text).len(), 3);
        assert_eq!(
            SearchQuery::new("foo", true).find_all(text),
            vec![4..7]
        );
    }

    #[test]
    fn test_needle_is_literal() {
        let query = SearchQuery::new("a.b", true);
        assert_eq!(query.find_all("axb a.b"), vec![4..7]);
        assert_eq!(query.replace_all_in("a.b", "$0"), "$0");
    }

    #[test]
    fn test_empty_needle_finds_nothing() {
        let query = SearchQuery::new("", false);
        assert!(query.find_all("anything").is_empty());
        assert!(query.find_next("anything", 0).is_none());
        assert_eq!(query.count("anything"), 0);
    }

    #[test]
    fn test_char_offsets_with_multibyte() {
        let query = SearchQuery::new("ß", true);
        assert_eq!(query.find_all("straße ß"), vec![4..5, 7..8]);
        assert_eq!(query.find_next("straße ß", 5), Some(7..8));
    }

    #[test]
    fn test_find_next_no_wrap() {
        let query = SearchQuery::new("x", true);
        assert_eq!(query.find_next("x..x", 1), Some(3..4));
        assert_eq!(query.find_next("x..x", 4), None);
    }

    #[test]
    fn test_find_in_buffer_steps_through_hits() {
        let mut buffer = TextBuffer::from_text("one two one");
        let query = SearchQuery::new("one", true);

        assert_eq!(find_in_buffer(&mut buffer, &query, false), Some(0..3));
        assert_eq!(find_in_buffer(&mut buffer, &query, true), Some(8..11));
        assert_eq!(find_in_buffer(&mut buffer, &query, true), None);
        assert_eq!(buffer.cursor(), 11);
    }

    #[test]
    fn test_replace_next_from_cursor() {
        let mut buffer = TextBuffer::from_text("cat cat cat");
        buffer.set_cursor(1);
        let query = SearchQuery::new("cat", true);

        assert_eq!(replace_next(&mut buffer, &query, "dog"), Some(4..7));
        assert_eq!(buffer.text(), "cat dog cat");
        assert_eq!(buffer.cursor(), 7);

        assert_eq!(replace_next(&mut buffer, &query, "cow"), Some(8..11));
        assert_eq!(replace_next(&mut buffer, &query, "cow"), None);
    }

    #[test]
    fn test_replace_all_single_undo() {
        let mut buffer = TextBuffer::from_text("Red red RED");
        let query = SearchQuery::new("red", false);

        assert_eq!(replace_all(&mut buffer, &query, "blue"), 3);
        assert_eq!(buffer.text(), "blue blue blue");

        buffer.undo();
        assert_eq!(buffer.text(), "Red red RED");
        assert_eq!(replace_all(&mut buffer, &SearchQuery::new("green", false), "x"), 0);
    }
}
