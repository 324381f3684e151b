//! Minimal Python-flavoured syntax highlighting for a range of lines
//!
//! Only the visible lines need highlighting, so callers pass the viewport.
//! Spans are byte ranges within their line.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static STRING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""[^"]*"|'[^']*'"#).unwrap());

static COMMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#.*$").unwrap());

static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z_][A-Za-z_0-9]*\b").unwrap());

static KEYWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "False", "None", "True", "and", "as", "assert", "break", "class", "continue", "def",
        "del", "elif", "else", "except", "finally", "for", "from", "global", "if", "import", "in",
        "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while",
        "with", "yield",
    ]
    .into_iter()
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    String,
    Comment,
}

/// A highlighted range on one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// 1-based line number
    pub line: usize,
    /// Byte range within the line
    pub start: usize,
    pub end: usize,
    pub kind: TokenKind,
}

/// Highlight lines `first_line..=last_line` (1-based, clamped to the text)
pub fn highlight_lines(text: &str, first_line: usize, last_line: usize) -> Vec<Span> {
    let first = first_line.max(1);
    let mut spans = Vec::new();

    for (index, line_text) in text.split('\n').enumerate() {
        let line = index + 1;
        if line < first {
            continue;
        }
        if line > last_line {
            break;
        }
        highlight_line(line, line_text, &mut spans);
    }

    spans
}

fn highlight_line(line: usize, text: &str, spans: &mut Vec<Span>) {
    let mut push = |start: usize, end: usize, kind: TokenKind| {
        spans.push(Span {
            line,
            start,
            end,
            kind,
        })
    };

    for m in STRING_PATTERN.find_iter(text) {
        push(m.start(), m.end(), TokenKind::String);
    }

    if let Some(m) = COMMENT_PATTERN.find(text) {
        push(m.start(), m.end(), TokenKind::Comment);
    }

    for m in WORD_PATTERN.find_iter(text) {
        if KEYWORDS.contains(m.as_str()) {
            push(m.start(), m.end(), TokenKind::Keyword);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_on(spans: &[Span], line: usize) -> Vec<(TokenKind, usize, usize)> {
        spans
            .iter()
            .filter(|s| s.line == line)
            .map(|s| (s.kind, s.start, s.end))
            .collect()
    }

    #[test]
    fn test_keywords_strings_comments() {
        let text = "def f(x):\n    return 'hi'  # done";
        let spans = highlight_lines(text, 1, 2);

        assert_eq!(kinds_on(&spans, 1), vec![(TokenKind::Keyword, 0, 3)]);
        assert_eq!(
            kinds_on(&spans, 2),
            vec![
                (TokenKind::String, 11, 15),
                (TokenKind::Comment, 17, 23),
                (TokenKind::Keyword, 4, 10),
            ]
        );
    }

    #[test]
    fn test_viewport_limits_lines() {
        let text = "if a:\n    pass\nelse:\n    pass";
        let spans = highlight_lines(text, 2, 3);

        assert!(spans.iter().all(|s| (2..=3).contains(&s.line)));
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn test_identifiers_containing_keywords_ignored() {
        let spans = highlight_lines("define iffy = format", 1, 1);
        assert!(spans.is_empty());
    }

    #[test]
    fn test_range_past_end() {
        assert!(highlight_lines("pass", 5, 10).is_empty());
        assert_eq!(highlight_lines("pass", 0, 99).len(), 1);
    }
}
