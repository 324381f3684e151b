//! Terminal rendering of document text

use colored::*;
use scribe_core::editing::{Span, TokenKind, highlight_lines};
use scribe_core::{Document, Snapshot, SnapshotRead};

use crate::console::relative_time;

/// Split a line into plain and highlighted pieces
///
/// Spans are applied left to right; a span overlapping one already applied
/// is dropped.
pub fn segments<'a>(line: &'a str, spans: &[Span]) -> Vec<(&'a str, Option<TokenKind>)> {
    let mut ordered: Vec<&Span> = spans.iter().collect();
    ordered.sort_by_key(|s| (s.start, rank(s.kind)));

    let mut out = Vec::new();
    let mut pos = 0;
    for span in ordered {
        if span.start < pos || span.end > line.len() {
            continue;
        }
        if span.start > pos {
            out.push((&line[pos..span.start], None));
        }
        out.push((&line[span.start..span.end], Some(span.kind)));
        pos = span.end;
    }
    if pos < line.len() {
        out.push((&line[pos..], None));
    }
    out
}

fn rank(kind: TokenKind) -> u8 {
    match kind {
        TokenKind::Comment => 0,
        TokenKind::String => 1,
        TokenKind::Keyword => 2,
    }
}

fn paint(text: &str, kind: Option<TokenKind>) -> ColoredString {
    match kind {
        Some(TokenKind::Keyword) => text.blue().bold(),
        Some(TokenKind::String) => text.green(),
        Some(TokenKind::Comment) => text.dimmed().italic(),
        None => text.normal(),
    }
}

/// Print the document with line numbers and highlighting, marking the
/// cursor line
pub fn print_document(doc: &Document) {
    let buffer = doc.buffer();
    let text = buffer.text();
    let last = buffer.line_count();
    let spans = highlight_lines(text, 1, last);
    let (cursor_line, _) = buffer.line_col(buffer.cursor());
    let width = last.to_string().len();

    for (index, line) in text.split('\n').enumerate() {
        let number = index + 1;
        let line_spans: Vec<Span> = spans.iter().filter(|s| s.line == number).copied().collect();
        let marker = if number == cursor_line { ">" } else { " " };

        let mut rendered = String::new();
        for (piece, kind) in segments(line, &line_spans) {
            rendered.push_str(&paint(piece, kind).to_string());
        }
        println!(
            "{}{} {}",
            marker.cyan(),
            format!("{:>width$}", number, width = width).dimmed(),
            rendered
        );
    }
}

/// Print a numbered snapshot listing
pub fn print_snapshots(reads: &[SnapshotRead]) {
    for (index, read) in reads.iter().enumerate() {
        let age = relative_time(read.listing.modified);
        match &read.snapshot {
            Ok(snapshot) => println!(
                "  {} {} {} {}",
                format!("[{}]", index + 1).bright_cyan(),
                snapshot.label().bright_white(),
                format!("({})", age).dimmed(),
                preview(snapshot).italic().dimmed()
            ),
            Err(_) => println!(
                "  {} {} {}",
                format!("[{}]", index + 1).bright_cyan(),
                read.listing.session_id.to_string().red(),
                "unreadable".red()
            ),
        }
    }
}

fn preview(snapshot: &Snapshot) -> String {
    snapshot.preview(40).replace('\n', "⏎")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize, kind: TokenKind) -> Span {
        Span {
            line: 1,
            start,
            end,
            kind,
        }
    }

    #[test]
    fn test_segments_cover_line() {
        let line = "if x: pass";
        let spans = [span(0, 2, TokenKind::Keyword), span(6, 10, TokenKind::Keyword)];
        let pieces = segments(line, &spans);

        let joined: String = pieces.iter().map(|(p, _)| *p).collect();
        assert_eq!(joined, line);
        assert_eq!(pieces[0], ("if", Some(TokenKind::Keyword)));
        assert_eq!(pieces[1], (" x: ", None));
    }

    #[test]
    fn test_overlapping_span_dropped() {
        let line = "'in' # note";
        let spans = [
            span(0, 4, TokenKind::String),
            span(1, 3, TokenKind::Keyword),
            span(5, 11, TokenKind::Comment),
        ];
        let pieces = segments(line, &spans);
        assert_eq!(
            pieces,
            vec![
                ("'in'", Some(TokenKind::String)),
                (" ", None),
                ("# note", Some(TokenKind::Comment)),
            ]
        );
    }
}
