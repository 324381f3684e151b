//! Bracket matching around the cursor

/// Longest distance scanned for a partner bracket
pub const SCAN_LIMIT: usize = 200_000;

/// Positions (char offsets) of a matched bracket pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketPair {
    pub open: usize,
    pub close: usize,
}

fn partner(ch: char) -> Option<(char, bool)> {
    match ch {
        '(' => Some((')', true)),
        '[' => Some((']', true)),
        '{' => Some(('}', true)),
        ')' => Some(('(', false)),
        ']' => Some(('[', false)),
        '}' => Some(('{', false)),
        _ => None,
    }
}

/// Find the bracket pair touching the cursor
///
/// The char just before the cursor wins over the one at the cursor. Only
/// brackets of the same kind are counted when tracking depth.
pub fn match_at_cursor(text: &str, cursor: usize) -> Option<BracketPair> {
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());

    let before = cursor.checked_sub(1).filter(|&i| partner(chars[i]).is_some());
    let at = Some(cursor).filter(|&i| i < chars.len() && partner(chars[i]).is_some());
    let pos = before.or(at)?;

    let ch = chars[pos];
    let (other, is_open) = partner(ch)?;
    if is_open {
        find_forward(&chars, pos, ch, other).map(|close| BracketPair { open: pos, close })
    } else {
        find_backward(&chars, pos, other, ch).map(|open| BracketPair { open, close: pos })
    }
}

fn find_forward(chars: &[char], start: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &ch) in chars.iter().enumerate().skip(start).take(SCAN_LIMIT) {
        if ch == open {
            depth += 1;
        } else if ch == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

fn find_backward(chars: &[char], start: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for i in (0..=start).rev().take(SCAN_LIMIT) {
        let ch = chars[i];
        if ch == close {
            depth += 1;
        } else if ch == open {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opener_before_cursor() {
        let text = "f(a, (b))";
        assert_eq!(
            match_at_cursor(text, 2),
            Some(BracketPair { open: 1, close: 8 })
        );
    }

    #[test]
    fn test_closer_at_cursor() {
        let text = "f(a, (b))";
        assert_eq!(
            match_at_cursor(text, 7),
            Some(BracketPair { open: 5, close: 7 })
        );
    }

    #[test]
    fn test_before_wins_over_at() {
        // cursor between ')' and ']' picks the ')'
        let text = "[(x)]";
        assert_eq!(
            match_at_cursor(text, 4),
            Some(BracketPair { open: 1, close: 3 })
        );
    }

    #[test]
    fn test_other_kinds_ignored() {
        let text = "{ [ } ]";
        assert_eq!(
            match_at_cursor(text, 1),
            Some(BracketPair { open: 0, close: 4 })
        );
    }

    #[test]
    fn test_unbalanced_and_absent() {
        assert_eq!(match_at_cursor("((x)", 1), None);
        assert_eq!(match_at_cursor("plain", 2), None);
        assert_eq!(match_at_cursor("", 0), None);
        assert_eq!(match_at_cursor("x)", 99), None);
    }

    #[test]
    fn test_multibyte_positions() {
        let text = "é(ü)";
        assert_eq!(
            match_at_cursor(text, 2),
            Some(BracketPair { open: 1, close: 3 })
        );
    }
}
