//! Parsing of edit-session command lines

use std::path::PathBuf;

/// One line typed into the edit session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    New,
    Open(PathBuf),
    Tabs,
    /// 1-based tab number
    Tab(usize),
    Insert(String),
    Append(String),
    Newline,
    Backspace,
    Delete,
    Goto(usize),
    Cursor(usize),
    Print,
    Status,
    Find(String),
    FindNext(String),
    Replace { needle: String, replacement: String },
    ReplaceAll { needle: String, replacement: String },
    CaseSensitive(bool),
    Bracket,
    Undo,
    Redo,
    Save,
    SaveAs(PathBuf),
    Close { discard: bool },
    Macro(MacroAction),
    Snapshots,
    /// 1-based position in the snapshot listing
    Recover(usize),
    Autosave(u64),
    FocusLost,
    Help,
    Quit { discard: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroAction {
    Start,
    Stop,
    Play,
}

impl EditCommand {
    /// Parse a command line; blank lines yield `Ok(None)`
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest),
            None => (trimmed, ""),
        };

        let command = match word {
            "new" => Self::New,
            "open" => Self::Open(PathBuf::from(required(rest.trim(), "open <path>")?)),
            "tabs" => Self::Tabs,
            "tab" => Self::Tab(number(rest, "tab <n>")?),
            "insert" | "i" => Self::Insert(unescape(required(rest, "insert <text>")?)),
            "append" | "a" => Self::Append(unescape(required(rest, "append <text>")?)),
            "newline" | "nl" => Self::Newline,
            "bs" => Self::Backspace,
            "del" => Self::Delete,
            "goto" => Self::Goto(number(rest, "goto <line>")?),
            "cursor" => Self::Cursor(number(rest, "cursor <pos>")?),
            "print" | "p" => Self::Print,
            "status" => Self::Status,
            "find" => Self::Find(unescape(required(rest, "find <text>")?)),
            "next" => Self::FindNext(unescape(required(rest, "next <text>")?)),
            "replace" => {
                let (needle, replacement) = pair(rest, "replace <find> <replacement>")?;
                Self::Replace {
                    needle,
                    replacement,
                }
            }
            "replace-all" => {
                let (needle, replacement) = pair(rest, "replace-all <find> <replacement>")?;
                Self::ReplaceAll {
                    needle,
                    replacement,
                }
            }
            "case" => match rest.trim() {
                "on" => Self::CaseSensitive(true),
                "off" => Self::CaseSensitive(false),
                _ => return Err("usage: case on|off".to_string()),
            },
            "bracket" => Self::Bracket,
            "undo" | "u" => Self::Undo,
            "redo" => Self::Redo,
            "save" | "w" => Self::Save,
            "save-as" => Self::SaveAs(PathBuf::from(required(rest.trim(), "save-as <path>")?)),
            "close" => Self::Close { discard: false },
            "close!" => Self::Close { discard: true },
            "macro" => match rest.trim() {
                "start" => Self::Macro(MacroAction::Start),
                "stop" => Self::Macro(MacroAction::Stop),
                "play" => Self::Macro(MacroAction::Play),
                _ => return Err("usage: macro start|stop|play".to_string()),
            },
            "snapshots" => Self::Snapshots,
            "recover" => Self::Recover(number(rest, "recover <n>")?),
            "autosave" => Self::Autosave(number(rest, "autosave <seconds>")? as u64),
            "focus-lost" => Self::FocusLost,
            "help" | "?" => Self::Help,
            "quit" | "q" => Self::Quit { discard: false },
            "quit!" | "q!" => Self::Quit { discard: true },
            other => return Err(format!("Unknown command '{}'; try 'help'", other)),
        };
        Ok(Some(command))
    }
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str, String> {
    // A single separating space was consumed by the split; keep the rest verbatim
    if rest.is_empty() {
        Err(format!("usage: {}", usage))
    } else {
        Ok(rest)
    }
}

fn number(rest: &str, usage: &str) -> Result<usize, String> {
    rest.trim()
        .parse()
        .map_err(|_| format!("usage: {}", usage))
}

fn pair(rest: &str, usage: &str) -> Result<(String, String), String> {
    let mut args = split_args(rest)?.into_iter();
    match (args.next(), args.next(), args.next()) {
        (Some(a), Some(b), None) if !a.is_empty() => Ok((a, b)),
        _ => Err(format!("usage: {} (quote arguments containing spaces)", usage)),
    }
}

/// Split on whitespace, honouring double quotes and escapes
pub fn split_args(input: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut started = false;
    let mut chars = input.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                started = true;
            }
            '\\' => {
                let next = chars.next().ok_or("trailing backslash")?;
                current.push(escaped(next));
                started = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if started {
                    args.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            c => {
                current.push(c);
                started = true;
            }
        }
    }

    if in_quotes {
        return Err("unterminated quote".to_string());
    }
    if started {
        args.push(current);
    }
    Ok(args)
}

/// Decode `\n`, `\t` and `\\` in free text
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some(next) => out.push(escaped(next)),
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

fn escaped(ch: char) -> char {
    match ch {
        'n' => '\n',
        't' => '\t',
        other => other,
    }
}
