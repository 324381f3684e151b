//! Edit session help text

use colored::*;

const COMMANDS: &[(&str, &str)] = &[
    ("new", "open an empty document"),
    ("open <path>", "open a file, or switch to it if already open"),
    ("tabs / tab <n>", "list documents / switch to document n"),
    ("insert <text>", "type text at the cursor (\\n and \\t allowed)"),
    ("append <text>", "type text at the end of the document"),
    ("newline", "break the line, keeping its indentation"),
    ("bs / del", "delete before / after the cursor"),
    ("goto <line> / cursor <pos>", "move the cursor"),
    ("print / status", "show the document / the status line"),
    ("find <text> / next <text>", "search from the top / from the cursor"),
    ("replace <a> <b>", "replace the next match after the cursor"),
    ("replace-all <a> <b>", "replace every match"),
    ("case on|off", "toggle case sensitive search"),
    ("bracket", "show the bracket matching the one at the cursor"),
    ("undo / redo", "step through edit history"),
    ("save / save-as <path>", "write the document"),
    ("close / close!", "close the document / discarding changes"),
    ("macro start|stop|play", "record and replay typing"),
    ("snapshots / recover <n>", "list autosave snapshots / reopen one"),
    ("autosave <seconds>", "set the autosave interval (5-600)"),
    ("focus-lost", "simulate leaving the document"),
    ("quit / quit!", "exit / exit leaving unsaved work for recovery"),
];

pub fn print_help() {
    println!("{}", "Commands".bold().underline());
    let width = COMMANDS.iter().map(|(c, _)| c.len()).max().unwrap_or(0);
    for (command, description) in COMMANDS {
        let padded = format!("{:<width$}", command, width = width);
        println!("  {}  {}", padded.cyan(), description.dimmed());
    }
}
