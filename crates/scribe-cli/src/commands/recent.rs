//! Recent files command

use crate::console::CliConsole;
use colored::Colorize;
use scribe_core::{EditorState, StateLocations};

/// List recent files, most recent first, or clear the list
pub fn execute(locations: &StateLocations, clear: bool) -> anyhow::Result<()> {
    let console = CliConsole::new(true);
    let state_file = locations.state_file();
    let mut state = EditorState::load(&state_file);

    if clear {
        state.recent_files.clear();
        state.save(&state_file)?;
        console.success("Cleared recent files");
        return Ok(());
    }

    let recent = state.recent();
    if recent.is_empty() {
        println!("{}", "No recent files.".yellow());
        return Ok(());
    }

    for (index, path) in recent.iter().enumerate() {
        let marker = if path.exists() {
            String::new()
        } else {
            format!(" {}", "(missing)".red())
        };
        println!(
            "  {} {}{}",
            format!("{:>2}.", index + 1).dimmed(),
            path.display(),
            marker
        );
    }
    Ok(())
}
