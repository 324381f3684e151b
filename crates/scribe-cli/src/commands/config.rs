//! Configuration management commands

use crate::args::ConfigAction;
use crate::console::CliConsole;
use colored::*;
use scribe_core::{EditorState, StateLocations};

/// Execute config command
pub fn execute(locations: &StateLocations, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show { json } => show(locations, json),
        ConfigAction::SetAutosave { seconds } => update(locations, |state| {
            state.set_autosave_seconds(seconds)?;
            Ok(format!("Autosave every {} seconds", seconds))
        }),
        ConfigAction::SetFocusSave { enabled } => update(locations, |state| {
            state.save_on_focus_lost = enabled;
            Ok(format!(
                "Save on focus lost {}",
                if enabled { "enabled" } else { "disabled" }
            ))
        }),
    }
}

/// Show current configuration
fn show(locations: &StateLocations, json: bool) -> anyhow::Result<()> {
    let state_file = locations.state_file();
    let state = EditorState::load(&state_file);

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    let console = CliConsole::new(true);
    console.print_header("Configuration");
    if !state_file.exists() {
        console.warn(&format!("No state file at {}", state_file.display()));
        console.hint("Showing defaults");
    }

    println!("{} {}", "State directory:".bold(), locations.state_dir().display());
    println!("{} {}", "Autosave directory:".bold(), locations.autosave_dir().display());
    println!("{} {}s", "Autosave interval:".bold(), state.autosave_seconds);
    println!("{} {}", "Save on focus lost:".bold(), state.save_on_focus_lost);
    println!("{} {}", "Recent files:".bold(), state.recent_files.len());
    Ok(())
}

/// Apply a change to `state.json` and report it
fn update(
    locations: &StateLocations,
    change: impl FnOnce(&mut EditorState) -> scribe_core::ScribeResult<String>,
) -> anyhow::Result<()> {
    let console = CliConsole::new(true);
    let state_file = locations.state_file();
    let mut state = EditorState::load(&state_file);

    let message = match change(&mut state) {
        Ok(message) => message,
        Err(e) => {
            console.error(&e.user_message());
            return Err(e.into());
        }
    };
    state.save(&state_file)?;
    console.success(&message);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_values_persist() {
        let dir = TempDir::new().unwrap();
        let locations = StateLocations::new(dir.path());

        execute(&locations, ConfigAction::SetAutosave { seconds: 45 }).unwrap();
        execute(&locations, ConfigAction::SetFocusSave { enabled: true }).unwrap();

        let state = EditorState::load(locations.state_file());
        assert_eq!(state.autosave_seconds, 45);
        assert!(state.save_on_focus_lost);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let dir = TempDir::new().unwrap();
        let locations = StateLocations::new(dir.path());

        assert!(execute(&locations, ConfigAction::SetAutosave { seconds: 3 }).is_err());
        assert!(!locations.state_file().exists());
    }
}
