//! CLI argument definitions using clap
//!
//! - scribe                       # Edit session with an empty document
//! - scribe edit a.txt b.txt      # Edit session on files
//! - scribe edit --recover-latest # Reopen the newest autosave snapshot
//! - scribe snapshots/recent/config

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand};
use scribe_core::config::STATE_DIR_ENV;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scribe")]
#[command(about = "Scribe - a terminal text editor with autosave and crash recovery")]
#[command(version)]
pub struct Cli {
    /// Directory holding state.json and autosave snapshots (default ~/.scribe)
    #[arg(long, global = true, env = STATE_DIR_ENV)]
    pub state_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Write logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Edit files interactively, with periodic autosave
    Edit {
        /// Files to open
        files: Vec<PathBuf>,

        /// Reopen the snapshot with this session id
        #[arg(long, conflicts_with = "recover_latest")]
        recover: Option<String>,

        /// Reopen the most recently written readable snapshot
        #[arg(long)]
        recover_latest: bool,
    },

    /// Inspect and delete autosave snapshots
    Snapshots {
        #[command(subcommand)]
        action: SnapshotAction,
    },

    /// List recently opened files
    Recent {
        /// Forget the list instead of printing it
        #[arg(long)]
        clear: bool,
    },

    /// Show or change editor settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Clone)]
pub enum SnapshotAction {
    /// List snapshots, newest first
    List,

    /// Print one snapshot's content
    Show {
        /// Session id of the snapshot
        session_id: String,
    },

    /// Delete one snapshot
    Delete {
        /// Session id of the snapshot
        session_id: String,
    },

    /// Delete all snapshots
    Clean {
        /// Only delete snapshots that cannot be read
        #[arg(long)]
        unreadable: bool,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigAction {
    /// Display current settings
    Show {
        /// Print state.json as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set the autosave interval in seconds (5-600)
    SetAutosave { seconds: u64 },

    /// Turn save-on-focus-lost on or off
    SetFocusSave {
        #[arg(action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        enabled: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_edit_recover() {
        let cli = Cli::try_parse_from(["scribe", "edit", "a.txt", "--recover-latest"]).unwrap();
        match cli.command {
            Some(Commands::Edit {
                files,
                recover,
                recover_latest,
            }) => {
                assert_eq!(files, vec![PathBuf::from("a.txt")]);
                assert!(recover.is_none());
                assert!(recover_latest);
            }
            _ => panic!("expected edit"),
        }

        assert!(
            Cli::try_parse_from(["scribe", "edit", "--recover", "x", "--recover-latest"]).is_err()
        );
    }

    #[test]
    fn test_parse_focus_save_boolish() {
        let cli = Cli::try_parse_from(["scribe", "config", "set-focus-save", "on"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigAction::SetFocusSave { enabled: true }
            })
        ));
    }
}
