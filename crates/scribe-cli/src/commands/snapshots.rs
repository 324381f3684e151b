//! Autosave snapshot management commands
//!
//! Commands for listing, inspecting and deleting recovery snapshots without
//! opening an edit session.

use crate::args::SnapshotAction;
use crate::console::{CliConsole, relative_time};
use colored::Colorize;
use scribe_core::{Recovery, SessionId, StateLocations};
use scribe_session::LocalSnapshotStorage;
use std::sync::Arc;

/// Execute snapshots command
pub async fn execute(locations: &StateLocations, action: SnapshotAction) -> anyhow::Result<()> {
    let storage = Arc::new(LocalSnapshotStorage::with_path(locations.autosave_dir()));
    let recovery = Recovery::new(storage);

    match action {
        SnapshotAction::List => list_snapshots(&recovery).await,
        SnapshotAction::Show { session_id } => show_snapshot(&recovery, &session_id).await,
        SnapshotAction::Delete { session_id } => delete_snapshot(&recovery, &session_id).await,
        SnapshotAction::Clean { unreadable } => clean_snapshots(&recovery, unreadable).await,
    }
}

fn parse_id(raw: &str) -> anyhow::Result<SessionId> {
    raw.parse()
        .map_err(|e: String| anyhow::anyhow!("Invalid session id: {}", e))
}

async fn list_snapshots(recovery: &Recovery) -> anyhow::Result<()> {
    let reads = recovery.list_snapshots().await?;
    if reads.is_empty() {
        println!("{}", "No autosave snapshots found.".yellow());
        return Ok(());
    }

    println!("\n{}", "Autosave snapshots".bold().underline());
    println!("{}", format!("{} snapshot(s), newest first", reads.len()).dimmed());
    println!();

    for read in &reads {
        let id = read.listing.session_id.as_str();
        let age = relative_time(read.listing.modified);
        match &read.snapshot {
            Ok(snapshot) => {
                let path = snapshot
                    .file_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "no file".to_string());
                println!("  {} {}", id.bright_cyan(), snapshot.label().bright_white());
                println!(
                    "    {} {} {} {}",
                    format!("{} chars", snapshot.text.chars().count()).dimmed(),
                    format!("for {}", path).dimmed(),
                    "|".dimmed(),
                    age.dimmed()
                );
            }
            Err(e) => {
                println!("  {} {}", id.bright_cyan(), "unreadable".red());
                println!("    {} {} {}", e.to_string().dimmed(), "|".dimmed(), age.dimmed());
            }
        }
    }

    println!();
    println!(
        "{}",
        "Use 'scribe edit --recover <id>' to reopen a snapshot.".dimmed()
    );
    Ok(())
}

async fn show_snapshot(recovery: &Recovery, raw_id: &str) -> anyhow::Result<()> {
    let console = CliConsole::new(true);
    let id = parse_id(raw_id)?;
    let snapshot = match recovery.load(&id).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            console.error(&e.user_message());
            return Err(e.into());
        }
    };

    console.print_header(&snapshot.label());
    if let Some(path) = snapshot.file_path() {
        println!("{} {}", "File:".bold(), path.display());
    }
    println!(
        "{} {} ({})",
        "Written:".bold(),
        snapshot.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        relative_time(snapshot.timestamp)
    );
    println!();
    print!("{}", snapshot.text);
    if !snapshot.text.ends_with('\n') {
        println!();
    }
    Ok(())
}

async fn delete_snapshot(recovery: &Recovery, raw_id: &str) -> anyhow::Result<()> {
    let console = CliConsole::new(true);
    let id = parse_id(raw_id)?;
    recovery.discard(&id).await?;
    console.success(&format!("Deleted snapshot {}", id));
    Ok(())
}

async fn clean_snapshots(recovery: &Recovery, unreadable_only: bool) -> anyhow::Result<()> {
    let console = CliConsole::new(true);

    let removed = if unreadable_only {
        let mut removed = 0;
        for read in recovery.list_snapshots().await? {
            if !read.is_readable() {
                recovery.discard(&read.listing.session_id).await?;
                removed += 1;
            }
        }
        removed
    } else {
        recovery.discard_all().await?
    };

    if removed == 0 {
        console.hint("Nothing to clean.");
    } else {
        console.success(&format!("Deleted {} snapshot(s)", removed));
    }
    Ok(())
}
