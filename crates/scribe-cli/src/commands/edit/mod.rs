//! `scribe edit`: interactive editing with autosave and recovery

mod command;
mod help;
mod render;
mod session;

pub use session::EditSession;

use crate::console::CliConsole;
use scribe_core::{Editor, SessionId, StateLocations};
use std::path::PathBuf;

/// Options for an edit session
#[derive(Debug, Clone, Default)]
pub struct EditArgs {
    pub files: Vec<PathBuf>,
    pub recover: Option<String>,
    pub recover_latest: bool,
    pub verbose: bool,
}

/// Start an edit session on the given state directory
pub async fn execute(locations: &StateLocations, args: EditArgs) -> anyhow::Result<()> {
    let console = CliConsole::new(args.verbose);
    let mut editor = Editor::open(locations)?;
    prepare(&mut editor, &args, &console).await;

    console.hint("Type 'help' for commands.");
    EditSession::new(editor, args.verbose).run().await
}

/// Open files and run any requested recovery
///
/// Failures are reported and skipped; whatever could be opened still makes
/// it into the session, which always has at least one document.
async fn prepare(editor: &mut Editor, args: &EditArgs, console: &CliConsole) {
    for file in &args.files {
        match editor.open_file(file).await {
            Ok(id) => console.info(&format!("Opened {} as {}", file.display(), id)),
            Err(e) => console.error(&e.user_message()),
        }
    }

    if let Some(id) = &args.recover {
        match id.parse::<SessionId>() {
            Ok(id) => match editor.recover(&id).await {
                Ok(_) => console.success("Recovered snapshot"),
                Err(e) => console.error(&e.user_message()),
            },
            Err(e) => console.error(&format!("Invalid session id: {}", e)),
        }
    } else if args.recover_latest {
        match editor.recover_latest().await {
            Ok(Some(_)) => console.success("Recovered newest snapshot"),
            Ok(None) => console.warn("No autosave snapshots found."),
            Err(e) => console.error(&e.user_message()),
        }
    }

    if editor.workspace().is_empty() {
        editor.workspace_mut().new_document();
    }

    match editor.list_snapshots().await {
        Ok(reads) => {
            let recovered = editor.workspace().dirty_documents().count();
            if reads.len() > recovered {
                console.hint(&format!(
                    "{} autosave snapshot(s) on disk; 'snapshots' lists them",
                    reads.len() - recovered
                ));
            }
        }
        Err(e) => console.warn(&format!("Autosave snapshots unavailable: {}", e.user_message())),
    }
}
