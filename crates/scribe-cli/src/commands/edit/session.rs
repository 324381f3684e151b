//! Interactive edit session
//!
//! Commands arrive on stdin and autosave ticks on a timer. Both are handled
//! by one `select!` loop on the current task, so a sweep always sees the
//! workspace between two commands.

use super::command::{EditCommand, MacroAction};
use super::help::print_help;
use super::render::{print_document, print_snapshots};
use crate::console::CliConsole;
use scribe_core::editing::search::{find_in_buffer, replace_all, replace_next};
use scribe_core::editing::{KeyInput, SearchQuery, match_at_cursor};
use scribe_core::{CloseMode, Editor, ScribeError, ScribeResult, SessionId};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::debug;

/// What the loop does after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct EditSession {
    editor: Editor,
    console: CliConsole,
    case_sensitive: bool,
    /// Snapshot ids in the order last shown by `snapshots`
    listed: Vec<SessionId>,
}

fn timer(period: Duration) -> Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

impl EditSession {
    pub fn new(editor: Editor, verbose: bool) -> Self {
        Self {
            editor,
            console: CliConsole::new(verbose),
            case_sensitive: false,
            listed: Vec::new(),
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Read commands until `quit` or end of input
    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut period = self.editor.autosave_interval();
        let mut ticks = timer(period);
        self.prompt();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("End of input");
                        break;
                    };
                    if self.handle_line(&line).await == Flow::Quit {
                        break;
                    }
                    if self.editor.autosave_interval() != period {
                        period = self.editor.autosave_interval();
                        ticks = timer(period);
                    }
                    self.prompt();
                }
                _ = ticks.tick() => {
                    let report = self.editor.autosave_tick().await;
                    if report.failed > 0 {
                        self.console.warn(&format!(
                            "Autosave failed for {} document(s); will retry",
                            report.failed
                        ));
                    }
                }
            }
        }

        let report = self.editor.shutdown().await;
        if report.failed > 0 {
            self.console
                .warn("Some unsaved changes could not be snapshotted before exit");
        }
        let dirty = self.editor.workspace().dirty_documents().count();
        if dirty > 0 {
            self.console.hint(&format!(
                "{} unsaved document(s) kept for recovery (scribe edit --recover-latest)",
                dirty
            ));
        }
        Ok(())
    }

    fn prompt(&self) {
        let label = self
            .editor
            .workspace()
            .active()
            .map(|d| d.tab_title())
            .unwrap_or_default();
        self.console.prompt(&label);
    }

    /// Parse and run one line, reporting failures without stopping
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        let command = match EditCommand::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Flow::Continue,
            Err(usage) => {
                self.console.error(&usage);
                return Flow::Continue;
            }
        };

        match self.dispatch(command).await {
            Ok(flow) => flow,
            Err(e) => {
                debug!("Command failed: {}", e);
                self.console.error(&e.user_message());
                if matches!(e, ScribeError::UnsavedChanges(_)) {
                    self.console.hint("Save first, or use close! to discard.");
                }
                Flow::Continue
            }
        }
    }

    fn active_id(&self) -> ScribeResult<SessionId> {
        self.editor.active_id()
    }

    fn query(&self, needle: &str) -> SearchQuery {
        SearchQuery::new(needle, self.case_sensitive)
    }

    fn record(&mut self, key: KeyInput) {
        self.editor.macros_mut().record_key(key);
    }

    async fn dispatch(&mut self, command: EditCommand) -> ScribeResult<Flow> {
        match command {
            EditCommand::New => {
                self.editor.workspace_mut().new_document();
                self.console.success("New document");
            }
            EditCommand::Open(path) => {
                let id = self.editor.open_file(&path).await?;
                let doc = self.editor.workspace().get(&id)?;
                self.console.success(&format!("Opened {}", doc.display_name()));
            }
            EditCommand::Tabs => self.print_tabs(),
            EditCommand::Tab(n) => {
                let id = self
                    .editor
                    .workspace()
                    .nth(n.saturating_sub(1))
                    .map(|d| d.id().clone())
                    .ok_or_else(|| ScribeError::invalid_input(format!("No tab {}", n)))?;
                self.editor.workspace_mut().activate(&id)?;
            }
            EditCommand::Insert(text) => {
                let id = self.active_id()?;
                self.editor
                    .workspace_mut()
                    .get_mut(&id)?
                    .buffer_mut()
                    .insert_at_cursor(&text);
                self.editor.macros_mut().record_text(&text);
            }
            EditCommand::Append(text) => {
                let id = self.active_id()?;
                let buffer = self.editor.workspace_mut().get_mut(&id)?.buffer_mut();
                buffer.set_cursor(buffer.len_chars());
                buffer.insert_at_cursor(&text);
                let macros = self.editor.macros_mut();
                macros.record_move_to_end();
                macros.record_text(&text);
            }
            EditCommand::Newline => {
                let id = self.active_id()?;
                self.editor.workspace_mut().get_mut(&id)?.auto_newline();
                self.record(KeyInput::Return);
            }
            EditCommand::Backspace => {
                let id = self.active_id()?;
                self.editor.workspace_mut().get_mut(&id)?.buffer_mut().backspace();
                self.record(KeyInput::BackSpace);
            }
            EditCommand::Delete => {
                let id = self.active_id()?;
                self.editor
                    .workspace_mut()
                    .get_mut(&id)?
                    .buffer_mut()
                    .delete_forward();
                self.record(KeyInput::Delete);
            }
            EditCommand::Goto(line) => {
                let id = self.active_id()?;
                self.editor.workspace_mut().get_mut(&id)?.buffer_mut().goto_line(line);
                self.print_status()?;
            }
            EditCommand::Cursor(pos) => {
                let id = self.active_id()?;
                self.editor.workspace_mut().get_mut(&id)?.buffer_mut().set_cursor(pos);
                self.print_status()?;
            }
            EditCommand::Print => {
                let id = self.active_id()?;
                print_document(self.editor.workspace().get(&id)?);
            }
            EditCommand::Status => self.print_status()?,
            EditCommand::Find(needle) => self.find(&needle, false)?,
            EditCommand::FindNext(needle) => self.find(&needle, true)?,
            EditCommand::Replace {
                needle,
                replacement,
            } => {
                let id = self.active_id()?;
                let query = self.query(&needle);
                let buffer = self.editor.workspace_mut().get_mut(&id)?.buffer_mut();
                match replace_next(buffer, &query, &replacement) {
                    Some(_) => {
                        let (line, col) = buffer.line_col(buffer.cursor());
                        self.console.success(&format!("Replaced at Ln {}, Col {}", line, col));
                    }
                    None => self.console.warn("No further matches"),
                }
            }
            EditCommand::ReplaceAll {
                needle,
                replacement,
            } => {
                let id = self.active_id()?;
                let query = self.query(&needle);
                let buffer = self.editor.workspace_mut().get_mut(&id)?.buffer_mut();
                let count = replace_all(buffer, &query, &replacement);
                self.console
                    .success(&format!("Replaced {} occurrence(s)", count));
            }
            EditCommand::CaseSensitive(on) => {
                self.case_sensitive = on;
                self.console.hint(if on {
                    "Search is case sensitive"
                } else {
                    "Search ignores case"
                });
            }
            EditCommand::Bracket => {
                let id = self.active_id()?;
                let buffer = self.editor.workspace().get(&id)?.buffer();
                match match_at_cursor(buffer.text(), buffer.cursor()) {
                    Some(pair) => {
                        let (ol, oc) = buffer.line_col(pair.open);
                        let (cl, cc) = buffer.line_col(pair.close);
                        println!("Ln {}, Col {} <-> Ln {}, Col {}", ol, oc, cl, cc);
                    }
                    None => self.console.hint("No matching bracket"),
                }
            }
            EditCommand::Undo => {
                let id = self.active_id()?;
                if !self.editor.workspace_mut().get_mut(&id)?.buffer_mut().undo() {
                    self.console.hint("Nothing to undo");
                }
            }
            EditCommand::Redo => {
                let id = self.active_id()?;
                if !self.editor.workspace_mut().get_mut(&id)?.buffer_mut().redo() {
                    self.console.hint("Nothing to redo");
                }
            }
            EditCommand::Save => {
                let id = self.active_id()?;
                let path = self.editor.save(&id).await?;
                self.console.success(&format!("Saved {}", path.display()));
            }
            EditCommand::SaveAs(path) => {
                let id = self.active_id()?;
                let path = self.editor.save_as(&id, &path).await?;
                self.console.success(&format!("Saved {}", path.display()));
            }
            EditCommand::Close { discard } => {
                let id = self.active_id()?;
                let mode = if discard {
                    CloseMode::Discard
                } else {
                    CloseMode::IfClean
                };
                let outcome = self.editor.close(&id, mode).await?;
                if outcome.was_dirty {
                    self.console
                        .warn("Closed with unsaved changes; the snapshot stays recoverable");
                }
            }
            EditCommand::Macro(action) => self.macro_action(action)?,
            EditCommand::Snapshots => {
                let reads = self.editor.list_snapshots().await?;
                if reads.is_empty() {
                    self.console.hint("No autosave snapshots found.");
                }
                self.listed = reads.iter().map(|r| r.listing.session_id.clone()).collect();
                print_snapshots(&reads);
            }
            EditCommand::Recover(n) => {
                if self.listed.is_empty() {
                    let reads = self.editor.list_snapshots().await?;
                    self.listed = reads.into_iter().map(|r| r.listing.session_id).collect();
                }
                let id = self
                    .listed
                    .get(n.saturating_sub(1))
                    .cloned()
                    .ok_or_else(|| ScribeError::invalid_input(format!("No snapshot {}", n)))?;
                let opened = self.editor.recover(&id).await?;
                let title = self.editor.workspace().get(&opened)?.tab_title();
                self.console.success(&format!("{} (Recovered)", title));
            }
            EditCommand::Autosave(seconds) => {
                self.editor.set_autosave_seconds(seconds)?;
                self.console
                    .success(&format!("Autosave every {} seconds", seconds));
            }
            EditCommand::FocusLost => {
                let id = self.active_id()?;
                if self.editor.focus_lost(&id).await? {
                    self.console.success("Saved on focus change");
                }
            }
            EditCommand::Help => print_help(),
            EditCommand::Quit { discard } => {
                let dirty: Vec<String> = self
                    .editor
                    .workspace()
                    .dirty_documents()
                    .map(|d| d.display_name())
                    .collect();
                if !discard && !dirty.is_empty() {
                    self.console
                        .warn(&format!("Unsaved changes in: {}", dirty.join(", ")));
                    self.console.hint("Save them, or use quit! to leave anyway.");
                    return Ok(Flow::Continue);
                }
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    fn macro_action(&mut self, action: MacroAction) -> ScribeResult<()> {
        match action {
            MacroAction::Start => {
                self.editor.macros_mut().start();
                self.print_status()?;
            }
            MacroAction::Stop => {
                self.editor.macros_mut().stop();
                self.print_status()?;
            }
            MacroAction::Play => {
                if self.editor.macros().is_recording() {
                    return Err(ScribeError::invalid_input("Stop recording before playing"));
                }
                let applied = self.editor.play_macro()?;
                self.console.hint(&format!("Replayed {} step(s)", applied));
            }
        }
        Ok(())
    }

    fn find(&mut self, needle: &str, from_cursor: bool) -> ScribeResult<()> {
        let id = self.active_id()?;
        let query = self.query(needle);
        let buffer = self.editor.workspace_mut().get_mut(&id)?.buffer_mut();
        let total = query.count(buffer.text());
        match find_in_buffer(buffer, &query, from_cursor) {
            Some(hit) => {
                let (line, col) = buffer.line_col(hit.start);
                println!("Ln {}, Col {} ({} match(es) in document)", line, col, total);
            }
            None => self.console.warn(&format!("'{}' not found", needle)),
        }
        Ok(())
    }

    fn print_tabs(&self) {
        let workspace = self.editor.workspace();
        let active = workspace.active_id();
        for (index, doc) in workspace.documents().enumerate() {
            let marker = if Some(doc.id()) == active { "*" } else { " " };
            println!("{} {}. {}", marker, index + 1, doc.tab_title());
        }
    }

    fn print_status(&self) -> ScribeResult<()> {
        let id = self.active_id()?;
        let extra = if self.editor.macros().is_recording() {
            "Macro recording: ON"
        } else {
            ""
        };
        println!("{}", self.editor.workspace().get(&id)?.status_line(Some(extra)));
        Ok(())
    }
}
