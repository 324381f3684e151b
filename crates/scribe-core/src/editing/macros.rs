//! Keystroke macro recorder and player

use crate::buffer::TextBuffer;

/// A key press as seen by the recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// A character key
    Char(char),
    Return,
    Tab,
    BackSpace,
    Delete,
    /// Anything else (arrows, modifiers, function keys); never recorded
    Other,
}

/// One recorded editing step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroEvent {
    Insert(char),
    Backspace,
    Delete,
    /// Jump to the end of the text
    MoveToEnd,
}

/// Records typed characters, newlines, tabs and deletions for replay
#[derive(Debug, Clone, Default)]
pub struct MacroRecorder {
    recording: bool,
    events: Vec<MacroEvent>,
}

impl MacroRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a fresh recording, discarding the previous one
    pub fn start(&mut self) {
        self.recording = true;
        self.events.clear();
    }

    /// Stop recording, keeping what was captured
    pub fn stop(&mut self) {
        self.recording = false;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn events(&self) -> &[MacroEvent] {
        &self.events
    }

    /// Capture a key press if recording
    pub fn record_key(&mut self, key: KeyInput) {
        if !self.recording {
            return;
        }

        let event = match key {
            KeyInput::BackSpace => MacroEvent::Backspace,
            KeyInput::Delete => MacroEvent::Delete,
            KeyInput::Return => MacroEvent::Insert('\n'),
            KeyInput::Tab => MacroEvent::Insert('\t'),
            // Control characters are not typed text
            KeyInput::Char(ch) if (ch as u32) >= 0x20 => MacroEvent::Insert(ch),
            KeyInput::Char(_) | KeyInput::Other => return,
        };
        self.events.push(event);
    }

    /// Record every character of `text` as typed keys
    pub fn record_text(&mut self, text: &str) {
        for ch in text.chars() {
            let key = match ch {
                '\n' => KeyInput::Return,
                '\t' => KeyInput::Tab,
                other => KeyInput::Char(other),
            };
            self.record_key(key);
        }
    }

    /// Record a jump to the end of the text if recording
    pub fn record_move_to_end(&mut self) {
        if self.recording {
            self.events.push(MacroEvent::MoveToEnd);
        }
    }

    /// Replay the recording at the buffer's cursor; returns the number of
    /// events that changed the text
    pub fn play(&self, buffer: &mut TextBuffer) -> usize {
        let mut applied = 0;
        let mut utf8 = [0u8; 4];
        for event in &self.events {
            let changed = match event {
                MacroEvent::Insert(ch) => buffer.insert_at_cursor(ch.encode_utf8(&mut utf8)),
                MacroEvent::Backspace => buffer.backspace(),
                MacroEvent::Delete => buffer.delete_forward(),
                MacroEvent::MoveToEnd => {
                    buffer.set_cursor(buffer.len_chars());
                    false
                }
            };
            if changed {
                applied += 1;
            }
        }
        applied
    }
}
