use tracing::warn;

use crate::clipboard::{Clipboard, MemoryClipboard};

/// The editable text the engagement machine watches and mutates.
///
/// Implementations emit exactly one text-changed notification per operation
/// that changes the content, whether the change came from the user or from
/// one of the methods below. Notifications are delivered after the current
/// handler returns and ahead of any later user edit.
pub trait EditorSurface {
    fn text(&self) -> String;

    fn clear(&mut self);

    /// Removes all text, places it on the clipboard and returns it.
    fn select_all_and_cut(&mut self) -> String;

    fn append_text(&mut self, text: &str);

    /// `0` is full contrast, `255` fully faded.
    fn set_visual_intensity(&mut self, intensity: u8);
}

/// In-memory editor buffer with a cursor, counting change notifications for
/// its host to deliver.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer<C: Clipboard = MemoryClipboard> {
    content: String,
    /// Cursor position in chars.
    cursor: usize,
    intensity: u8,
    pending_changes: usize,
    clipboard: C,
}

impl TextBuffer<MemoryClipboard> {
    pub fn new() -> Self {
        Self::with_clipboard(MemoryClipboard::new())
    }
}

impl<C: Clipboard> TextBuffer<C> {
    pub fn with_clipboard(clipboard: C) -> Self {
        Self {
            content: String::new(),
            cursor: 0,
            intensity: 0,
            pending_changes: 0,
            clipboard,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn intensity(&self) -> u8 {
        self.intensity
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Pops one pending text-changed notification.
    pub fn take_change(&mut self) -> bool {
        if self.pending_changes > 0 {
            self.pending_changes -= 1;
            true
        } else {
            false
        }
    }

    pub fn pending_changes(&self) -> usize {
        self.pending_changes
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_idx)
            .map_or(self.content.len(), |(i, _)| i)
    }

    fn notify(&mut self) {
        self.pending_changes += 1;
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.content.insert(at, c);
        self.cursor += 1;
        self.notify();
    }

    /// Inserts at the cursor as a single edit.
    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.content.insert_str(at, s);
        self.cursor += s.chars().count();
        self.notify();
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_index(self.cursor - 1);
        self.content.remove(at);
        self.cursor -= 1;
        self.notify();
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.char_len() {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.content.remove(at);
        self.notify();
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    /// Moves to the start of the current line.
    pub fn move_home(&mut self) {
        let before: Vec<char> = self.content.chars().take(self.cursor).collect();
        let line_start = before
            .iter()
            .rposition(|&c| c == '\n')
            .map_or(0, |i| i + 1);
        self.cursor = line_start;
    }

    /// Moves to the end of the current line.
    pub fn move_end(&mut self) {
        let to_newline = self
            .content
            .chars()
            .skip(self.cursor)
            .position(|c| c == '\n');
        self.cursor = match to_newline {
            Some(offset) => self.cursor + offset,
            None => self.char_len(),
        };
    }
}

impl<C: Clipboard> EditorSurface for TextBuffer<C> {
    fn text(&self) -> String {
        self.content.clone()
    }

    fn clear(&mut self) {
        if self.content.is_empty() {
            return;
        }
        self.content.clear();
        self.cursor = 0;
        self.notify();
    }

    fn select_all_and_cut(&mut self) -> String {
        let cut = std::mem::take(&mut self.content);
        self.cursor = 0;
        if cut.is_empty() {
            return cut;
        }
        if let Err(err) = self.clipboard.set_text(&cut) {
            warn!(target: "surface", error = %err, "clipboard_copy_failed");
        }
        self.notify();
        cut
    }

    fn append_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.content.is_empty() {
            self.content.push('\n');
        }
        self.content.push_str(text);
        self.cursor = self.char_len();
        self.notify();
    }

    fn set_visual_intensity(&mut self, intensity: u8) {
        self.intensity = intensity;
    }
}
