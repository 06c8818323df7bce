use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::clipboard::Clipboard;
use crate::surface::TextBuffer;

/// What a key press meant to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The buffer may have changed; pending notifications should be delivered.
    Edited,
    /// Cursor movement only.
    Moved,
    Quit,
    Ignored,
}

fn is_quit(key: &KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
}

/// Applies a key press to the buffer.
pub fn apply_key<C: Clipboard>(buffer: &mut TextBuffer<C>, key: &KeyEvent) -> KeyOutcome {
    if is_quit(key) {
        return KeyOutcome::Quit;
    }

    let chord = key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

    match key.code {
        KeyCode::Char(_) if chord => KeyOutcome::Ignored,
        KeyCode::Char(c) => {
            buffer.insert_char(c);
            KeyOutcome::Edited
        }
        KeyCode::Enter => {
            buffer.insert_char('\n');
            KeyOutcome::Edited
        }
        KeyCode::Tab => {
            buffer.insert_char('\t');
            KeyOutcome::Edited
        }
        KeyCode::Backspace => {
            buffer.backspace();
            KeyOutcome::Edited
        }
        KeyCode::Delete => {
            buffer.delete();
            KeyOutcome::Edited
        }
        KeyCode::Left => {
            buffer.move_left();
            KeyOutcome::Moved
        }
        KeyCode::Right => {
            buffer.move_right();
            KeyOutcome::Moved
        }
        KeyCode::Home => {
            buffer.move_home();
            KeyOutcome::Moved
        }
        KeyCode::End => {
            buffer.move_end();
            KeyOutcome::Moved
        }
        _ => KeyOutcome::Ignored,
    }
}

/// Pasted text lands as one edit.
pub fn apply_paste<C: Clipboard>(buffer: &mut TextBuffer<C>, text: &str) -> KeyOutcome {
    // Terminals send \r for newlines inside bracketed paste.
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    buffer.insert_str(&normalized);
    KeyOutcome::Edited
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_chars_insert() {
        let mut buffer = TextBuffer::new();
        assert_eq!(apply_key(&mut buffer, &key(KeyCode::Char('h'))), KeyOutcome::Edited);
        assert_eq!(
            apply_key(
                &mut buffer,
                &KeyEvent::new(KeyCode::Char('I'), KeyModifiers::SHIFT)
            ),
            KeyOutcome::Edited
        );
        apply_key(&mut buffer, &key(KeyCode::Enter));
        apply_key(&mut buffer, &key(KeyCode::Tab));
        assert_eq!(buffer.as_str(), "hI\n\t");
        assert_eq!(buffer.pending_changes(), 4);
    }

    #[test]
    fn test_quit_keys() {
        let mut buffer = TextBuffer::new();
        assert_eq!(apply_key(&mut buffer, &key(KeyCode::Esc)), KeyOutcome::Quit);
        assert_eq!(
            apply_key(
                &mut buffer,
                &KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
            ),
            KeyOutcome::Quit
        );
        assert_eq!(buffer.as_str(), "");
    }

    #[test]
    fn test_chords_are_ignored() {
        let mut buffer = TextBuffer::new();
        let outcome = apply_key(
            &mut buffer,
            &KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL),
        );
        assert_eq!(outcome, KeyOutcome::Ignored);
        assert_eq!(buffer.pending_changes(), 0);
    }

    #[test]
    fn test_navigation_does_not_edit() {
        let mut buffer = TextBuffer::new();
        buffer.insert_str("abc");
        let before = buffer.pending_changes();
        assert_eq!(apply_key(&mut buffer, &key(KeyCode::Left)), KeyOutcome::Moved);
        assert_eq!(apply_key(&mut buffer, &key(KeyCode::Home)), KeyOutcome::Moved);
        assert_eq!(buffer.cursor(), 0);
        assert_eq!(apply_key(&mut buffer, &key(KeyCode::End)), KeyOutcome::Moved);
        assert_eq!(buffer.cursor(), 3);
        assert_eq!(buffer.pending_changes(), before);
    }

    #[test]
    fn test_paste_normalizes_newlines() {
        let mut buffer = TextBuffer::new();
        apply_paste(&mut buffer, "one\r\ntwo\rthree");
        assert_eq!(buffer.as_str(), "one\ntwo\nthree");
        assert_eq!(buffer.pending_changes(), 1);
    }
}
