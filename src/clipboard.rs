//! Clipboard backends for text cut out of the editor.
//!
//! The terminal host copies through OSC 52, which most modern terminals (and
//! tmux with `set-clipboard on`) forward to the system clipboard. The last
//! copied text is also mirrored in-process.

use std::io::Write;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::ClipboardError;

/// Sink for text the editor cuts.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;

    /// Most recently copied text, if any.
    fn text(&self) -> Option<&str>;
}

/// In-process clipboard, used headless and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }

    fn text(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

/// Terminal clipboard using the OSC 52 escape sequence.
pub struct Osc52Clipboard<W: Write> {
    writer: W,
    max_payload: usize,
    mirror: MemoryClipboard,
}

impl<W: Write> Osc52Clipboard<W> {
    /// Common OSC 52 size limit (base64 payload bytes).
    pub const DEFAULT_MAX_PAYLOAD: usize = 100_000;

    pub fn new(writer: W) -> Self {
        Self::with_max_payload(writer, Self::DEFAULT_MAX_PAYLOAD)
    }

    pub fn with_max_payload(writer: W, max_payload: usize) -> Self {
        Self {
            writer,
            max_payload,
            mirror: MemoryClipboard::new(),
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        // The mirror is updated even when the terminal write fails.
        self.mirror.set_text(text)?;

        let encoded = STANDARD.encode(text.as_bytes());
        if encoded.len() > self.max_payload {
            return Err(ClipboardError::PayloadTooLarge {
                len: encoded.len(),
                max: self.max_payload,
            });
        }
        write!(self.writer, "\x1b]52;c;{encoded}\x07")?;
        self.writer.flush()?;
        Ok(())
    }

    fn text(&self) -> Option<&str> {
        self.mirror.text()
    }
}
