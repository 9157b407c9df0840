//! Clipboard seam for the copy action.
//!
//! The session copies the authoritative template text through this trait so
//! the library core stays headless: the CLI wires in [`SystemClipboard`]
//! (behind the `clipboard` feature), tests and embedders can use
//! [`BufferClipboard`] or their own sink.

use crate::error::Doc2PromptError;

/// A destination for the copy action.
pub trait Clipboard {
    /// Replace the clipboard contents with `text`.
    fn set_text(&mut self, text: &str) -> Result<(), Doc2PromptError>;
}

/// In-memory clipboard: stores the last copied text.
#[derive(Debug, Default)]
pub struct BufferClipboard {
    /// The most recently copied text, if any.
    pub contents: Option<String>,
}

impl Clipboard for BufferClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), Doc2PromptError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// The operating system clipboard, via arboard.
#[cfg(feature = "clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "clipboard")]
impl SystemClipboard {
    /// Connect to the system clipboard.
    ///
    /// Fails on headless systems with no clipboard service.
    pub fn new() -> Result<Self, Doc2PromptError> {
        let inner =
            arboard::Clipboard::new().map_err(|e| Doc2PromptError::ClipboardFailed(e.to_string()))?;
        Ok(Self { inner })
    }
}

#[cfg(feature = "clipboard")]
impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), Doc2PromptError> {
        self.inner
            .set_text(text.to_string())
            .map_err(|e| Doc2PromptError::ClipboardFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_clipboard_stores_last_copy() {
        let mut cb = BufferClipboard::default();
        cb.set_text("first").unwrap();
        cb.set_text("second").unwrap();
        assert_eq!(cb.contents.as_deref(), Some("second"));
    }
}
