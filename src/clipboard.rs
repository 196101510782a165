//! Clipboard access for copying captions and hashtags

use crate::error::ClipboardError;
use arboard::Clipboard;
use tracing::info;

/// Lazily opened system clipboard. Kept alive for the app lifetime so copied
/// text survives on platforms where the owner must keep serving it.
#[derive(Default)]
pub struct ClipboardWriter {
    inner: Option<Clipboard>,
}

impl ClipboardWriter {
    pub fn copy_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.inner.is_none() {
            self.inner = Some(Clipboard::new()?);
        }
        if let Some(clipboard) = self.inner.as_mut() {
            clipboard.set_text(text)?;
            info!(chars = text.chars().count(), "Copied to clipboard");
        }
        Ok(())
    }
}
