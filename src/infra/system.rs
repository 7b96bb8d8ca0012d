use anyhow::{Context, Result};

use crate::infra::contracts::{ClipboardReader, ExternalOpener};

/// Opens URLs with the platform's default handler.
#[derive(Debug, Clone, Default)]
pub struct SystemOpener;

impl ExternalOpener for SystemOpener {
    fn open(&self, target: &str) -> Result<()> {
        open::that_detached(target).with_context(|| format!("failed to open {target}"))
    }
}

/// Reads the system clipboard lazily, so a headless session only fails on paste.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl ClipboardReader for SystemClipboard {
    fn read_text(&mut self) -> Result<String> {
        let mut clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().context("clipboard is unavailable")?,
        };

        let text = clipboard.get_text().context("clipboard holds no text");
        self.inner = Some(clipboard);
        text
    }
}
