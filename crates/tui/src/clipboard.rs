use anyhow::Context;
use gluetty_engine::AuxAction;
use tracing::debug;

/// Auxiliary action that copies `text` to the system clipboard.
pub fn clipboard_action(label: impl Into<String>, text: impl Into<String>) -> AuxAction {
    let text = text.into();
    AuxAction::new(label, move || {
        let mut clipboard = arboard::Clipboard::new().context("clipboard is unavailable")?;
        clipboard.set_text(text.clone()).context("failed to copy to clipboard")?;
        debug!(chars = text.chars().count(), "copied to clipboard");
        Ok(())
    })
}
