//! UI layer: terminal rendering and input for the chat screens.

mod event_source;
mod message_input;
mod message_rendering;
pub mod shell;
mod styles;
mod terminal;
mod view;

pub(crate) use event_source::{CrosstermEventSource, TICK_INTERVAL};

/// Returns the UI module name for smoke checks.
pub fn module_name() -> &'static str {
    "ui"
}
