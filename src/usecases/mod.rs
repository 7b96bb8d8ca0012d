//! Use case layer: application workflows and orchestration.

pub mod bootstrap;
pub mod chat_session;
pub mod context;
pub mod contracts;
pub mod load_history;
pub mod logout;
pub mod send_message;
pub mod shell;
pub mod startup;

/// Returns the usecases module name for smoke checks.
pub fn module_name() -> &'static str {
    "usecases"
}
