//! Domain layer: chat entities, screen state and the rules that drive them.

pub mod api;
pub mod auth_form;
pub mod avatar;
pub mod events;
pub mod identity;
pub mod message;
pub mod notifications;
pub mod realtime;
pub mod room_select_state;
pub mod room_session;
pub mod shell_state;
pub mod text_input_state;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
