use anyhow::Result;
use thiserror::Error;

use crate::domain::{
    auth_form::{Credentials, Registration},
    events::AppEvent,
    realtime::{OutboundEvent, VisitId},
    shell_state::ShellState,
};

pub trait AppEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>>;
}

pub trait ShellOrchestrator {
    fn state(&self) -> &ShellState;
    fn state_mut(&mut self) -> &mut ShellState;
    fn handle_event(&mut self, event: AppEvent) -> Result<()>;
}

/// Starts backend work. Results come back later through the event queue as
/// `LoginFinished`, `RegisterFinished`, `HistoryLoaded` and `Realtime`.
pub trait BackendGateway {
    fn request_login(&self, credentials: Credentials);
    fn request_register(&self, registration: Registration);
    fn request_history(&self, visit: VisitId, room: &str);
    fn open_channel(&self, visit: VisitId) -> Result<Box<dyn RealtimeChannel>, ChannelError>;
}

impl<T: BackendGateway + ?Sized> BackendGateway for &T {
    fn request_login(&self, credentials: Credentials) {
        (*self).request_login(credentials)
    }

    fn request_register(&self, registration: Registration) {
        (*self).request_register(registration)
    }

    fn request_history(&self, visit: VisitId, room: &str) {
        (*self).request_history(visit, room)
    }

    fn open_channel(&self, visit: VisitId) -> Result<Box<dyn RealtimeChannel>, ChannelError> {
        (*self).open_channel(visit)
    }
}

/// One realtime connection, scoped to a single room visit.
pub trait RealtimeChannel {
    /// Queues an event for the server. Fails only when the channel is gone.
    fn emit(&self, event: OutboundEvent) -> Result<(), ChannelError>;
    /// Stops the connection; idempotent.
    fn close(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("no auth token available")]
    MissingToken,
    #[error("invalid realtime endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("realtime channel is closed")]
    Closed,
}
