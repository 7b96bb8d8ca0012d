//! Backend integration layer: HTTP API, realtime channel and wire mapping.

pub mod http;
pub mod payloads;
pub mod realtime;
pub mod socketio;

use std::sync::mpsc::Sender;

use tokio::runtime::{Builder, Runtime};

use crate::{
    domain::{
        auth_form::{Credentials, Registration},
        events::AppEvent,
        realtime::VisitId,
    },
    infra::{config::BackendConfig, error::AppError, session_store::SessionStore},
    usecases::contracts::{BackendGateway, ChannelError, RealtimeChannel},
};

use self::{http::ApiClient, realtime::SocketChannel};

const BACKEND_EVENT_SEND_FAILED: &str = "BACKEND_EVENT_SEND_FAILED";

/// Returns the backend module name for smoke checks.
pub fn module_name() -> &'static str {
    "backend"
}

/// Runs network work on a background runtime and reports completions as
/// [`AppEvent`]s on the UI queue.
pub struct BackendAdapter {
    runtime: Runtime,
    api: ApiClient,
    session: SessionStore,
    events: Sender<AppEvent>,
}

impl std::fmt::Debug for BackendAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendAdapter")
            .field("base_url", &self.api.base_url())
            .finish_non_exhaustive()
    }
}

impl BackendAdapter {
    pub fn start(
        config: &BackendConfig,
        session: SessionStore,
        events: Sender<AppEvent>,
    ) -> Result<Self, AppError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("roomchat-net")
            .enable_all()
            .build()
            .map_err(AppError::RuntimeStart)?;
        let api = ApiClient::new(&config.base_url, session.clone())?;

        tracing::info!(base_url = %api.base_url(), "backend adapter started");

        Ok(Self {
            runtime,
            api,
            session,
            events,
        })
    }

    fn deliver(events: &Sender<AppEvent>, event: AppEvent) {
        if let Err(error) = events.send(event) {
            tracing::warn!(
                code = BACKEND_EVENT_SEND_FAILED,
                error = %error,
                "backend result dropped; event queue is closed"
            );
        }
    }
}

impl BackendGateway for BackendAdapter {
    fn request_login(&self, credentials: Credentials) {
        let api = self.api.clone();
        let events = self.events.clone();

        tracing::info!(username = %credentials.username, "login requested");
        self.runtime.spawn(async move {
            let result = api.login(&credentials).await;
            Self::deliver(&events, AppEvent::LoginFinished(result));
        });
    }

    fn request_register(&self, registration: Registration) {
        let api = self.api.clone();
        let events = self.events.clone();

        tracing::info!(
            username = %registration.credentials.username,
            with_avatar = registration.avatar.is_some(),
            "registration requested"
        );
        self.runtime.spawn(async move {
            let result = api.register(&registration).await;
            Self::deliver(&events, AppEvent::RegisterFinished(result));
        });
    }

    fn request_history(&self, visit: VisitId, room: &str) {
        let api = self.api.clone();
        let events = self.events.clone();
        let room = room.to_owned();

        tracing::debug!(%visit, room = %room, "history requested");
        self.runtime.spawn(async move {
            let result = api.fetch_history(&room).await;
            Self::deliver(&events, AppEvent::HistoryLoaded { visit, result });
        });
    }

    fn open_channel(&self, visit: VisitId) -> Result<Box<dyn RealtimeChannel>, ChannelError> {
        let token = self.session.token().ok_or(ChannelError::MissingToken)?;
        let url = socketio::websocket_url(self.api.base_url())?;

        Ok(Box::new(SocketChannel::open(
            self.runtime.handle(),
            url,
            token,
            visit,
            self.events.clone(),
        )))
    }
}
