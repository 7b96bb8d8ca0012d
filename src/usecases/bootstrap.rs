use std::{path::Path, sync::mpsc};

use crate::{
    backend::BackendAdapter,
    domain::{
        avatar::AvatarResolver,
        notifications::Notifications,
        shell_state::{ShellState, Theme},
    },
    infra::{
        self,
        config::{AppConfig, FileConfigAdapter, UiConfig},
        contracts::ConfigAdapter,
        error::AppError,
        session_store::SessionStore,
        storage_layout::StorageLayout,
        system::{SystemClipboard, SystemOpener},
    },
    ui::{CrosstermEventSource, TICK_INTERVAL},
    usecases::{
        context::AppContext,
        contracts::{AppEventSource, ShellOrchestrator},
        shell::{DefaultShellOrchestrator, ShellServices},
    },
};

pub struct ShellComposition {
    pub event_source: Box<dyn AppEventSource>,
    pub orchestrator: Box<dyn ShellOrchestrator>,
}

pub fn bootstrap(config_path: Option<&Path>) -> Result<AppContext, AppError> {
    let config = load_config(&FileConfigAdapter::new(config_path))?;
    let layout = StorageLayout::resolve()?;
    layout.ensure_dirs()?;

    let logging = infra::logging::init(&config.logging, &layout.cache_dir, layout.log_file_name())?;

    Ok(AppContext::new(config, layout, Some(logging)))
}

fn load_config(adapter: &dyn ConfigAdapter) -> Result<AppConfig, AppError> {
    adapter.load()
}

/// Wires the backend runtime, the terminal event source and the shell around
/// one shared event queue.
pub fn compose_shell(
    context: &AppContext,
    session: SessionStore,
) -> Result<ShellComposition, AppError> {
    let (events_tx, events_rx) = mpsc::channel();
    let backend = &context.config.backend;

    let gateway = BackendAdapter::start(backend, session.clone(), events_tx)?;
    let avatars = AvatarResolver::new(
        &backend.base_url,
        &backend.avatar_upload_path,
        &backend.placeholder_avatar_url,
    );

    let orchestrator = DefaultShellOrchestrator::new(
        ShellServices {
            gateway,
            session,
            avatars,
            opener: SystemOpener,
            clipboard: SystemClipboard::default(),
        },
        initial_state(&context.config.ui),
    );

    Ok(ShellComposition {
        event_source: Box::new(CrosstermEventSource::new(events_rx)),
        orchestrator: Box::new(orchestrator),
    })
}

fn initial_state(ui: &UiConfig) -> ShellState {
    ShellState::new(
        Theme::from_name(&ui.theme),
        Notifications::new(notification_ticks(ui.notification_ttl_ms)),
    )
}

/// Converts the configured toast lifetime into UI ticks.
fn notification_ticks(ttl_ms: u64) -> u32 {
    let tick_ms = u64::try_from(TICK_INTERVAL.as_millis()).unwrap_or(u64::MAX).max(1);
    u32::try_from(ttl_ms / tick_ms).unwrap_or(u32::MAX)
}
