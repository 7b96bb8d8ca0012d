use anyhow::Result;

use crate::usecases::{
    context::AppContext,
    contracts::{AppEventSource, ShellOrchestrator},
};

use super::{terminal::TerminalSession, view};

pub fn start(
    context: &AppContext,
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
) -> Result<()> {
    tracing::info!(
        log_level = %context.config.logging.level,
        base_url = %context.config.backend.base_url,
        theme = %context.config.ui.theme,
        "starting TUI shell"
    );

    let mut terminal = TerminalSession::new()?;
    run_loop(event_source, orchestrator, |orchestrator| {
        terminal.draw(|frame| view::render(frame, orchestrator.state_mut()))
    })?;

    tracing::info!("TUI shell stopped");
    Ok(())
}

/// Draws, then handles one event, until the shell stops or the source runs dry.
fn run_loop<D>(
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
    mut draw: D,
) -> Result<()>
where
    D: FnMut(&mut dyn ShellOrchestrator) -> Result<()>,
{
    while orchestrator.state().is_running() {
        draw(orchestrator)?;

        match event_source.next_event()? {
            Some(event) => orchestrator.handle_event(event)?,
            None => continue,
        }
    }

    Ok(())
}
