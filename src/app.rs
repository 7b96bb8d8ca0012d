use std::path::Path;

use anyhow::Result;

use crate::{
    backend,
    cli::{Cli, Command},
    domain, infra,
    infra::storage_layout::StorageLayout,
    ui,
    usecases::{
        self, bootstrap,
        logout::logout_and_reset,
        startup::{plan_startup, StartupPlan},
    },
};

pub fn run(cli: Cli) -> Result<()> {
    match cli.command_or_default() {
        Command::Run => run_shell(cli.config.as_deref()),
        Command::Logout => run_logout(cli.config.as_deref()),
    }
}

fn log_module_boundaries() {
    tracing::debug!(
        ui = ui::module_name(),
        domain = domain::module_name(),
        backend = backend::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );
}

fn run_shell(config_path: Option<&Path>) -> Result<()> {
    let context = bootstrap::bootstrap(config_path)?;
    log_module_boundaries();

    let StartupPlan {
        lock_guard: _lock_guard,
        session,
    } = plan_startup(&context.layout)?;

    let mut shell = bootstrap::compose_shell(&context, session)?;
    ui::shell::start(
        &context,
        shell.event_source.as_mut(),
        shell.orchestrator.as_mut(),
    )
}

fn run_logout(config_path: Option<&Path>) -> Result<()> {
    let context = match bootstrap::bootstrap(config_path) {
        Ok(context) => Some(context),
        Err(error) => {
            eprintln!("warning: {error}; clearing the saved session anyway");
            None
        }
    };
    log_module_boundaries();

    let layout = match &context {
        Some(context) => context.layout.clone(),
        None => StorageLayout::resolve()?,
    };

    let outcome = logout_and_reset(&layout)?;
    tracing::info!(
        session_removed = outcome.session_removed,
        "logout completed"
    );
    println!("{}", logout_summary(outcome.session_removed));

    Ok(())
}

fn logout_summary(session_removed: bool) -> &'static str {
    if session_removed {
        "Logged out. The saved session was removed."
    } else {
        "No saved session found. Nothing to remove."
    }
}
