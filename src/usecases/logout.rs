use crate::infra::{
    contracts::SessionPersistence, error::AppError, session_store::FileSessionPersistence,
    storage_layout::StorageLayout,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutOutcome {
    pub session_removed: bool,
}

/// Forgets the persisted identity without starting the TUI.
pub fn logout_and_reset(layout: &StorageLayout) -> Result<LogoutOutcome, AppError> {
    layout.ensure_dirs()?;

    let persistence = FileSessionPersistence::new(layout.session_file());
    let session_removed = persistence.clear()?;

    Ok(LogoutOutcome { session_removed })
}
