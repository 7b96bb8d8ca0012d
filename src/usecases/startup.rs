use std::{
    fs::{File, OpenOptions},
    path::PathBuf,
    sync::Arc,
};

use fs2::FileExt;

use crate::infra::{
    error::AppError,
    session_store::{FileSessionPersistence, SessionStore},
    storage_layout::StorageLayout,
};

/// Holds the exclusive lock on the session directory for the whole run.
#[derive(Debug)]
pub struct SessionLockGuard {
    file: File,
    path: PathBuf,
}

impl Drop for SessionLockGuard {
    fn drop(&mut self) {
        if let Err(error) = FileExt::unlock(&self.file) {
            tracing::debug!(path = %self.path.display(), error = %error, "session lock release failed");
        }
    }
}

pub struct StartupPlan {
    pub lock_guard: SessionLockGuard,
    pub session: SessionStore,
}

pub fn plan_startup(layout: &StorageLayout) -> Result<StartupPlan, AppError> {
    layout.ensure_dirs()?;

    let lock_guard = acquire_session_lock(layout.session_lock_file())?;
    let session = SessionStore::open(Arc::new(FileSessionPersistence::new(
        layout.session_file(),
    )))?;

    tracing::info!(
        authenticated = session.is_authenticated(),
        "startup session state resolved"
    );

    Ok(StartupPlan {
        lock_guard,
        session,
    })
}

fn acquire_session_lock(path: PathBuf) -> Result<SessionLockGuard, AppError> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(&path)
        .map_err(|source| AppError::SessionLock {
            path: path.clone(),
            source,
        })?;

    match file.try_lock_exclusive() {
        Ok(()) => Ok(SessionLockGuard { file, path }),
        Err(source) if source.raw_os_error() == fs2::lock_contended_error().raw_os_error() => {
            Err(AppError::SessionStoreBusy { path })
        }
        Err(source) => Err(AppError::SessionLock { path, source }),
    }
}
