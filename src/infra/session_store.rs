//! Process-wide session: the signed-in identity and its bearer token.
//!
//! The store is populated once at startup from persistence and changes only
//! through [`SessionStore::login`] and [`SessionStore::logout`]. Clones share
//! the same state, so the HTTP client always reads the current token.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use crate::{
    domain::identity::Identity,
    infra::{contracts::SessionPersistence, error::AppError, secrets::describe_token},
};

const SESSION_RESTORED: &str = "SESSION_RESTORED";
const SESSION_DISCARDED: &str = "SESSION_DISCARDED";

#[derive(Clone)]
pub struct SessionStore {
    current: Arc<Mutex<Option<Identity>>>,
    persistence: Arc<dyn SessionPersistence>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("user", &self.current_user().map(|user| user.username))
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Restores the persisted identity, if any.
    ///
    /// An unreadable or token-less record is discarded rather than failing
    /// startup; the user simply has to sign in again.
    pub fn open(persistence: Arc<dyn SessionPersistence>) -> Result<Self, AppError> {
        let restored = match persistence.load() {
            Ok(Some(identity)) if identity.is_authenticated() => {
                tracing::info!(
                    code = SESSION_RESTORED,
                    username = %identity.username,
                    token = %describe_token(&identity.auth_token),
                    "restored persisted session"
                );
                Some(identity)
            }
            Ok(Some(_)) => {
                tracing::warn!(code = SESSION_DISCARDED, "persisted session has no token");
                persistence.clear()?;
                None
            }
            Ok(None) => None,
            Err(AppError::SessionDecode { path, source }) => {
                tracing::warn!(
                    code = SESSION_DISCARDED,
                    path = %path.display(),
                    error = %source,
                    "persisted session is unreadable"
                );
                persistence.clear()?;
                None
            }
            Err(error) => return Err(error),
        };

        Ok(Self {
            current: Arc::new(Mutex::new(restored)),
            persistence,
        })
    }

    pub fn login(&self, identity: Identity) -> Result<(), AppError> {
        self.persistence.save(&identity)?;
        tracing::info!(username = %identity.username, "session stored");
        *self.lock() = Some(identity);
        Ok(())
    }

    /// Clears memory first so a persistence failure never leaves the client
    /// authenticated.
    pub fn logout(&self) -> Result<(), AppError> {
        let previous = self.lock().take();
        let removed = self.persistence.clear()?;
        tracing::info!(
            username = previous.as_ref().map(|user| user.username.as_str()),
            removed,
            "session cleared"
        );
        Ok(())
    }

    pub fn current_user(&self) -> Option<Identity> {
        self.lock().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.lock()
            .as_ref()
            .filter(|identity| identity.is_authenticated())
            .map(|identity| identity.auth_token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Identity>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Stores the identity as JSON in the user's config directory.
#[derive(Debug, Clone)]
pub struct FileSessionPersistence {
    path: PathBuf,
}

impl FileSessionPersistence {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> AppError {
        AppError::SessionIo {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionPersistence for FileSessionPersistence {
    fn load(&self) -> Result<Option<Identity>, AppError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| AppError::SessionDecode {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&self, identity: &Identity) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let raw = serde_json::to_vec_pretty(identity).map_err(|source| AppError::SessionDecode {
            path: self.path.clone(),
            source,
        })?;

        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, raw).map_err(|source| self.io_error(source))?;
        restrict_permissions(&staging).map_err(|source| self.io_error(source))?;
        fs::rename(&staging, &self.path).map_err(|source| self.io_error(source))
    }

    fn clear(&self) -> Result<bool, AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(source) if source.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(self.io_error(source)),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
