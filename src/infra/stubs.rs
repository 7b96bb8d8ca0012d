use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{anyhow, Result};

use crate::{
    domain::identity::Identity,
    infra::{
        config::AppConfig,
        contracts::{ClipboardReader, ConfigAdapter, ExternalOpener, SessionPersistence},
        error::AppError,
    },
};

#[derive(Debug, Clone, Default)]
pub struct StubConfigAdapter;

impl ConfigAdapter for StubConfigAdapter {
    fn load(&self) -> Result<AppConfig, AppError> {
        Ok(AppConfig::default())
    }
}

/// Keeps the identity in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionPersistence {
    stored: Arc<Mutex<Option<Identity>>>,
}

impl MemorySessionPersistence {
    pub fn with(identity: Identity) -> Self {
        Self {
            stored: Arc::new(Mutex::new(Some(identity))),
        }
    }

    pub fn stored(&self) -> Option<Identity> {
        self.stored
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SessionPersistence for MemorySessionPersistence {
    fn load(&self) -> Result<Option<Identity>, AppError> {
        Ok(self.stored())
    }

    fn save(&self, identity: &Identity) -> Result<(), AppError> {
        *self.stored.lock().unwrap_or_else(PoisonError::into_inner) = Some(identity.clone());
        Ok(())
    }

    fn clear(&self) -> Result<bool, AppError> {
        Ok(self
            .stored
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some())
    }
}

/// Records opened targets instead of launching anything.
#[derive(Debug, Clone, Default)]
pub struct NoopOpener {
    opened: Arc<Mutex<Vec<String>>>,
}

impl NoopOpener {
    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ExternalOpener for NoopOpener {
    fn open(&self, target: &str) -> Result<()> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(target.to_owned());
        Ok(())
    }
}

/// Serves a fixed clipboard text, or fails when none is set.
#[derive(Debug, Clone, Default)]
pub struct StubClipboard {
    pub text: Option<String>,
}

impl ClipboardReader for StubClipboard {
    fn read_text(&mut self) -> Result<String> {
        self.text
            .clone()
            .ok_or_else(|| anyhow!("clipboard is empty"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_config_returns_defaults() {
        let adapter = StubConfigAdapter;
        let config = adapter.load().expect("stub config must load");

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn memory_persistence_reports_whether_something_was_cleared() {
        let persistence = MemorySessionPersistence::with(Identity::new("alice", None, "t"));

        assert!(persistence.clear().expect("clear should succeed"));
        assert!(!persistence.clear().expect("clear should succeed"));
    }

    #[test]
    fn noop_opener_records_targets() {
        let opener = NoopOpener::default();
        opener.open("https://example.test").expect("open should succeed");

        assert_eq!(opener.opened(), vec!["https://example.test".to_owned()]);
    }
}
