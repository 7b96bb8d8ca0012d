use anyhow::Result;

use crate::{
    domain::identity::Identity,
    infra::{config::AppConfig, error::AppError},
};

pub trait ConfigAdapter {
    fn load(&self) -> Result<AppConfig, AppError>;
}

/// Durable storage for the signed-in identity.
pub trait SessionPersistence: Send + Sync {
    fn load(&self) -> Result<Option<Identity>, AppError>;
    fn save(&self, identity: &Identity) -> Result<(), AppError>;
    fn clear(&self) -> Result<bool, AppError>;
}

pub trait ExternalOpener {
    fn open(&self, target: &str) -> Result<()>;
}

pub trait ClipboardReader {
    fn read_text(&mut self) -> Result<String>;
}
