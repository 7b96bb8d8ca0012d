use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub backend: BackendConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackendConfig {
    /// HTTP origin of the chat backend; the realtime channel uses the same host.
    pub base_url: String,
    pub avatar_upload_path: String,
    pub placeholder_avatar_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_owned(),
            avatar_upload_path: "/uploads/avatars".to_owned(),
            placeholder_avatar_url: "https://ui-avatars.com/api/".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UiConfig {
    pub theme: String,
    pub notification_ttl_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "light".to_owned(),
            notification_ttl_ms: 3_000,
        }
    }
}
