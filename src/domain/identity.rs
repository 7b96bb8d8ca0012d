use serde::{Deserialize, Serialize};

/// The authenticated user as known to this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_ref: Option<String>,
    pub auth_token: String,
}

impl Identity {
    pub fn new(
        username: impl Into<String>,
        avatar_ref: Option<String>,
        auth_token: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            avatar_ref,
            auth_token: auth_token.into(),
        }
    }

    /// A stored identity only counts when it carries a usable token.
    pub fn is_authenticated(&self) -> bool {
        !self.auth_token.trim().is_empty()
    }
}
