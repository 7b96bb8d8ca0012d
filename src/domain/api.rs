//! Outcomes of backend HTTP calls as seen by the rest of the client.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("not authorized")]
    Unauthorized,
    #[error("request rejected with status {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
    },
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("unexpected response: {0}")]
    InvalidData(String),
    #[error("failed to read avatar file: {0}")]
    AvatarRead(String),
}

impl ApiError {
    /// Message provided by the backend, if any, suitable for a notification.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }
}

/// Successful login: the token plus the user record returned with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSuccess {
    pub token: String,
    pub username: String,
    pub avatar_ref: Option<String>,
}
