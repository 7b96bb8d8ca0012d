//! JSON shapes exchanged with the chat backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{api::LoginSuccess, message::Message, realtime::OutboundEvent};

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserPayload,
}

#[derive(Debug, Deserialize)]
pub struct UserPayload {
    pub username: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl From<LoginResponse> for LoginSuccess {
    fn from(response: LoginResponse) -> Self {
        Self {
            token: response.access_token,
            username: response.user.username,
            avatar_ref: response.user.avatar.filter(|avatar| !avatar.is_empty()),
        }
    }
}

/// Error body used by the backend for rejected requests.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<serde_json::Value>,
}

impl ErrorBody {
    /// `message` is either a string or a list of validation strings.
    pub fn into_text(self) -> Option<String> {
        match self.message? {
            serde_json::Value::String(text) => Some(text),
            serde_json::Value::Array(items) => {
                let parts: Vec<String> = items
                    .into_iter()
                    .filter_map(|item| item.as_str().map(str::to_owned))
                    .collect();
                (!parts.is_empty()).then(|| parts.join(", "))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagePayload {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub content: String,
    pub sender: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub seen: Option<bool>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl From<MessagePayload> for Message {
    fn from(payload: MessagePayload) -> Self {
        Self {
            id: payload.id,
            content: payload.content,
            sender: payload.sender,
            created_at: payload.created_at,
            seen: payload.seen,
            avatar_ref: payload.avatar.filter(|avatar| !avatar.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypingPayload {
    pub user: String,
    pub typing: bool,
}

#[derive(Debug, Serialize)]
struct RoomPayload<'a> {
    room: &'a str,
}

#[derive(Debug, Serialize)]
struct MessageOutPayload<'a> {
    room: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct TypingOutPayload<'a> {
    room: &'a str,
    typing: bool,
}

/// JSON argument sent along with an outbound event.
pub fn outbound_payload(event: &OutboundEvent) -> serde_json::Result<serde_json::Value> {
    match event {
        OutboundEvent::Join { room }
        | OutboundEvent::Leave { room }
        | OutboundEvent::Seen { room } => serde_json::to_value(RoomPayload { room }),
        OutboundEvent::Message {
            room,
            content,
            avatar,
        } => serde_json::to_value(MessageOutPayload {
            room,
            content,
            avatar: avatar.as_deref(),
        }),
        OutboundEvent::Typing { room, typing } => serde_json::to_value(TypingOutPayload {
            room,
            typing: *typing,
        }),
    }
}
