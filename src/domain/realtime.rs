//! Events exchanged with the realtime channel of a room visit.

use super::message::Message;

/// Identifies one visit of the chat screen. Events tagged with an older
/// visit belong to a torn-down channel and are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisitId(pub u64);

impl VisitId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for VisitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "visit-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    Join {
        room: String,
    },
    Leave {
        room: String,
    },
    Message {
        room: String,
        content: String,
        avatar: Option<String>,
    },
    Typing {
        room: String,
        typing: bool,
    },
    Seen {
        room: String,
    },
}

impl OutboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Leave { .. } => "leave",
            Self::Message { .. } => "message",
            Self::Typing { .. } => "typing",
            Self::Seen { .. } => "seen",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Message(Message),
    Typing { user: String, typing: bool },
    Users(Vec<String>),
    Seen,
}

/// Everything the channel reports back to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RealtimeEvent {
    Connected,
    ConnectFailed(String),
    Disconnected(String),
    Inbound(InboundEvent),
}
