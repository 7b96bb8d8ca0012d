use super::{
    api::{ApiError, LoginSuccess},
    message::Message,
    realtime::{RealtimeEvent, VisitId},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Tick,
    QuitRequested,
    InputKey(KeyInput),
    MouseScroll(ScrollDirection),
    LoginFinished(Result<LoginSuccess, ApiError>),
    RegisterFinished(Result<(), ApiError>),
    HistoryLoaded {
        visit: VisitId,
        result: Result<Vec<Message>, ApiError>,
    },
    Realtime {
        visit: VisitId,
        event: RealtimeEvent,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// A key press. Printable keys carry the character, others a lowercase name
/// such as `enter`, `backspace` or `pageup`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, ctrl: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
        }
    }

    /// The typed character, for plain single-character keys.
    pub fn as_char(&self) -> Option<char> {
        if self.ctrl {
            return None;
        }
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ch),
            _ => None,
        }
    }

    pub fn is_ctrl(&self, key: &str) -> bool {
        self.ctrl && self.key == key
    }

    pub fn is(&self, key: &str) -> bool {
        !self.ctrl && self.key == key
    }
}
