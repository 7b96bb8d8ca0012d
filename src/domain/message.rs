use chrono::{DateTime, Utc};

/// A single chat message scoped to one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender: String,
    pub created_at: DateTime<Utc>,
    pub seen: Option<bool>,
    pub avatar_ref: Option<String>,
}

impl Message {
    pub fn is_seen(&self) -> bool {
        self.seen.unwrap_or(false)
    }

    pub fn mark_seen(&mut self) {
        self.seen = Some(true);
    }

    /// Exact, case-sensitive username match.
    pub fn is_from(&self, username: &str) -> bool {
        self.sender == username
    }

    /// Returns the text to render; blank messages get a visible placeholder.
    pub fn display_content(&self) -> &str {
        if self.content.trim().is_empty() {
            "[Empty message]"
        } else {
            &self.content
        }
    }
}
