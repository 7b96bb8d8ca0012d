//! Local state of the chat screen for one room visit.
//!
//! Scrolling is tracked in rendered rows. While pinned to the bottom the view
//! follows new content; once the user scrolls up the view keeps its top row
//! and incoming messages from other users are counted as unseen instead.

use std::collections::BTreeSet;

use super::message::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryState {
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAnchor {
    AtBottom,
    ScrolledUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMotion {
    Instant,
    Animated,
}

/// Result of a user scroll gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    Unchanged,
    Moved,
    LeftBottom,
    ReachedBottom,
}

/// What happened to the view when a message arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncomingEffect {
    FollowedBottom,
    ScrolledToOwnMessage,
    CountedUnseen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScrollPosition {
    /// Following the newest content; `gap` rows remain of an animated scroll.
    Pinned { gap: usize },
    /// Detached at an absolute top row.
    Free { top: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSession {
    room_name: String,
    messages: Vec<Message>,
    online_users: BTreeSet<String>,
    typing_user: Option<String>,
    history_state: HistoryState,
    position: ScrollPosition,
    unseen_count: usize,
    max_top: usize,
}

impl RoomSession {
    pub fn new(room_name: impl Into<String>) -> Self {
        Self {
            room_name: room_name.into(),
            messages: Vec::new(),
            online_users: BTreeSet::new(),
            typing_user: None,
            history_state: HistoryState::Loading,
            position: ScrollPosition::Pinned { gap: 0 },
            unseen_count: 0,
            max_top: 0,
        }
    }

    pub fn room_name(&self) -> &str {
        &self.room_name
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn online_users(&self) -> impl Iterator<Item = &str> {
        self.online_users.iter().map(String::as_str)
    }

    pub fn online_count(&self) -> usize {
        self.online_users.len()
    }

    pub fn history_state(&self) -> HistoryState {
        self.history_state
    }

    pub fn unseen_count(&self) -> usize {
        self.unseen_count
    }

    pub fn anchor(&self) -> ScrollAnchor {
        match self.position {
            ScrollPosition::Pinned { .. } => ScrollAnchor::AtBottom,
            ScrollPosition::Free { .. } => ScrollAnchor::ScrolledUp,
        }
    }

    pub fn is_at_bottom(&self) -> bool {
        self.anchor() == ScrollAnchor::AtBottom
    }

    /// True while an animated scroll to the bottom is still in progress.
    pub fn is_animating(&self) -> bool {
        matches!(self.position, ScrollPosition::Pinned { gap } if gap > 0)
    }

    /// First row to display, given the last known content geometry.
    pub fn top_row(&self) -> usize {
        match self.position {
            ScrollPosition::Pinned { gap } => self.max_top.saturating_sub(gap),
            ScrollPosition::Free { top } => top.min(self.max_top),
        }
    }

    /// Remote user currently typing, never the local user.
    pub fn visible_typing_user(&self, local_username: &str) -> Option<&str> {
        self.typing_user
            .as_deref()
            .filter(|user| *user != local_username)
    }

    /// Replaces the message list with fetched history and jumps to the bottom.
    pub fn hydrate(&mut self, history: Vec<Message>) {
        self.messages = history;
        self.history_state = HistoryState::Ready;
        self.scroll_to_bottom(ScrollMotion::Instant);
    }

    pub fn history_failed(&mut self) {
        self.history_state = HistoryState::Error;
    }

    pub fn receive_message(&mut self, message: Message, local_username: &str) -> IncomingEffect {
        let is_own = message.is_from(local_username);
        self.messages.push(message);

        if is_own {
            self.scroll_to_bottom(ScrollMotion::Animated);
            return IncomingEffect::ScrolledToOwnMessage;
        }

        if self.is_at_bottom() {
            IncomingEffect::FollowedBottom
        } else {
            self.unseen_count += 1;
            IncomingEffect::CountedUnseen
        }
    }

    /// Single-slot indicator: the last event wins, `typing=false` clears it.
    pub fn apply_typing(&mut self, user: String, typing: bool) {
        self.typing_user = typing.then_some(user);
    }

    pub fn set_online_users(&mut self, users: Vec<String>) {
        self.online_users = users.into_iter().collect();
    }

    /// Marks every message sent by the local user as seen.
    pub fn mark_own_seen(&mut self, local_username: &str) -> usize {
        let mut marked = 0;
        for message in self
            .messages
            .iter_mut()
            .filter(|message| message.is_from(local_username))
        {
            if !message.is_seen() {
                marked += 1;
            }
            message.mark_seen();
        }
        marked
    }

    /// Pins the view to the bottom. Returns true if the view was scrolled up.
    pub fn scroll_to_bottom(&mut self, motion: ScrollMotion) -> bool {
        let current_top = self.top_row();
        let was_scrolled_up = !self.is_at_bottom();

        let gap = match motion {
            ScrollMotion::Instant => 0,
            ScrollMotion::Animated => self.max_top.saturating_sub(current_top),
        };

        self.position = ScrollPosition::Pinned { gap };
        self.unseen_count = 0;
        was_scrolled_up
    }

    pub fn scroll_up(&mut self, rows: usize) -> ScrollOutcome {
        let current_top = self.top_row();
        let new_top = current_top.saturating_sub(rows);

        if new_top == current_top {
            return ScrollOutcome::Unchanged;
        }

        let left_bottom = self.is_at_bottom();
        self.position = ScrollPosition::Free { top: new_top };

        if left_bottom {
            ScrollOutcome::LeftBottom
        } else {
            ScrollOutcome::Moved
        }
    }

    pub fn scroll_down(&mut self, rows: usize) -> ScrollOutcome {
        match self.position {
            ScrollPosition::Pinned { gap } if gap > 0 => {
                self.position = ScrollPosition::Pinned {
                    gap: gap.saturating_sub(rows),
                };
                ScrollOutcome::Moved
            }
            ScrollPosition::Pinned { .. } => ScrollOutcome::Unchanged,
            ScrollPosition::Free { top } => {
                let new_top = top.saturating_add(rows);
                if new_top >= self.max_top {
                    self.scroll_to_bottom(ScrollMotion::Instant);
                    ScrollOutcome::ReachedBottom
                } else {
                    self.position = ScrollPosition::Free { top: new_top };
                    ScrollOutcome::Moved
                }
            }
        }
    }

    /// Advances an animated scroll by one frame.
    pub fn tick(&mut self) {
        if let ScrollPosition::Pinned { gap } = self.position {
            if gap > 0 {
                let step = gap.div_ceil(2).max(1);
                self.position = ScrollPosition::Pinned {
                    gap: gap.saturating_sub(step),
                };
            }
        }
    }

    /// Records the rendered geometry and clamps the scroll position to it.
    pub fn set_viewport(&mut self, content_rows: usize, viewport_rows: usize) {
        self.max_top = content_rows.saturating_sub(viewport_rows);

        match self.position {
            ScrollPosition::Pinned { gap } => {
                self.position = ScrollPosition::Pinned {
                    gap: gap.min(self.max_top),
                };
            }
            ScrollPosition::Free { top } if top >= self.max_top => {
                self.scroll_to_bottom(ScrollMotion::Instant);
            }
            ScrollPosition::Free { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn message(id: &str, sender: &str) -> Message {
        Message {
            id: id.to_owned(),
            content: format!("text {id}"),
            sender: sender.to_owned(),
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            seen: None,
            avatar_ref: None,
        }
    }

    fn scrolled_up_session() -> RoomSession {
        let mut session = RoomSession::new("general");
        session.hydrate(vec![message("1", "bob"), message("2", "alice")]);
        session.set_viewport(100, 20);
        assert_eq!(session.scroll_up(30), ScrollOutcome::LeftBottom);
        session
    }

    #[test]
    fn new_session_is_loading_at_bottom() {
        let session = RoomSession::new("general");

        assert_eq!(session.room_name(), "general");
        assert_eq!(session.history_state(), HistoryState::Loading);
        assert_eq!(session.anchor(), ScrollAnchor::AtBottom);
        assert_eq!(session.unseen_count(), 0);
    }

    #[test]
    fn hydrate_replaces_messages_and_pins_bottom_without_animation() {
        let mut session = RoomSession::new("general");
        session.receive_message(message("early", "bob"), "alice");

        session.hydrate(vec![
            message("1", "bob"),
            message("2", "carol"),
            message("3", "alice"),
        ]);
        session.set_viewport(60, 20);

        let ids: Vec<_> = session.messages().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(session.history_state(), HistoryState::Ready);
        assert!(session.is_at_bottom());
        assert!(!session.is_animating());
        assert_eq!(session.top_row(), 40);
        assert_eq!(session.unseen_count(), 0);
    }

    #[test]
    fn history_failure_keeps_realtime_messages() {
        let mut session = RoomSession::new("general");
        session.receive_message(message("1", "bob"), "alice");

        session.history_failed();

        assert_eq!(session.history_state(), HistoryState::Error);
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn message_while_at_bottom_follows_without_counting() {
        let mut session = RoomSession::new("general");
        session.hydrate(vec![]);

        let effect = session.receive_message(message("1", "bob"), "alice");

        assert_eq!(effect, IncomingEffect::FollowedBottom);
        assert_eq!(session.unseen_count(), 0);
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn message_from_other_user_while_scrolled_up_counts_unseen_and_keeps_position() {
        let mut session = scrolled_up_session();
        let top_before = session.top_row();

        let effect = session.receive_message(message("3", "bob"), "alice");
        session.set_viewport(104, 20);

        assert_eq!(effect, IncomingEffect::CountedUnseen);
        assert_eq!(session.unseen_count(), 1);
        assert_eq!(session.messages().len(), 3);
        assert_eq!(session.anchor(), ScrollAnchor::ScrolledUp);
        assert_eq!(session.top_row(), top_before);
    }

    #[test]
    fn unseen_count_tracks_only_non_self_messages_since_leaving_bottom() {
        let mut session = scrolled_up_session();

        session.receive_message(message("3", "bob"), "alice");
        session.receive_message(message("4", "carol"), "alice");
        session.receive_message(message("5", "bob"), "alice");

        assert_eq!(session.unseen_count(), 3);
    }

    #[test]
    fn own_message_while_scrolled_up_animates_to_bottom_and_resets_count() {
        let mut session = scrolled_up_session();
        session.receive_message(message("3", "bob"), "alice");

        let effect = session.receive_message(message("4", "alice"), "alice");

        assert_eq!(effect, IncomingEffect::ScrolledToOwnMessage);
        assert!(session.is_at_bottom());
        assert!(session.is_animating());
        assert_eq!(session.unseen_count(), 0);
    }

    #[test]
    fn explicit_scroll_to_bottom_animates_and_resets_unseen() {
        let mut session = scrolled_up_session();
        for id in ["3", "4", "5", "6"] {
            session.receive_message(message(id, "bob"), "alice");
        }
        assert_eq!(session.unseen_count(), 4);

        let was_scrolled_up = session.scroll_to_bottom(ScrollMotion::Animated);

        assert!(was_scrolled_up);
        assert_eq!(session.unseen_count(), 0);
        assert!(session.is_at_bottom());
        assert!(session.is_animating());

        for _ in 0..16 {
            session.tick();
        }
        assert!(!session.is_animating());
        assert_eq!(session.top_row(), 80);
    }

    #[test]
    fn scrolling_down_to_the_end_reaches_bottom_and_resets_unseen() {
        let mut session = scrolled_up_session();
        session.receive_message(message("3", "bob"), "alice");

        assert_eq!(session.scroll_down(10), ScrollOutcome::Moved);
        assert_eq!(session.unseen_count(), 1);

        assert_eq!(session.scroll_down(50), ScrollOutcome::ReachedBottom);
        assert!(session.is_at_bottom());
        assert_eq!(session.unseen_count(), 0);
    }

    #[test]
    fn scroll_up_is_noop_when_content_fits_viewport() {
        let mut session = RoomSession::new("general");
        session.hydrate(vec![message("1", "bob")]);
        session.set_viewport(5, 20);

        assert_eq!(session.scroll_up(3), ScrollOutcome::Unchanged);
        assert!(session.is_at_bottom());
    }

    #[test]
    fn user_scroll_up_cancels_running_animation() {
        let mut session = scrolled_up_session();
        session.scroll_to_bottom(ScrollMotion::Animated);

        assert_eq!(session.scroll_up(1), ScrollOutcome::LeftBottom);
        assert!(!session.is_animating());
        assert_eq!(session.anchor(), ScrollAnchor::ScrolledUp);
    }

    #[test]
    fn shrinking_geometry_below_free_top_pins_bottom() {
        let mut session = scrolled_up_session();
        session.receive_message(message("3", "bob"), "alice");

        session.set_viewport(30, 20);

        assert!(session.is_at_bottom());
        assert_eq!(session.unseen_count(), 0);
    }

    #[test]
    fn typing_indicator_is_single_slot_and_hides_local_user() {
        let mut session = RoomSession::new("general");

        session.apply_typing("bob".to_owned(), true);
        assert_eq!(session.visible_typing_user("alice"), Some("bob"));

        session.apply_typing("carol".to_owned(), true);
        assert_eq!(session.visible_typing_user("alice"), Some("carol"));

        session.apply_typing("alice".to_owned(), true);
        assert_eq!(session.visible_typing_user("alice"), None);

        session.apply_typing("bob".to_owned(), false);
        assert_eq!(session.visible_typing_user("alice"), None);
    }

    #[test]
    fn online_users_are_replaced_wholesale() {
        let mut session = RoomSession::new("general");
        session.set_online_users(vec!["bob".to_owned(), "alice".to_owned()]);
        session.set_online_users(vec!["carol".to_owned()]);

        assert_eq!(session.online_users().collect::<Vec<_>>(), vec!["carol"]);
        assert_eq!(session.online_count(), 1);
    }

    #[test]
    fn seen_marks_only_local_user_messages() {
        let mut session = RoomSession::new("general");
        session.hydrate(vec![
            message("1", "alice"),
            message("2", "bob"),
            message("3", "alice"),
        ]);

        assert_eq!(session.mark_own_seen("alice"), 2);

        let seen: Vec<_> = session.messages().iter().map(Message::is_seen).collect();
        assert_eq!(seen, vec![true, false, true]);
        assert_eq!(session.mark_own_seen("alice"), 0);
    }
}
