//! Transient toast notifications shown in the status line.

use std::collections::VecDeque;

/// Only the newest few toasts are kept on screen.
const MAX_VISIBLE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub text: String,
    ticks_left: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notifications {
    items: VecDeque<Notification>,
    ttl_ticks: u32,
}

impl Notifications {
    pub fn new(ttl_ticks: u32) -> Self {
        Self {
            items: VecDeque::new(),
            ttl_ticks: ttl_ticks.max(1),
        }
    }

    pub fn push(&mut self, level: NotificationLevel, text: impl Into<String>) {
        self.items.push_back(Notification {
            level,
            text: text.into(),
            ticks_left: self.ttl_ticks,
        });
        while self.items.len() > MAX_VISIBLE {
            self.items.pop_front();
        }
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(NotificationLevel::Success, text);
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(NotificationLevel::Info, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(NotificationLevel::Error, text);
    }

    pub fn tick(&mut self) {
        for item in &mut self.items {
            item.ticks_left = item.ticks_left.saturating_sub(1);
        }
        self.items.retain(|item| item.ticks_left > 0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.back()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(30)
    }
}
