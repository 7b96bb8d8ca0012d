//! Message list rendering logic.
//!
//! Handles visual formatting of messages including:
//! - Sender grouping (consecutive messages from the same user show the name once)
//! - Own messages right-aligned with a seen marker
//! - Word wrapping to the panel width, so every element maps to whole rows

use chrono::{DateTime, Local, Utc};
use ratatui::{
    layout::Alignment,
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::domain::{avatar::initials, message::Message, shell_state::Theme};

use super::styles;

const SEEN_MARKER: &str = "✓ Seen";
/// Width of the `HH:MM ` column in front of other users' messages.
const TIME_COLUMN_WIDTH: usize = 6;

/// One message as it appears in the messages list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageListElement {
    pub time: String,
    /// Name and initials, present on the first message of a group.
    pub sender: Option<(String, String)>,
    pub content: String,
    pub own: bool,
    pub seen: bool,
}

/// Builds a list of visual elements from messages.
pub fn build_message_list_elements(
    messages: &[Message],
    local_username: &str,
) -> Vec<MessageListElement> {
    let mut elements = Vec::with_capacity(messages.len());
    let mut prev_sender: Option<&str> = None;

    for message in messages {
        let own = message.is_from(local_username);
        let sender = (!own && prev_sender != Some(message.sender.as_str()))
            .then(|| (message.sender.clone(), initials(&message.sender)));

        elements.push(MessageListElement {
            time: format_time(message.created_at),
            sender,
            content: message.display_content().to_owned(),
            own,
            seen: own && message.is_seen(),
        });

        prev_sender = Some(message.sender.as_str());
    }

    elements
}

/// Lays out elements as rows of at most `width` columns.
pub fn build_message_lines(
    elements: &[MessageListElement],
    width: usize,
    theme: Theme,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for element in elements {
        if element.own {
            push_own_message(&mut lines, &element.time, &element.content, element.seen, width, theme);
        } else {
            push_other_message(
                &mut lines,
                &element.time,
                element.sender.as_ref(),
                &element.content,
                width,
                theme,
            );
        }
    }

    lines
}

fn push_own_message(
    lines: &mut Vec<Line<'static>>,
    time: &str,
    content: &str,
    seen: bool,
    width: usize,
    theme: Theme,
) {
    let text_width = width.saturating_sub(TIME_COLUMN_WIDTH).max(1);
    for row in wrap_text(content, text_width) {
        lines.push(
            Line::from(Span::styled(row, styles::own_message_style(theme)))
                .alignment(Alignment::Right),
        );
    }

    let mut footer = vec![Span::styled(
        time.to_owned(),
        styles::message_time_style(theme),
    )];
    if seen {
        footer.push(Span::raw(" "));
        footer.push(Span::styled(
            SEEN_MARKER.to_owned(),
            styles::seen_marker_style(theme),
        ));
    }
    lines.push(Line::from(footer).alignment(Alignment::Right));
}

fn push_other_message(
    lines: &mut Vec<Line<'static>>,
    time: &str,
    sender: Option<&(String, String)>,
    content: &str,
    width: usize,
    theme: Theme,
) {
    if let Some((name, initials)) = sender {
        lines.push(Line::from(vec![
            Span::styled(format!("[{}] ", initials), styles::message_sender_style(theme)),
            Span::styled(name.clone(), styles::message_sender_style(theme)),
        ]));
    }

    let text_width = width.saturating_sub(TIME_COLUMN_WIDTH).max(1);
    for (index, row) in wrap_text(content, text_width).into_iter().enumerate() {
        let lead = if index == 0 {
            Span::styled(format!("{:>5} ", time), styles::message_time_style(theme))
        } else {
            Span::raw(" ".repeat(TIME_COLUMN_WIDTH))
        };
        lines.push(Line::from(vec![
            lead,
            Span::styled(row, styles::message_text_style(theme)),
        ]));
    }
}

/// Greedy word wrap by display width; words wider than a row are split.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split(' ') {
        let gap = usize::from(!current.is_empty());
        let word_width = word.width();

        if current_width + gap + word_width <= width {
            if gap == 1 {
                current.push(' ');
            }
            current.push_str(word);
            current_width += gap + word_width;
            continue;
        }

        if !current.is_empty() {
            rows.push(std::mem::take(&mut current));
            current_width = 0;
        }

        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width + ch_width > width && !current.is_empty() {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += ch_width;
        }
    }

    rows.push(current);
    rows
}

fn format_time(created_at: DateTime<Utc>) -> String {
    created_at.with_timezone(&Local).format("%H:%M").to_string()
}
