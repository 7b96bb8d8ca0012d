//! Style definitions for the UI components, per theme.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::{notifications::NotificationLevel, shell_state::Theme};

/// Colors of one theme. Light assumes a bright terminal background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Palette {
    text: Color,
    muted: Color,
    accent: Color,
    own: Color,
    success: Color,
    error: Color,
}

const LIGHT: Palette = Palette {
    text: Color::Black,
    muted: Color::Gray,
    accent: Color::Blue,
    own: Color::Magenta,
    success: Color::Green,
    error: Color::Red,
};

const DARK: Palette = Palette {
    text: Color::White,
    muted: Color::DarkGray,
    accent: Color::Cyan,
    own: Color::LightMagenta,
    success: Color::LightGreen,
    error: Color::LightRed,
};

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => LIGHT,
        Theme::Dark => DARK,
    }
}

// =============================================================================
// Shell chrome
// =============================================================================

/// Style for the app title in the header bar.
pub fn title_style(theme: Theme) -> Style {
    Style::default()
        .fg(palette(theme).accent)
        .add_modifier(Modifier::BOLD)
}

pub fn hint_style(theme: Theme) -> Style {
    Style::default().fg(palette(theme).muted)
}

pub fn panel_border_style(theme: Theme, focused: bool) -> Style {
    let palette = palette(theme);
    if focused {
        Style::default().fg(palette.accent)
    } else {
        Style::default().fg(palette.muted)
    }
}

pub fn notification_style(theme: Theme, level: NotificationLevel) -> Style {
    let palette = palette(theme);
    let color = match level {
        NotificationLevel::Success => palette.success,
        NotificationLevel::Info => palette.accent,
        NotificationLevel::Error => palette.error,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

// =============================================================================
// Forms
// =============================================================================

pub fn field_error_style(theme: Theme) -> Style {
    Style::default().fg(palette(theme).error)
}

pub fn input_text_style(theme: Theme) -> Style {
    Style::default().fg(palette(theme).text)
}

pub fn input_placeholder_style(theme: Theme) -> Style {
    Style::default()
        .fg(palette(theme).muted)
        .add_modifier(Modifier::ITALIC)
}

// =============================================================================
// Chat screen
// =============================================================================

pub fn online_users_style(theme: Theme) -> Style {
    Style::default().fg(palette(theme).success)
}

pub fn typing_style(theme: Theme) -> Style {
    Style::default()
        .fg(palette(theme).muted)
        .add_modifier(Modifier::ITALIC)
}

pub fn unseen_badge_style(theme: Theme) -> Style {
    Style::default()
        .fg(palette(theme).accent)
        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
}

/// Style for message sender name and initials.
pub fn message_sender_style(theme: Theme) -> Style {
    Style::default()
        .fg(palette(theme).accent)
        .add_modifier(Modifier::BOLD)
}

pub fn message_time_style(theme: Theme) -> Style {
    Style::default().fg(palette(theme).muted)
}

pub fn message_text_style(theme: Theme) -> Style {
    Style::default().fg(palette(theme).text)
}

pub fn own_message_style(theme: Theme) -> Style {
    Style::default().fg(palette(theme).own)
}

pub fn seen_marker_style(theme: Theme) -> Style {
    Style::default().fg(palette(theme).success)
}
