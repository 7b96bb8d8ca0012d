//! Single-line text field rendering, shared by the forms and the composer.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::domain::{shell_state::Theme, text_input_state::TextInputState};

use super::styles;

/// Prompt symbol shown before the input text.
const PROMPT_SYMBOL: &str = "> ";
const MASK_CHAR: char = '•';

pub struct TextField<'a> {
    pub title: &'a str,
    pub input: &'a TextInputState,
    pub focused: bool,
    /// Renders every character as a bullet.
    pub masked: bool,
    pub placeholder: &'a str,
}

/// Renders a bordered text field and places the cursor when focused.
pub fn render_text_field(frame: &mut Frame<'_>, area: Rect, field: &TextField<'_>, theme: Theme) {
    let available = usize::from(area.width)
        .saturating_sub(2)
        .saturating_sub(PROMPT_SYMBOL.len());
    let (line, cursor_col) = build_input_line(field, available, theme);

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .title(field.title.to_owned())
            .borders(Borders::ALL)
            .border_style(styles::panel_border_style(theme, field.focused)),
    );
    frame.render_widget(paragraph, area);

    if field.focused {
        let offset = PROMPT_SYMBOL.len() + cursor_col;
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add(u16::try_from(offset).unwrap_or(u16::MAX));
        let cursor_y = area.y.saturating_add(1);
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

/// Builds the visible line and the cursor column inside it.
fn build_input_line(
    field: &TextField<'_>,
    available: usize,
    theme: Theme,
) -> (Line<'static>, usize) {
    let prompt = Span::styled(PROMPT_SYMBOL.to_owned(), styles::hint_style(theme));

    if field.input.is_empty() {
        let placeholder = Span::styled(
            field.placeholder.to_owned(),
            styles::input_placeholder_style(theme),
        );
        return (Line::from(vec![prompt, placeholder]), 0);
    }

    let display: Vec<char> = if field.masked {
        field.input.text().chars().map(|_| MASK_CHAR).collect()
    } else {
        field.input.text().chars().collect()
    };
    let (visible, cursor_col) =
        visible_window(&display, field.input.cursor_position(), available.max(1));

    (
        Line::from(vec![
            prompt,
            Span::styled(visible, styles::input_text_style(theme)),
        ]),
        cursor_col,
    )
}

/// Scrolls long input horizontally so the cursor stays inside `available` columns.
fn visible_window(chars: &[char], cursor: usize, available: usize) -> (String, usize) {
    let cursor = cursor.min(chars.len());
    let width_of = |slice: &[char]| -> usize {
        slice.iter().map(|ch| ch.width().unwrap_or(0)).sum()
    };

    let mut start = 0;
    while start < cursor && width_of(&chars[start..cursor]) >= available {
        start += 1;
    }

    let mut visible = String::new();
    let mut used = 0;
    for ch in &chars[start..] {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > available {
            break;
        }
        visible.push(*ch);
        used += ch_width;
    }

    (visible, width_of(&chars[start..cursor]))
}
