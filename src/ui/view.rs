use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::{
    auth_form::{LoginField, LoginForm, RegisterField, RegisterForm},
    avatar::initials,
    room_select_state::RoomSelectState,
    room_session::HistoryState,
    shell_state::{ChatScreen, ConnectionStatus, Route, Screen, ShellState, Theme, Viewer, EMOJI_PALETTE},
};

use super::message_input::{render_text_field, TextField};
use super::message_rendering::{build_message_lines, build_message_list_elements};
use super::styles;

const FORM_WIDTH: u16 = 56;

/// Draws the active screen. Takes the state mutably because the chat view
/// records its rendered geometry for scrolling.
pub fn render(frame: &mut Frame<'_>, state: &mut ShellState) {
    let [header_area, body_area, toast_area, hint_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let theme = state.theme();
    frame.render_widget(Paragraph::new(header_line(state)), header_area);
    frame.render_widget(Paragraph::new(toast_line(state)), toast_area);
    frame.render_widget(
        Paragraph::new(Span::styled(
            hint_text(&state.screen().route()),
            styles::hint_style(theme),
        )),
        hint_area,
    );

    let viewer = state.viewer().cloned();
    match state.screen_mut() {
        Screen::Login(form) => render_login(frame, body_area, form, theme),
        Screen::Register(form) => render_register(frame, body_area, form, theme),
        Screen::SelectRoom(select) => {
            render_select_room(frame, body_area, select, viewer.as_ref(), theme)
        }
        Screen::Chat(chat) => render_chat(frame, body_area, chat, viewer.as_ref(), theme),
    }
}

fn header_line(state: &ShellState) -> Line<'static> {
    let theme = state.theme();
    let who = match state.viewer() {
        Some(viewer) => format!("signed in as {}", viewer.username),
        None => "not signed in".to_owned(),
    };

    Line::from(vec![
        Span::styled("roomchat".to_owned(), styles::title_style(theme)),
        Span::styled(
            format!(" | {} | theme: {}", who, theme_label(theme)),
            styles::hint_style(theme),
        ),
    ])
}

fn theme_label(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    }
}

fn toast_line(state: &ShellState) -> Line<'static> {
    match state.notifications().latest() {
        Some(toast) => Line::from(Span::styled(
            toast.text.clone(),
            styles::notification_style(state.theme(), toast.level),
        )),
        None => Line::default(),
    }
}

fn hint_text(route: &Route) -> &'static str {
    match route {
        Route::Login => "Enter: sign in | Tab: next field | Ctrl+R: register | Ctrl+T: theme | Ctrl+C: quit",
        Route::Register => {
            "Enter: register | Tab: next field | Ctrl+L: back to login | Ctrl+T: theme | Ctrl+C: quit"
        }
        Route::SelectRoom => "Enter: join room | Ctrl+O: open avatar | Ctrl+X: logout | Ctrl+C: quit",
        Route::Chat(_) => {
            "Enter: send | Up/Down/PgUp/PgDn: scroll | End: latest | Ctrl+E: emoji | Ctrl+V: paste | Esc: leave | Ctrl+X: logout"
        }
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [_, row, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, cell, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .areas(row);
    cell
}

fn field_error(frame: &mut Frame<'_>, area: Rect, error: Option<&str>, theme: Theme) {
    if let Some(error) = error {
        frame.render_widget(
            Paragraph::new(Span::styled(error.to_owned(), styles::field_error_style(theme))),
            area,
        );
    }
}

fn render_login(frame: &mut Frame<'_>, area: Rect, form: &LoginForm, theme: Theme) {
    let area = centered(area, FORM_WIDTH, 11);
    let [title_area, username_area, username_error, password_area, password_error, status_area] =
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

    frame.render_widget(
        Paragraph::new(Span::styled("Sign in".to_owned(), styles::title_style(theme)))
            .alignment(Alignment::Center),
        title_area,
    );

    render_text_field(
        frame,
        username_area,
        &TextField {
            title: "Username",
            input: &form.username,
            focused: form.focus() == LoginField::Username,
            masked: false,
            placeholder: "your username",
        },
        theme,
    );
    field_error(frame, username_error, form.errors().username.as_deref(), theme);

    render_text_field(
        frame,
        password_area,
        &TextField {
            title: "Password",
            input: &form.password,
            focused: form.focus() == LoginField::Password,
            masked: true,
            placeholder: "your password",
        },
        theme,
    );
    field_error(frame, password_error, form.errors().password.as_deref(), theme);

    if form.is_pending() {
        frame.render_widget(
            Paragraph::new(Span::styled("Signing in...".to_owned(), styles::hint_style(theme))),
            status_area,
        );
    }
}

fn render_register(frame: &mut Frame<'_>, area: Rect, form: &RegisterForm, theme: Theme) {
    let area = centered(area, FORM_WIDTH, 15);
    let [title_area, username_area, username_error, password_area, password_error, avatar_area, avatar_note, status_area] =
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

    frame.render_widget(
        Paragraph::new(Span::styled(
            "Create an account".to_owned(),
            styles::title_style(theme),
        ))
        .alignment(Alignment::Center),
        title_area,
    );

    render_text_field(
        frame,
        username_area,
        &TextField {
            title: "Username",
            input: &form.username,
            focused: form.focus() == RegisterField::Username,
            masked: false,
            placeholder: "pick a username",
        },
        theme,
    );
    field_error(frame, username_error, form.errors().username.as_deref(), theme);

    render_text_field(
        frame,
        password_area,
        &TextField {
            title: "Password",
            input: &form.password,
            focused: form.focus() == RegisterField::Password,
            masked: true,
            placeholder: "at least 6 characters",
        },
        theme,
    );
    field_error(frame, password_error, form.errors().password.as_deref(), theme);

    render_text_field(
        frame,
        avatar_area,
        &TextField {
            title: "Avatar file (optional)",
            input: &form.avatar_path,
            focused: form.focus() == RegisterField::Avatar,
            masked: false,
            placeholder: "path to an image",
        },
        theme,
    );
    if form.errors().avatar.is_some() {
        field_error(frame, avatar_note, form.errors().avatar.as_deref(), theme);
    } else if let Some(preview) = form.preview() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("{} ({} bytes)", preview.file_name, preview.size_bytes),
                styles::online_users_style(theme),
            )),
            avatar_note,
        );
    }

    if form.is_pending() {
        frame.render_widget(
            Paragraph::new(Span::styled("Registering...".to_owned(), styles::hint_style(theme))),
            status_area,
        );
    }
}

fn render_select_room(
    frame: &mut Frame<'_>,
    area: Rect,
    select: &RoomSelectState,
    viewer: Option<&Viewer>,
    theme: Theme,
) {
    let area = centered(area, FORM_WIDTH, 7);
    let [welcome_area, avatar_area, _, room_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(3),
    ])
    .areas(area);

    let (welcome, avatar) = match viewer {
        Some(viewer) => (
            format!("Welcome, {}", viewer.username),
            format!("[{}] {}", initials(&viewer.username), viewer.avatar_url),
        ),
        None => ("Welcome".to_owned(), String::new()),
    };

    frame.render_widget(
        Paragraph::new(Span::styled(welcome, styles::title_style(theme))),
        welcome_area,
    );
    frame.render_widget(
        Paragraph::new(Span::styled(avatar, styles::hint_style(theme))),
        avatar_area,
    );

    render_text_field(
        frame,
        room_area,
        &TextField {
            title: "Room",
            input: &select.room_input,
            focused: true,
            masked: false,
            placeholder: "room name, e.g. general",
        },
        theme,
    );
}

fn render_chat(
    frame: &mut Frame<'_>,
    area: Rect,
    chat: &mut ChatScreen,
    viewer: Option<&Viewer>,
    theme: Theme,
) {
    let palette_height = u16::from(chat.emoji_palette_open);
    let [title_area, online_area, messages_area, status_area, palette_area, composer_area] =
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(palette_height),
            Constraint::Length(3),
        ])
        .areas(area);

    frame.render_widget(Paragraph::new(chat_title_line(chat, theme)), title_area);
    frame.render_widget(Paragraph::new(online_users_line(chat, theme)), online_area);

    let local_username = viewer.map(|viewer| viewer.username.as_str()).unwrap_or_default();
    render_messages_panel(frame, messages_area, chat, local_username, theme);
    frame.render_widget(Paragraph::new(chat_status_line(chat, local_username, theme)), status_area);

    if chat.emoji_palette_open {
        frame.render_widget(
            Paragraph::new(Span::styled(emoji_palette_text(), styles::hint_style(theme))),
            palette_area,
        );
    }

    render_text_field(
        frame,
        composer_area,
        &TextField {
            title: "Message",
            input: &chat.composer,
            focused: true,
            masked: false,
            placeholder: "Type a message...",
        },
        theme,
    );
}

fn render_messages_panel(
    frame: &mut Frame<'_>,
    area: Rect,
    chat: &mut ChatScreen,
    local_username: &str,
    theme: Theme,
) {
    let block = Block::default()
        .title("Messages")
        .borders(Borders::ALL)
        .border_style(styles::panel_border_style(theme, true));
    let inner = block.inner(area);

    let placeholder = match chat.session.history_state() {
        HistoryState::Loading => Some("Loading messages..."),
        HistoryState::Error => Some("Failed to load messages"),
        HistoryState::Ready if chat.session.messages().is_empty() => {
            Some("No messages yet. Say hi!")
        }
        HistoryState::Ready => None,
    };

    if let Some(text) = placeholder {
        let panel = Paragraph::new(Span::styled(text.to_owned(), styles::hint_style(theme)))
            .block(block);
        frame.render_widget(panel, area);
        return;
    }

    let elements = build_message_list_elements(chat.session.messages(), local_username);
    let lines = build_message_lines(&elements, usize::from(inner.width), theme);

    chat.session.set_viewport(lines.len(), usize::from(inner.height));
    let top = u16::try_from(chat.session.top_row()).unwrap_or(u16::MAX);

    frame.render_widget(Paragraph::new(lines).block(block).scroll((top, 0)), area);
}

fn chat_title_line(chat: &ChatScreen, theme: Theme) -> Line<'static> {
    let count = chat.session.online_count();
    let noun = if count == 1 { "user" } else { "users" };
    let connection = match chat.connection {
        ConnectionStatus::Connecting => "connecting...",
        ConnectionStatus::Connected => "connected",
        ConnectionStatus::Disconnected => "disconnected",
    };

    Line::from(vec![
        Span::styled(
            format!("# {}", chat.session.room_name()),
            styles::title_style(theme),
        ),
        Span::styled(
            format!("  {} {} online  ({})", count, noun, connection),
            styles::hint_style(theme),
        ),
    ])
}

fn online_users_line(chat: &ChatScreen, theme: Theme) -> Line<'static> {
    let users: Vec<&str> = chat.session.online_users().collect();
    if users.is_empty() {
        return Line::default();
    }

    Line::from(Span::styled(
        format!("Online: {}", users.join(", ")),
        styles::online_users_style(theme),
    ))
}

/// Typing indicator on the left, unseen counter on the right.
fn chat_status_line(chat: &ChatScreen, local_username: &str, theme: Theme) -> Line<'static> {
    let mut spans = Vec::new();

    if let Some(user) = chat.session.visible_typing_user(local_username) {
        spans.push(Span::styled(
            format!("{} is typing...", user),
            styles::typing_style(theme),
        ));
    }

    let unseen = chat.session.unseen_count();
    if unseen > 0 {
        if !spans.is_empty() {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            format!(" ↓ {} new (End) ", unseen),
            styles::unseen_badge_style(theme),
        ));
    }

    Line::from(spans)
}

fn emoji_palette_text() -> String {
    let entries: Vec<String> = EMOJI_PALETTE
        .iter()
        .enumerate()
        .map(|(index, emoji)| format!("{} {}", (index + 1) % 10, emoji))
        .collect();
    format!("{}   Esc: close", entries.join("  "))
}
