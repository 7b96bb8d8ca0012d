use super::{
    auth_form::{LoginForm, RegisterForm},
    notifications::Notifications,
    room_select_state::RoomSelectState,
    room_session::RoomSession,
    text_input_state::TextInputState,
};

/// Emoji offered by the composer palette, selected with digits 1-9 and 0.
pub const EMOJI_PALETTE: [&str; 10] = [
    "😀", "😂", "😍", "👍", "🙏", "🎉", "❤️", "😢", "😮", "🔥",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("dark") {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnected,
}

/// Where the shell can navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    SelectRoom,
    Chat(String),
}

impl Route {
    /// Routes that require an authenticated session.
    pub fn is_protected(&self) -> bool {
        matches!(self, Self::SelectRoom | Self::Chat(_))
    }
}

/// Display-only view of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub username: String,
    pub avatar_ref: Option<String>,
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatScreen {
    pub session: RoomSession,
    pub composer: TextInputState,
    pub connection: ConnectionStatus,
    pub emoji_palette_open: bool,
}

impl ChatScreen {
    pub fn new(room: &str) -> Self {
        Self {
            session: RoomSession::new(room),
            composer: TextInputState::default(),
            connection: ConnectionStatus::Connecting,
            emoji_palette_open: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Login(LoginForm),
    Register(RegisterForm),
    SelectRoom(RoomSelectState),
    Chat(Box<ChatScreen>),
}

impl Screen {
    pub fn route(&self) -> Route {
        match self {
            Self::Login(_) => Route::Login,
            Self::Register(_) => Route::Register,
            Self::SelectRoom(_) => Route::SelectRoom,
            Self::Chat(chat) => Route::Chat(chat.session.room_name().to_owned()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    running: bool,
    screen: Screen,
    viewer: Option<Viewer>,
    theme: Theme,
    notifications: Notifications,
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new(Theme::default(), Notifications::default())
    }
}

impl ShellState {
    pub fn new(theme: Theme, notifications: Notifications) -> Self {
        Self {
            running: true,
            screen: Screen::Login(LoginForm::default()),
            viewer: None,
            theme,
            notifications,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    pub fn set_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub fn chat(&self) -> Option<&ChatScreen> {
        match &self.screen {
            Screen::Chat(chat) => Some(&**chat),
            _ => None,
        }
    }

    pub fn chat_mut(&mut self) -> Option<&mut ChatScreen> {
        match &mut self.screen {
            Screen::Chat(chat) => Some(&mut **chat),
            _ => None,
        }
    }

    /// The open chat together with the toast queue, borrowed side by side.
    pub fn chat_parts_mut(&mut self) -> Option<(&mut ChatScreen, &mut Notifications)> {
        match &mut self.screen {
            Screen::Chat(chat) => Some((&mut **chat, &mut self.notifications)),
            _ => None,
        }
    }

    pub fn viewer(&self) -> Option<&Viewer> {
        self.viewer.as_ref()
    }

    pub fn set_viewer(&mut self, viewer: Option<Viewer>) {
        self.viewer = viewer;
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }
}
