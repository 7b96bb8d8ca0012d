use anyhow::Result;

use crate::{
    domain::{
        api::{ApiError, LoginSuccess},
        auth_form::{LoginForm, RegisterForm},
        avatar::AvatarResolver,
        events::{AppEvent, KeyInput, ScrollDirection},
        identity::Identity,
        message::Message,
        realtime::{RealtimeEvent, VisitId},
        room_select_state::RoomSelectState,
        shell_state::{ChatScreen, Route, Screen, ShellState, Viewer, EMOJI_PALETTE},
        text_input_state::TextInputState,
    },
    infra::{
        contracts::{ClipboardReader, ExternalOpener},
        session_store::SessionStore,
    },
    usecases::chat_session::ChatSessionController,
};

use super::contracts::{BackendGateway, ShellOrchestrator};

const NAVIGATION_REDIRECTED: &str = "NAVIGATION_REDIRECTED";
const STALE_RESULT_DROPPED: &str = "STALE_RESULT_DROPPED";

const LINE_SCROLL_ROWS: usize = 1;
const WHEEL_SCROLL_ROWS: usize = 3;
const PAGE_SCROLL_ROWS: usize = 10;

/// Collaborators the shell drives on behalf of the screens.
pub struct ShellServices<G, O, C> {
    pub gateway: G,
    pub session: SessionStore,
    pub avatars: AvatarResolver,
    pub opener: O,
    pub clipboard: C,
}

pub struct DefaultShellOrchestrator<G, O, C>
where
    G: BackendGateway,
    O: ExternalOpener,
    C: ClipboardReader,
{
    state: ShellState,
    services: ShellServices<G, O, C>,
    chat: Option<ChatSessionController>,
    last_visit: VisitId,
}

/// What a key on the chat screen asks the shell to do beyond the screen.
enum ChatKeyOutcome {
    Handled,
    Leave,
}

impl<G, O, C> DefaultShellOrchestrator<G, O, C>
where
    G: BackendGateway,
    O: ExternalOpener,
    C: ClipboardReader,
{
    /// Starts on room selection when a persisted session exists, otherwise on
    /// the login screen.
    pub fn new(services: ShellServices<G, O, C>, state: ShellState) -> Self {
        let mut orchestrator = Self {
            state,
            services,
            chat: None,
            last_visit: VisitId(0),
        };

        orchestrator.refresh_viewer();
        let initial = if orchestrator.services.session.is_authenticated() {
            Route::SelectRoom
        } else {
            Route::Login
        };
        orchestrator.navigate(initial);
        orchestrator
    }

    fn navigate(&mut self, route: Route) {
        let route = if route.is_protected() && !self.services.session.is_authenticated() {
            tracing::info!(
                code = NAVIGATION_REDIRECTED,
                requested = ?route,
                "protected screen requires a signed-in user"
            );
            Route::Login
        } else {
            route
        };

        if let Some(mut controller) = self.chat.take() {
            controller.close();
        }

        let screen = match route {
            Route::Login => Screen::Login(LoginForm::default()),
            Route::Register => Screen::Register(RegisterForm::default()),
            Route::SelectRoom => Screen::SelectRoom(RoomSelectState::default()),
            Route::Chat(room) => {
                self.last_visit = self.last_visit.next();
                let mut chat = ChatScreen::new(&room);
                self.chat = Some(ChatSessionController::enter(
                    &self.services.gateway,
                    self.last_visit,
                    &mut chat,
                    self.state.notifications_mut(),
                ));
                Screen::Chat(Box::new(chat))
            }
        };

        tracing::debug!(route = ?screen.route(), "navigated");
        self.state.set_screen(screen);
    }

    fn refresh_viewer(&mut self) {
        let viewer = self.services.session.current_user().map(|user| {
            let avatar_url = self
                .services
                .avatars
                .resolve(&user.username, user.avatar_ref.as_deref());
            Viewer {
                username: user.username,
                avatar_ref: user.avatar_ref,
                avatar_url,
            }
        });
        self.state.set_viewer(viewer);
    }

    fn logout(&mut self) {
        if let Some(mut controller) = self.chat.take() {
            controller.close();
        }

        if let Err(error) = self.services.session.logout() {
            tracing::warn!(error = %error, "failed to clear persisted session");
            self.state
                .notifications_mut()
                .error("Signed out, but the saved session could not be removed");
        }

        self.state.set_viewer(None);
        self.navigate(Route::Login);
    }

    fn leave_room(&mut self) {
        if let Some(controller) = self.chat.take() {
            controller.leave();
        }
        self.navigate(Route::SelectRoom);
    }

    fn quit(&mut self) {
        if let Some(mut controller) = self.chat.take() {
            controller.close();
        }
        self.state.stop();
    }

    fn handle_key(&mut self, key: KeyInput) {
        if key.is_ctrl("t") {
            self.state.toggle_theme();
            return;
        }

        if key.is_ctrl("x") && self.state.screen().route().is_protected() {
            self.logout();
            return;
        }

        match self.state.screen().route() {
            Route::Login => self.handle_login_key(&key),
            Route::Register => self.handle_register_key(&key),
            Route::SelectRoom => self.handle_select_room_key(&key),
            Route::Chat(_) => {
                if let ChatKeyOutcome::Leave = self.handle_chat_key(&key) {
                    self.leave_room();
                }
            }
        }
    }

    fn handle_login_key(&mut self, key: &KeyInput) {
        if key.is_ctrl("r") {
            self.navigate(Route::Register);
            return;
        }

        let Screen::Login(form) = self.state.screen_mut() else {
            return;
        };

        match key.key.as_str() {
            "tab" | "up" | "down" if !key.ctrl => form.focus_next(),
            "enter" if !key.ctrl => {
                if form.is_pending() {
                    return;
                }
                if let Some(credentials) = form.validate() {
                    form.set_pending(true);
                    self.services.gateway.request_login(credentials);
                }
            }
            _ => {
                edit_input(form.focused_input_mut(), key);
            }
        }
    }

    fn handle_register_key(&mut self, key: &KeyInput) {
        if key.is_ctrl("l") {
            self.navigate(Route::Login);
            return;
        }

        let Screen::Register(form) = self.state.screen_mut() else {
            return;
        };

        match key.key.as_str() {
            "tab" | "up" | "down" if !key.ctrl => form.focus_next(),
            "enter" if !key.ctrl => {
                if form.is_pending() {
                    return;
                }
                if let Some(registration) = form.validate() {
                    form.set_pending(true);
                    self.services.gateway.request_register(registration);
                }
            }
            _ => {
                if edit_input(form.focused_input_mut(), key) {
                    form.refresh_preview();
                }
            }
        }
    }

    fn handle_select_room_key(&mut self, key: &KeyInput) {
        if key.is_ctrl("o") {
            self.open_avatar();
            return;
        }

        let Screen::SelectRoom(select) = self.state.screen_mut() else {
            return;
        };

        if key.is("enter") {
            if let Some(room) = select.room_to_join() {
                self.navigate(Route::Chat(room));
            }
            return;
        }

        edit_input(&mut select.room_input, key);
    }

    fn open_avatar(&mut self) {
        let Some(url) = self.state.viewer().map(|viewer| viewer.avatar_url.clone()) else {
            return;
        };

        if let Err(error) = self.services.opener.open(&url) {
            tracing::warn!(error = %error, "failed to open avatar url");
            self.state.notifications_mut().error("Could not open avatar");
        }
    }

    fn handle_chat_key(&mut self, key: &KeyInput) -> ChatKeyOutcome {
        let Some(viewer) = self.state.viewer().cloned() else {
            return ChatKeyOutcome::Handled;
        };
        let Some(controller) = self.chat.as_mut() else {
            return ChatKeyOutcome::Handled;
        };
        let Some((screen, notifications)) = self.state.chat_parts_mut() else {
            return ChatKeyOutcome::Handled;
        };

        if screen.emoji_palette_open {
            screen.emoji_palette_open = false;
            if let Some(emoji) = key.as_char().and_then(palette_emoji) {
                if screen.composer.insert_str(emoji) {
                    controller.input_changed(screen);
                }
                return ChatKeyOutcome::Handled;
            }
            if key.is("esc") || key.is_ctrl("e") {
                return ChatKeyOutcome::Handled;
            }
        }

        if key.is_ctrl("e") {
            screen.emoji_palette_open = true;
            return ChatKeyOutcome::Handled;
        }

        if key.is_ctrl("v") {
            match self.services.clipboard.read_text() {
                Ok(text) => {
                    if screen.composer.insert_str(&text) {
                        controller.input_changed(screen);
                    }
                }
                Err(error) => {
                    tracing::debug!(error = %error, "paste skipped");
                    notifications.error("Clipboard has no text");
                }
            }
            return ChatKeyOutcome::Handled;
        }

        match key.key.as_str() {
            "esc" if !key.ctrl => return ChatKeyOutcome::Leave,
            "enter" if !key.ctrl => controller.submit(screen, notifications, &viewer),
            "end" if !key.ctrl => controller.scroll_to_bottom(screen),
            "pageup" => controller.scroll_up(screen, PAGE_SCROLL_ROWS),
            "pagedown" => controller.scroll_down(screen, PAGE_SCROLL_ROWS),
            "up" => controller.scroll_up(screen, LINE_SCROLL_ROWS),
            "down" => controller.scroll_down(screen, LINE_SCROLL_ROWS),
            _ => {
                if edit_input(&mut screen.composer, key) {
                    controller.input_changed(screen);
                }
            }
        }

        ChatKeyOutcome::Handled
    }

    fn handle_mouse_scroll(&mut self, direction: ScrollDirection) {
        let Some(controller) = self.chat.as_mut() else {
            return;
        };
        let Some(screen) = self.state.chat_mut() else {
            return;
        };

        match direction {
            ScrollDirection::Up => controller.scroll_up(screen, WHEEL_SCROLL_ROWS),
            ScrollDirection::Down => controller.scroll_down(screen, WHEEL_SCROLL_ROWS),
        }
    }

    fn handle_tick(&mut self) {
        self.state.notifications_mut().tick();
        if let Some(chat) = self.state.chat_mut() {
            chat.session.tick();
        }
    }

    fn handle_login_finished(&mut self, result: Result<LoginSuccess, ApiError>) {
        let Screen::Login(form) = self.state.screen_mut() else {
            tracing::debug!(code = STALE_RESULT_DROPPED, "login result arrived after leaving the screen");
            return;
        };
        form.set_pending(false);

        let success = match result {
            Ok(success) => success,
            Err(error) => {
                tracing::warn!(error = %error, "login failed");
                self.state.notifications_mut().error("Login failed!");
                return;
            }
        };

        let identity = Identity::new(success.username, success.avatar_ref, success.token);
        if let Err(error) = self.services.session.login(identity) {
            tracing::warn!(error = %error, "failed to store session after login");
            self.state.notifications_mut().error("Login failed!");
            return;
        }

        self.refresh_viewer();
        self.state.notifications_mut().success("Login successful!");
        self.navigate(Route::SelectRoom);
    }

    fn handle_register_finished(&mut self, result: Result<(), ApiError>) {
        let Screen::Register(form) = self.state.screen_mut() else {
            tracing::debug!(code = STALE_RESULT_DROPPED, "registration result arrived after leaving the screen");
            return;
        };
        form.set_pending(false);

        match result {
            Ok(()) => {
                self.state.notifications_mut().success("Registered!");
                self.navigate(Route::Login);
            }
            Err(error) => {
                tracing::warn!(error = %error, "registration failed");
                let text = error
                    .server_message()
                    .map(str::to_owned)
                    .unwrap_or_else(|| "Registration failed".to_owned());
                self.state.notifications_mut().error(text);
            }
        }
    }

    fn handle_history_loaded(&mut self, visit: VisitId, result: Result<Vec<Message>, ApiError>) {
        let Some(controller) = current_visit(&mut self.chat, visit) else {
            return;
        };
        let Some((screen, notifications)) = self.state.chat_parts_mut() else {
            return;
        };

        controller.handle_history(screen, notifications, result);
    }

    fn handle_realtime(&mut self, visit: VisitId, event: RealtimeEvent) {
        let Some(viewer) = self.state.viewer().cloned() else {
            return;
        };
        let Some(controller) = current_visit(&mut self.chat, visit) else {
            return;
        };
        let Some((screen, notifications)) = self.state.chat_parts_mut() else {
            return;
        };

        controller.handle_realtime(screen, notifications, &viewer, event);
    }
}

impl<G, O, C> ShellOrchestrator for DefaultShellOrchestrator<G, O, C>
where
    G: BackendGateway,
    O: ExternalOpener,
    C: ClipboardReader,
{
    fn state(&self) -> &ShellState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ShellState {
        &mut self.state
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Tick => self.handle_tick(),
            AppEvent::QuitRequested => self.quit(),
            AppEvent::InputKey(key) => self.handle_key(key),
            AppEvent::MouseScroll(direction) => self.handle_mouse_scroll(direction),
            AppEvent::LoginFinished(result) => self.handle_login_finished(result),
            AppEvent::RegisterFinished(result) => self.handle_register_finished(result),
            AppEvent::HistoryLoaded { visit, result } => self.handle_history_loaded(visit, result),
            AppEvent::Realtime { visit, event } => self.handle_realtime(visit, event),
        }

        Ok(())
    }
}

/// The controller of `visit`, unless that visit has already ended.
fn current_visit(
    chat: &mut Option<ChatSessionController>,
    visit: VisitId,
) -> Option<&mut ChatSessionController> {
    match chat.as_mut() {
        Some(controller) if controller.visit() == visit => Some(controller),
        _ => {
            tracing::debug!(code = STALE_RESULT_DROPPED, %visit, "event for a finished room visit");
            None
        }
    }
}

/// Applies a text-editing key to an input. Returns whether the text changed.
fn edit_input(input: &mut TextInputState, key: &KeyInput) -> bool {
    if let Some(ch) = key.as_char() {
        return input.insert_char(ch);
    }
    if key.ctrl {
        return false;
    }

    match key.key.as_str() {
        "backspace" => input.delete_char_before(),
        "delete" => input.delete_char_at(),
        "left" => {
            input.move_cursor_left();
            false
        }
        "right" => {
            input.move_cursor_right();
            false
        }
        "home" => {
            input.move_cursor_home();
            false
        }
        "end" => {
            input.move_cursor_end();
            false
        }
        _ => false,
    }
}

/// Digits pick from the palette: `1`..`9` then `0` for the tenth.
fn palette_emoji(digit: char) -> Option<&'static str> {
    let index = match digit.to_digit(10)? {
        0 => 9,
        n => n as usize - 1,
    };
    EMOJI_PALETTE.get(index).copied()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{
        domain::{
            auth_form::Credentials,
            realtime::{InboundEvent, OutboundEvent},
            room_session::ScrollAnchor,
            shell_state::Theme,
        },
        infra::stubs::{MemorySessionPersistence, NoopOpener, StubClipboard},
        test_support::RecordingGateway,
    };

    type TestOrchestrator = DefaultShellOrchestrator<RecordingGateway, NoopOpener, StubClipboard>;

    fn orchestrator_with(persistence: MemorySessionPersistence) -> TestOrchestrator {
        let session = SessionStore::open(Arc::new(persistence)).expect("store should open");
        DefaultShellOrchestrator::new(
            ShellServices {
                gateway: RecordingGateway::default(),
                session,
                avatars: AvatarResolver::new(
                    "http://localhost:3000",
                    "/uploads/avatars",
                    "https://ui-avatars.com/api/",
                ),
                opener: NoopOpener::default(),
                clipboard: StubClipboard::default(),
            },
            ShellState::default(),
        )
    }

    fn signed_out() -> TestOrchestrator {
        orchestrator_with(MemorySessionPersistence::default())
    }

    fn signed_in() -> TestOrchestrator {
        orchestrator_with(MemorySessionPersistence::with(Identity::new(
            "alice",
            Some("alice.png".to_owned()),
            "jwt-alice",
        )))
    }

    fn press(orchestrator: &mut TestOrchestrator, key: &str) {
        orchestrator
            .handle_event(AppEvent::InputKey(KeyInput::new(key, false)))
            .expect("key must be handled");
    }

    fn press_ctrl(orchestrator: &mut TestOrchestrator, key: &str) {
        orchestrator
            .handle_event(AppEvent::InputKey(KeyInput::new(key, true)))
            .expect("key must be handled");
    }

    fn type_text(orchestrator: &mut TestOrchestrator, text: &str) {
        for ch in text.chars() {
            press(orchestrator, &ch.to_string());
        }
    }

    fn join(orchestrator: &mut TestOrchestrator, room: &str) -> VisitId {
        type_text(orchestrator, room);
        press(orchestrator, "enter");
        orchestrator.services.gateway.last_visit()
    }

    fn message(id: &str, sender: &str) -> Message {
        Message {
            id: id.to_owned(),
            content: format!("message {id}"),
            sender: sender.to_owned(),
            created_at: Utc
                .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
            seen: None,
            avatar_ref: None,
        }
    }

    fn latest_toast(orchestrator: &TestOrchestrator) -> Option<String> {
        orchestrator
            .state()
            .notifications()
            .latest()
            .map(|toast| toast.text.clone())
    }

    #[test]
    fn starts_on_login_without_session() {
        let orchestrator = signed_out();

        assert_eq!(orchestrator.state().screen().route(), Route::Login);
        assert!(orchestrator.state().viewer().is_none());
    }

    #[test]
    fn restored_session_starts_on_room_selection() {
        let orchestrator = signed_in();

        assert_eq!(orchestrator.state().screen().route(), Route::SelectRoom);
        assert_eq!(
            orchestrator.state().viewer().map(|v| v.avatar_url.as_str()),
            Some("http://localhost:3000/uploads/avatars/alice.png")
        );
    }

    #[test]
    fn protected_routes_redirect_to_login_without_token() {
        let mut orchestrator = signed_out();

        orchestrator.navigate(Route::Chat("general".to_owned()));

        assert_eq!(orchestrator.state().screen().route(), Route::Login);
        assert!(orchestrator.services.gateway.channels.borrow().is_empty());
    }

    #[test]
    fn login_submits_credentials_then_stores_token_and_navigates() {
        let mut orchestrator = signed_out();

        type_text(&mut orchestrator, "alice");
        press(&mut orchestrator, "tab");
        type_text(&mut orchestrator, "secret1");
        press(&mut orchestrator, "enter");

        assert_eq!(
            *orchestrator.services.gateway.logins.borrow(),
            vec![Credentials {
                username: "alice".to_owned(),
                password: "secret1".to_owned(),
            }]
        );

        orchestrator
            .handle_event(AppEvent::LoginFinished(Ok(LoginSuccess {
                token: "jwt-alice".to_owned(),
                username: "alice".to_owned(),
                avatar_ref: None,
            })))
            .expect("login result must be handled");

        assert_eq!(
            orchestrator.services.session.token().as_deref(),
            Some("jwt-alice")
        );
        assert_eq!(orchestrator.state().screen().route(), Route::SelectRoom);
        assert_eq!(latest_toast(&orchestrator).as_deref(), Some("Login successful!"));
    }

    #[test]
    fn login_with_blank_fields_shows_inline_errors_without_request() {
        let mut orchestrator = signed_out();

        press(&mut orchestrator, "enter");

        assert!(orchestrator.services.gateway.logins.borrow().is_empty());
        match orchestrator.state().screen() {
            Screen::Login(form) => {
                assert!(form.errors().username.is_some());
                assert!(form.errors().password.is_some());
            }
            other => panic!("unexpected screen: {other:?}"),
        }
    }

    #[test]
    fn failed_login_notifies_and_stays() {
        let mut orchestrator = signed_out();

        orchestrator
            .handle_event(AppEvent::LoginFinished(Err(ApiError::Unauthorized)))
            .expect("login result must be handled");

        assert_eq!(orchestrator.state().screen().route(), Route::Login);
        assert_eq!(latest_toast(&orchestrator).as_deref(), Some("Login failed!"));
        assert!(!orchestrator.services.session.is_authenticated());
    }

    #[test]
    fn registration_success_returns_to_login() {
        let mut orchestrator = signed_out();
        press_ctrl(&mut orchestrator, "r");
        type_text(&mut orchestrator, "bob");
        press(&mut orchestrator, "tab");
        type_text(&mut orchestrator, "secret1");
        press(&mut orchestrator, "enter");
        assert_eq!(orchestrator.services.gateway.registrations.borrow().len(), 1);

        orchestrator
            .handle_event(AppEvent::RegisterFinished(Ok(())))
            .expect("register result must be handled");

        assert_eq!(orchestrator.state().screen().route(), Route::Login);
        assert_eq!(latest_toast(&orchestrator).as_deref(), Some("Registered!"));
    }

    #[test]
    fn registration_failure_surfaces_server_message() {
        let mut orchestrator = signed_out();
        press_ctrl(&mut orchestrator, "r");

        orchestrator
            .handle_event(AppEvent::RegisterFinished(Err(ApiError::Rejected {
                status: 409,
                message: Some("Username already exists".to_owned()),
            })))
            .expect("register result must be handled");

        assert_eq!(orchestrator.state().screen().route(), Route::Register);
        assert_eq!(
            latest_toast(&orchestrator).as_deref(),
            Some("Username already exists")
        );
    }

    #[test]
    fn joining_a_room_fetches_history_once_and_opens_one_channel() {
        let mut orchestrator = signed_in();

        let visit = join(&mut orchestrator, "general");

        let gateway = &orchestrator.services.gateway;
        assert_eq!(
            *gateway.history_requests.borrow(),
            vec![(visit, "general".to_owned())]
        );
        assert_eq!(gateway.channels.borrow().len(), 1);
        assert_eq!(
            orchestrator.state().screen().route(),
            Route::Chat("general".to_owned())
        );
    }

    #[test]
    fn history_renders_in_order_at_bottom_without_animation() {
        let mut orchestrator = signed_in();
        let visit = join(&mut orchestrator, "general");

        orchestrator
            .handle_event(AppEvent::HistoryLoaded {
                visit,
                result: Ok(vec![
                    message("1", "bob"),
                    message("2", "alice"),
                    message("3", "carol"),
                ]),
            })
            .expect("history must be handled");

        let chat = orchestrator.state().chat().expect("chat screen should be open");
        let ids: Vec<&str> = chat.session.messages().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(chat.session.anchor(), ScrollAnchor::AtBottom);
        assert!(!chat.session.is_animating());
        assert_eq!(chat.session.unseen_count(), 0);
    }

    #[test]
    fn leaving_emits_leave_and_ignores_later_events_of_the_visit() {
        let mut orchestrator = signed_in();
        let visit = join(&mut orchestrator, "general");
        let channel = orchestrator.services.gateway.last_channel();

        press(&mut orchestrator, "esc");

        assert_eq!(orchestrator.state().screen().route(), Route::SelectRoom);
        assert_eq!(channel.emitted_names(), vec!["leave"]);
        assert!(channel.is_closed());

        let second = join(&mut orchestrator, "general");
        assert_ne!(second, visit);
        orchestrator
            .handle_event(AppEvent::HistoryLoaded {
                visit,
                result: Ok(vec![message("stale", "bob")]),
            })
            .expect("stale history must be handled");
        orchestrator
            .handle_event(AppEvent::Realtime {
                visit,
                event: RealtimeEvent::Inbound(InboundEvent::Message(message("late", "bob"))),
            })
            .expect("stale event must be handled");

        let chat = orchestrator.state().chat().expect("chat screen should be open");
        assert!(chat.session.messages().is_empty());
    }

    #[test]
    fn typing_in_composer_emits_typing_state() {
        let mut orchestrator = signed_in();
        join(&mut orchestrator, "general");
        let channel = orchestrator.services.gateway.last_channel();

        press(&mut orchestrator, "h");
        press(&mut orchestrator, "backspace");

        assert_eq!(
            channel.emitted(),
            vec![
                OutboundEvent::Typing {
                    room: "general".to_owned(),
                    typing: true,
                },
                OutboundEvent::Typing {
                    room: "general".to_owned(),
                    typing: false,
                },
            ]
        );
    }

    #[test]
    fn enter_sends_composer_with_local_avatar() {
        let mut orchestrator = signed_in();
        let visit = join(&mut orchestrator, "general");
        let channel = orchestrator.services.gateway.last_channel();
        orchestrator
            .handle_event(AppEvent::Realtime {
                visit,
                event: RealtimeEvent::Connected,
            })
            .expect("connect must be handled");
        type_text(&mut orchestrator, "hi");

        press(&mut orchestrator, "enter");

        let emitted = channel.emitted();
        assert!(emitted.contains(&OutboundEvent::Message {
            room: "general".to_owned(),
            content: "hi".to_owned(),
            avatar: Some("alice.png".to_owned()),
        }));
        assert_eq!(
            emitted.last(),
            Some(&OutboundEvent::Typing {
                room: "general".to_owned(),
                typing: false,
            })
        );
        let chat = orchestrator.state().chat().expect("chat screen should be open");
        assert!(chat.composer.is_empty());
    }

    #[test]
    fn scrolled_up_messages_count_and_end_key_scrolls_back() {
        let mut orchestrator = signed_in();
        let visit = join(&mut orchestrator, "general");
        let channel = orchestrator.services.gateway.last_channel();
        orchestrator
            .state_mut()
            .chat_mut()
            .expect("chat screen should be open")
            .session
            .set_viewport(100, 10);
        orchestrator
            .handle_event(AppEvent::MouseScroll(ScrollDirection::Up))
            .expect("scroll must be handled");

        for id in ["a", "b", "c", "d"] {
            orchestrator
                .handle_event(AppEvent::Realtime {
                    visit,
                    event: RealtimeEvent::Inbound(InboundEvent::Message(message(id, "bob"))),
                })
                .expect("message must be handled");
        }
        assert_eq!(
            orchestrator.state().chat().map(|c| c.session.unseen_count()),
            Some(4)
        );

        press(&mut orchestrator, "end");

        let chat = orchestrator.state().chat().expect("chat screen should be open");
        assert_eq!(chat.session.unseen_count(), 0);
        assert!(chat.session.is_animating());
        assert_eq!(channel.emitted_names(), vec!["seen"]);

        for _ in 0..10 {
            orchestrator
                .handle_event(AppEvent::Tick)
                .expect("tick must be handled");
        }
        assert!(!orchestrator
            .state()
            .chat()
            .expect("chat screen should be open")
            .session
            .is_animating());
    }

    #[test]
    fn emoji_palette_inserts_selected_emoji() {
        let mut orchestrator = signed_in();
        join(&mut orchestrator, "general");
        let channel = orchestrator.services.gateway.last_channel();

        press_ctrl(&mut orchestrator, "e");
        assert!(orchestrator
            .state()
            .chat()
            .is_some_and(|chat| chat.emoji_palette_open));
        press(&mut orchestrator, "1");

        let chat = orchestrator.state().chat().expect("chat screen should be open");
        assert_eq!(chat.composer.text(), EMOJI_PALETTE[0]);
        assert!(!chat.emoji_palette_open);
        assert_eq!(channel.emitted_names(), vec!["typing"]);
    }

    #[test]
    fn paste_inserts_clipboard_text() {
        let mut orchestrator = signed_in();
        orchestrator.services.clipboard.text = Some("pasted\ntext".to_owned());
        join(&mut orchestrator, "general");

        press_ctrl(&mut orchestrator, "v");

        let chat = orchestrator.state().chat().expect("chat screen should be open");
        assert_eq!(chat.composer.text(), "pasted text");
    }

    #[test]
    fn logout_from_chat_closes_channel_and_clears_session() {
        let mut orchestrator = signed_in();
        join(&mut orchestrator, "general");
        let channel = orchestrator.services.gateway.last_channel();

        press_ctrl(&mut orchestrator, "x");

        assert!(channel.is_closed());
        assert!(!orchestrator.services.session.is_authenticated());
        assert!(orchestrator.state().viewer().is_none());
        assert_eq!(orchestrator.state().screen().route(), Route::Login);
    }

    #[test]
    fn ctrl_o_opens_own_avatar() {
        let mut orchestrator = signed_in();

        press_ctrl(&mut orchestrator, "o");

        assert_eq!(
            orchestrator.services.opener.opened(),
            vec!["http://localhost:3000/uploads/avatars/alice.png".to_owned()]
        );
    }

    #[test]
    fn ctrl_t_toggles_theme_on_any_screen() {
        let mut orchestrator = signed_out();

        press_ctrl(&mut orchestrator, "t");

        assert_eq!(orchestrator.state().theme(), Theme::Dark);
    }

    #[test]
    fn quit_closes_channel_and_stops() {
        let mut orchestrator = signed_in();
        join(&mut orchestrator, "general");
        let channel = orchestrator.services.gateway.last_channel();

        orchestrator
            .handle_event(AppEvent::QuitRequested)
            .expect("quit must be handled");

        assert!(!orchestrator.state().is_running());
        assert!(channel.is_closed());
    }
}
