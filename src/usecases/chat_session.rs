//! Controller for one visit of a chat room.
//!
//! Owns the realtime channel of the visit and applies history and realtime
//! events to the chat screen. Results tagged with another visit never reach
//! it; the shell filters them by [`ChatSessionController::visit`].

use crate::{
    domain::{
        api::ApiError,
        message::Message,
        notifications::Notifications,
        realtime::{InboundEvent, OutboundEvent, RealtimeEvent, VisitId},
        room_session::{IncomingEffect, ScrollMotion, ScrollOutcome},
        shell_state::{ChatScreen, ConnectionStatus, Viewer},
    },
    usecases::{
        contracts::{BackendGateway, ChannelError, RealtimeChannel},
        load_history::{self, HISTORY_LOAD_FAILED_TEXT},
        send_message::{send_message, SendMessageCommand, SendMessageError},
    },
};

const REALTIME_EMIT_FAILED: &str = "REALTIME_EMIT_FAILED";
const NOT_CONNECTED_TEXT: &str = "Not connected yet. Your message was not sent";

pub struct ChatSessionController {
    visit: VisitId,
    room: String,
    channel: Option<Box<dyn RealtimeChannel>>,
}

impl std::fmt::Debug for ChatSessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSessionController")
            .field("visit", &self.visit)
            .field("room", &self.room)
            .field("channel_open", &self.channel.is_some())
            .finish()
    }
}

impl ChatSessionController {
    /// Requests the room history once and opens the visit's realtime channel.
    pub fn enter(
        gateway: &dyn BackendGateway,
        visit: VisitId,
        screen: &mut ChatScreen,
        notifications: &mut Notifications,
    ) -> Self {
        let room = screen.session.room_name().to_owned();
        load_history::request_history(gateway, visit, &room);

        let channel = match gateway.open_channel(visit) {
            Ok(channel) => {
                screen.connection = ConnectionStatus::Connecting;
                Some(channel)
            }
            Err(error) => {
                tracing::warn!(%visit, room = %room, error = %error, "realtime channel not opened");
                screen.connection = ConnectionStatus::Disconnected;
                notifications.error(format!("Connection failed: {error}"));
                None
            }
        };

        tracing::info!(%visit, room = %room, "entered chat room");
        Self {
            visit,
            room,
            channel,
        }
    }

    pub fn visit(&self) -> VisitId {
        self.visit
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn handle_history(
        &mut self,
        screen: &mut ChatScreen,
        notifications: &mut Notifications,
        result: Result<Vec<Message>, ApiError>,
    ) {
        if load_history::apply_history(&mut screen.session, result).is_err() {
            notifications.error(HISTORY_LOAD_FAILED_TEXT);
        }
    }

    pub fn handle_realtime(
        &mut self,
        screen: &mut ChatScreen,
        notifications: &mut Notifications,
        viewer: &Viewer,
        event: RealtimeEvent,
    ) {
        match event {
            RealtimeEvent::Connected => {
                screen.connection = ConnectionStatus::Connected;
                self.emit(OutboundEvent::Join {
                    room: self.room.clone(),
                });
                notifications.success(format!("Connected to {}", self.room));
                if screen.session.is_at_bottom() {
                    self.emit_seen();
                }
            }
            RealtimeEvent::ConnectFailed(reason) => {
                screen.connection = ConnectionStatus::Disconnected;
                notifications.error(format!("Connection failed: {reason}"));
                self.close();
            }
            RealtimeEvent::Disconnected(reason) => {
                tracing::info!(visit = %self.visit, reason = %reason, "realtime channel disconnected");
                screen.connection = ConnectionStatus::Disconnected;
                notifications.info(format!("Disconnected from {}", self.room));
                self.close();
            }
            RealtimeEvent::Inbound(inbound) => self.handle_inbound(screen, viewer, inbound),
        }
    }

    fn handle_inbound(&mut self, screen: &mut ChatScreen, viewer: &Viewer, event: InboundEvent) {
        let session = &mut screen.session;
        match event {
            InboundEvent::Message(message) => {
                let from_remote = !message.is_from(&viewer.username);
                let effect = session.receive_message(message, &viewer.username);
                if from_remote && effect == IncomingEffect::FollowedBottom {
                    self.emit_seen();
                }
            }
            InboundEvent::Typing { user, typing } => session.apply_typing(user, typing),
            InboundEvent::Users(users) => session.set_online_users(users),
            InboundEvent::Seen => {
                let marked = session.mark_own_seen(&viewer.username);
                tracing::debug!(room = %self.room, marked, "own messages marked seen");
            }
        }
    }

    /// Sends the composer text. The input is kept when the emit fails or the
    /// room is not connected yet.
    pub fn submit(
        &mut self,
        screen: &mut ChatScreen,
        notifications: &mut Notifications,
        viewer: &Viewer,
    ) {
        let command = SendMessageCommand {
            room: self.room.clone(),
            content: screen.composer.text().to_owned(),
            avatar: viewer.avatar_ref.clone(),
        };

        if command.content.trim().is_empty() {
            return;
        }

        let result = match (self.channel.as_deref(), screen.connection) {
            (Some(channel), ConnectionStatus::Connected) => send_message(channel, command),
            (Some(_), ConnectionStatus::Connecting) => {
                tracing::info!(room = %self.room, "message refused before the room is connected");
                notifications.error(NOT_CONNECTED_TEXT);
                return;
            }
            _ => Err(SendMessageError::Channel(ChannelError::Closed)),
        };

        match result {
            Ok(()) => {
                screen.composer.clear();
                screen.session.scroll_to_bottom(ScrollMotion::Animated);
            }
            Err(SendMessageError::EmptyMessage) => {}
            Err(error) => {
                tracing::warn!(code = REALTIME_EMIT_FAILED, room = %self.room, error = %error, "message not sent");
                notifications.error("Failed to send message");
            }
        }
    }

    /// Reports whether the composer holds text after any edit.
    pub fn input_changed(&mut self, screen: &ChatScreen) {
        self.emit(OutboundEvent::Typing {
            room: self.room.clone(),
            typing: !screen.composer.is_empty(),
        });
    }

    pub fn scroll_to_bottom(&mut self, screen: &mut ChatScreen) {
        if screen.session.scroll_to_bottom(ScrollMotion::Animated) {
            self.emit_seen();
        }
    }

    pub fn scroll_up(&mut self, screen: &mut ChatScreen, rows: usize) {
        screen.session.scroll_up(rows);
    }

    pub fn scroll_down(&mut self, screen: &mut ChatScreen, rows: usize) {
        if screen.session.scroll_down(rows) == ScrollOutcome::ReachedBottom {
            self.emit_seen();
        }
    }

    /// Announces the departure, then tears the channel down.
    pub fn leave(mut self) {
        self.emit(OutboundEvent::Leave {
            room: self.room.clone(),
        });
        self.close();
        tracing::info!(visit = %self.visit, room = %self.room, "left chat room");
    }

    pub fn close(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            channel.close();
        }
    }

    fn emit_seen(&self) {
        self.emit(OutboundEvent::Seen {
            room: self.room.clone(),
        });
    }

    fn emit(&self, event: OutboundEvent) {
        let Some(channel) = self.channel.as_deref() else {
            tracing::debug!(event = event.name(), "no realtime channel; emit skipped");
            return;
        };

        let name = event.name();
        if let Err(error) = channel.emit(event) {
            tracing::warn!(code = REALTIME_EMIT_FAILED, event = name, error = %error, "realtime emit failed");
        }
    }
}

impl Drop for ChatSessionController {
    fn drop(&mut self) {
        self.close();
    }
}
