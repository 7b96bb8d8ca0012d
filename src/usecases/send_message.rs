//! Use case for posting a message to the open room.
//!
//! Messages travel over the realtime channel only; the server persists and
//! echoes them back, so nothing is appended locally.

use thiserror::Error;

use crate::{
    domain::realtime::OutboundEvent,
    usecases::contracts::{ChannelError, RealtimeChannel},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageCommand {
    pub room: String,
    pub content: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    /// Message text is empty after trimming whitespace.
    #[error("message is empty")]
    EmptyMessage,
    #[error("message could not be sent: {0}")]
    Channel(#[from] ChannelError),
}

/// Emits the message with its content as typed, then clears the typing flag.
///
/// # Errors
/// Returns `SendMessageError::EmptyMessage` without touching the channel when
/// the content is blank, and `SendMessageError::Channel` when the message
/// emit fails.
pub fn send_message(
    channel: &dyn RealtimeChannel,
    command: SendMessageCommand,
) -> Result<(), SendMessageError> {
    if command.content.trim().is_empty() {
        return Err(SendMessageError::EmptyMessage);
    }

    let room = command.room;
    channel.emit(OutboundEvent::Message {
        room: room.clone(),
        content: command.content,
        avatar: command.avatar,
    })?;

    if let Err(error) = channel.emit(OutboundEvent::Typing {
        room,
        typing: false,
    }) {
        tracing::warn!(error = %error, "typing reset after send was not delivered");
    }

    Ok(())
}
