//! Socket.IO v4 packets carried over Engine.IO v4 text frames.
//!
//! Only the subset a websocket-only client of the default namespace needs:
//! engine open/close/ping/pong and socket connect/disconnect/event.

use serde_json::{json, Value};
use thiserror::Error;

use crate::usecases::contracts::ChannelError;

pub const HANDSHAKE_PATH: &str = "/socket.io/?EIO=4&transport=websocket";
pub const PONG: &str = "3";
pub const DISCONNECT: &str = "41";

#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Open,
    Close,
    Ping,
    Pong,
    Noop,
    Connected,
    ConnectError(String),
    Disconnect,
    Event { name: String, args: Vec<Value> },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("empty frame")]
    Empty,
    #[error("unsupported engine packet type {0:?}")]
    UnsupportedEngineType(char),
    #[error("unsupported socket packet type {0:?}")]
    UnsupportedSocketType(char),
    #[error("malformed event packet: {0}")]
    MalformedEvent(String),
}

/// Maps the backend's HTTP origin to its websocket endpoint.
pub fn websocket_url(base_url: &str) -> Result<String, ChannelError> {
    let base = base_url.trim_end_matches('/');
    let origin = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        return Err(ChannelError::InvalidEndpoint(base_url.to_owned()));
    };

    Ok(format!("{origin}{HANDSHAKE_PATH}"))
}

pub fn encode_connect(token: &str) -> String {
    format!("40{}", json!({ "token": token }))
}

pub fn encode_event(name: &str, payload: Value) -> String {
    format!("42{}", json!([name, payload]))
}

pub fn decode(text: &str) -> Result<Frame, FrameError> {
    let mut chars = text.chars();
    let engine_type = chars.next().ok_or(FrameError::Empty)?;
    let rest = chars.as_str();

    match engine_type {
        '0' => Ok(Frame::Open),
        '1' => Ok(Frame::Close),
        '2' => Ok(Frame::Ping),
        '3' => Ok(Frame::Pong),
        '6' => Ok(Frame::Noop),
        '4' => decode_socket_packet(rest),
        other => Err(FrameError::UnsupportedEngineType(other)),
    }
}

fn decode_socket_packet(packet: &str) -> Result<Frame, FrameError> {
    let mut chars = packet.chars();
    let socket_type = chars.next().ok_or(FrameError::Empty)?;
    let body = skip_namespace(chars.as_str());

    match socket_type {
        '0' => Ok(Frame::Connected),
        '1' => Ok(Frame::Disconnect),
        '4' => Ok(Frame::ConnectError(connect_error_message(body))),
        '2' => decode_event(body),
        other => Err(FrameError::UnsupportedSocketType(other)),
    }
}

fn skip_namespace(body: &str) -> &str {
    if body.starts_with('/') {
        body.split_once(',').map_or("", |(_, rest)| rest)
    } else {
        body
    }
}

fn connect_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("message").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_else(|| "connection refused".to_owned())
}

fn decode_event(body: &str) -> Result<Frame, FrameError> {
    // An ack id may precede the argument array.
    let body = body.trim_start_matches(|ch: char| ch.is_ascii_digit());
    let mut items = match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(items)) => items.into_iter(),
        Ok(_) => return Err(FrameError::MalformedEvent("expected an array".to_owned())),
        Err(error) => return Err(FrameError::MalformedEvent(error.to_string())),
    };

    let name = match items.next() {
        Some(Value::String(name)) => name,
        _ => return Err(FrameError::MalformedEvent("missing event name".to_owned())),
    };

    Ok(Frame::Event {
        name,
        args: items.collect(),
    })
}
