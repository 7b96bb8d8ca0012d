use std::sync::mpsc::Sender;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::{
    runtime::Handle,
    sync::{mpsc, watch},
};
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

use crate::{
    backend::{
        payloads::{outbound_payload, MessagePayload, TypingPayload},
        socketio::{self, Frame, FrameError},
    },
    domain::{
        events::AppEvent,
        realtime::{InboundEvent, OutboundEvent, RealtimeEvent, VisitId},
    },
    usecases::contracts::{ChannelError, RealtimeChannel},
};

const REALTIME_CHANNEL_STARTED: &str = "REALTIME_CHANNEL_STARTED";
const REALTIME_CHANNEL_STOPPED: &str = "REALTIME_CHANNEL_STOPPED";
const REALTIME_CONNECT_FAILED: &str = "REALTIME_CONNECT_FAILED";
const REALTIME_FRAME_REJECTED: &str = "REALTIME_FRAME_REJECTED";
const REALTIME_EVENT_DROPPED: &str = "REALTIME_EVENT_DROPPED";
const REALTIME_SIGNAL_SEND_FAILED: &str = "REALTIME_SIGNAL_SEND_FAILED";

/// Handle to the websocket worker of one room visit. Dropping it closes the
/// connection.
#[derive(Debug)]
pub struct SocketChannel {
    visit: VisitId,
    outbound_tx: mpsc::UnboundedSender<OutboundEvent>,
    stop_tx: Option<watch::Sender<bool>>,
}

impl SocketChannel {
    pub fn open(
        runtime: &Handle,
        url: String,
        token: String,
        visit: VisitId,
        events: Sender<AppEvent>,
    ) -> Self {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(false);

        runtime.spawn(run_channel(
            url,
            ProtocolState::new(token),
            Reporter { visit, events },
            outbound_rx,
            stop_rx,
        ));

        tracing::info!(code = REALTIME_CHANNEL_STARTED, %visit, "realtime channel started");

        Self {
            visit,
            outbound_tx,
            stop_tx: Some(stop_tx),
        }
    }
}

impl RealtimeChannel for SocketChannel {
    fn emit(&self, event: OutboundEvent) -> Result<(), ChannelError> {
        if self.stop_tx.is_none() {
            return Err(ChannelError::Closed);
        }

        tracing::debug!(visit = %self.visit, event = event.name(), "realtime emit queued");
        self.outbound_tx
            .send(event)
            .map_err(|_| ChannelError::Closed)
    }

    fn close(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
            tracing::info!(visit = %self.visit, "realtime channel shutdown signal sent");
        }
    }
}

impl Drop for SocketChannel {
    fn drop(&mut self) {
        self.close();
    }
}

struct Reporter {
    visit: VisitId,
    events: Sender<AppEvent>,
}

impl Reporter {
    /// Returns false once the UI side has gone away.
    fn report(&self, event: RealtimeEvent) -> bool {
        match self.events.send(AppEvent::Realtime {
            visit: self.visit,
            event,
        }) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(
                    code = REALTIME_SIGNAL_SEND_FAILED,
                    visit = %self.visit,
                    error = %error,
                    "realtime worker failed to forward event"
                );
                false
            }
        }
    }
}

async fn run_channel(
    url: String,
    mut protocol: ProtocolState,
    reporter: Reporter,
    mut outbound_rx: mpsc::UnboundedReceiver<OutboundEvent>,
    mut stop_rx: watch::Receiver<bool>,
) {
    let visit = reporter.visit;
    let stream = tokio::select! {
        _ = stop_rx.changed() => {
            tracing::info!(code = REALTIME_CHANNEL_STOPPED, %visit, "realtime channel stopped before connecting");
            return;
        }
        connected = connect_async(url.as_str()) => match connected {
            Ok((stream, _)) => stream,
            Err(error) => {
                tracing::warn!(code = REALTIME_CONNECT_FAILED, %visit, error = %error, "websocket connect failed");
                reporter.report(RealtimeEvent::ConnectFailed(error.to_string()));
                return;
            }
        },
    };
    let (mut sink, mut source) = stream.split();

    loop {
        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    if protocol.is_connected() {
                        let _ = sink.send(WsMessage::Text(socketio::DISCONNECT.to_owned())).await;
                    }
                    let _ = sink.close().await;
                    tracing::info!(code = REALTIME_CHANNEL_STOPPED, %visit, "realtime channel stopped");
                    return;
                }
            }
            outbound = outbound_rx.recv() => {
                let Some(event) = outbound else {
                    let _ = sink.close().await;
                    return;
                };
                let Some(text) = protocol.encode_outbound(&event) else {
                    continue;
                };
                if let Err(error) = sink.send(WsMessage::Text(text)).await {
                    reporter.report(RealtimeEvent::Disconnected(error.to_string()));
                    return;
                }
            }
            incoming = source.next() => {
                let text = match incoming {
                    Some(Ok(WsMessage::Text(text))) => text,
                    Some(Ok(WsMessage::Close(_))) | None => {
                        reporter.report(RealtimeEvent::Disconnected("connection closed".to_owned()));
                        return;
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(error)) => {
                        reporter.report(RealtimeEvent::Disconnected(error.to_string()));
                        return;
                    }
                };

                match protocol.on_text(&text) {
                    Reaction::Nothing => {}
                    Reaction::Reply(reply) => {
                        if let Err(error) = sink.send(WsMessage::Text(reply)).await {
                            reporter.report(RealtimeEvent::Disconnected(error.to_string()));
                            return;
                        }
                    }
                    Reaction::Report(event) => {
                        if !reporter.report(event) {
                            let _ = sink.close().await;
                            return;
                        }
                    }
                    Reaction::Finish(event) => {
                        reporter.report(event);
                        let _ = sink.close().await;
                        return;
                    }
                }
            }
        }
    }
}

#[derive(Debug, PartialEq)]
enum Reaction {
    Nothing,
    Reply(String),
    Report(RealtimeEvent),
    Finish(RealtimeEvent),
}

/// Socket.IO handshake and event mapping, independent of the transport.
#[derive(Debug)]
struct ProtocolState {
    token: String,
    connected: bool,
}

impl ProtocolState {
    fn new(token: String) -> Self {
        Self {
            token,
            connected: false,
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    /// Events emitted before the namespace is connected are dropped.
    fn encode_outbound(&self, event: &OutboundEvent) -> Option<String> {
        if !self.connected {
            if matches!(event, OutboundEvent::Message { .. }) {
                tracing::warn!(
                    code = REALTIME_EVENT_DROPPED,
                    event = event.name(),
                    "dropping chat message before namespace connect"
                );
            } else {
                tracing::debug!(
                    code = REALTIME_EVENT_DROPPED,
                    event = event.name(),
                    "dropping emit before namespace connect"
                );
            }
            return None;
        }

        match outbound_payload(event) {
            Ok(payload) => Some(socketio::encode_event(event.name(), payload)),
            Err(error) => {
                tracing::warn!(
                    code = REALTIME_EVENT_DROPPED,
                    event = event.name(),
                    error = %error,
                    "failed to encode outbound event"
                );
                None
            }
        }
    }

    fn on_text(&mut self, text: &str) -> Reaction {
        match socketio::decode(text) {
            Ok(frame) => self.on_frame(frame),
            Err(error) => {
                tracing::warn!(code = REALTIME_FRAME_REJECTED, error = %error, "ignoring realtime frame");
                Reaction::Nothing
            }
        }
    }

    fn on_frame(&mut self, frame: Frame) -> Reaction {
        match frame {
            Frame::Open => Reaction::Reply(socketio::encode_connect(&self.token)),
            Frame::Ping => Reaction::Reply(socketio::PONG.to_owned()),
            Frame::Pong | Frame::Noop => Reaction::Nothing,
            Frame::Connected => {
                self.connected = true;
                Reaction::Report(RealtimeEvent::Connected)
            }
            Frame::ConnectError(message) => Reaction::Finish(RealtimeEvent::ConnectFailed(message)),
            Frame::Disconnect | Frame::Close => Reaction::Finish(RealtimeEvent::Disconnected(
                "server closed the connection".to_owned(),
            )),
            Frame::Event { name, args } => match decode_inbound(&name, args) {
                Ok(Some(event)) => Reaction::Report(RealtimeEvent::Inbound(event)),
                Ok(None) => {
                    tracing::debug!(event = %name, "ignoring unknown realtime event");
                    Reaction::Nothing
                }
                Err(error) => {
                    tracing::warn!(
                        code = REALTIME_FRAME_REJECTED,
                        event = %name,
                        error = %error,
                        "ignoring malformed realtime event"
                    );
                    Reaction::Nothing
                }
            },
        }
    }
}

fn decode_inbound(name: &str, args: Vec<Value>) -> Result<Option<InboundEvent>, FrameError> {
    let first = args.into_iter().next();
    let malformed = |error: serde_json::Error| FrameError::MalformedEvent(error.to_string());

    let event = match name {
        "message" => {
            let payload: MessagePayload =
                serde_json::from_value(first.unwrap_or(Value::Null)).map_err(malformed)?;
            InboundEvent::Message(payload.into())
        }
        "typing" => {
            let payload: TypingPayload =
                serde_json::from_value(first.unwrap_or(Value::Null)).map_err(malformed)?;
            InboundEvent::Typing {
                user: payload.user,
                typing: payload.typing,
            }
        }
        "users" => InboundEvent::Users(
            serde_json::from_value(first.unwrap_or(Value::Null)).map_err(malformed)?,
        ),
        "seen" => InboundEvent::Seen,
        _ => return Ok(None),
    };

    Ok(Some(event))
}
