//! WebSocket upgrade handler and frame adapters.

use async_trait::async_trait;
use axum::extract::ws::{self, Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tracing::{debug, warn};

use chathub_realtime::{CloseFrame, FrameSink, FrameStream, InboundFrame, RealtimeError};

use crate::state::AppState;

/// GET /subscribe: WebSocket upgrade
pub async fn subscribe(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_subscriber(state, socket))
}

/// Drives an established subscriber connection through the hub.
async fn handle_subscriber(state: AppState, socket: WebSocket) {
    let (tx, rx) = socket.split();

    match state.hub.serve(WsSink(tx), WsStream(rx)).await {
        Ok(()) => debug!("Subscriber connection closed"),
        Err(e) => warn!(error = %e, "Subscriber connection failed"),
    }
}

/// Outbound half of an axum WebSocket.
pub struct WsSink(SplitSink<WebSocket, Message>);

#[async_trait]
impl FrameSink for WsSink {
    async fn send_text(&mut self, text: String) -> Result<(), RealtimeError> {
        self.0
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| RealtimeError::Transport(e.to_string()))
    }

    async fn close(&mut self, frame: CloseFrame) -> Result<(), RealtimeError> {
        let close = ws::CloseFrame {
            code: frame.code,
            reason: frame.reason.into_owned().into(),
        };
        self.0
            .send(Message::Close(Some(close)))
            .await
            .map_err(|e| RealtimeError::Transport(e.to_string()))
    }
}

/// Inbound half of an axum WebSocket.
pub struct WsStream(SplitStream<WebSocket>);

#[async_trait]
impl FrameStream for WsStream {
    async fn next_frame(&mut self) -> Option<Result<InboundFrame, RealtimeError>> {
        let frame = match self.0.next().await? {
            Ok(Message::Text(_)) | Ok(Message::Binary(_)) => Ok(InboundFrame::Data),
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => Ok(InboundFrame::Control),
            Ok(Message::Close(_)) => Ok(InboundFrame::Close),
            Err(e) => Err(RealtimeError::Transport(e.to_string())),
        };
        Some(frame)
    }
}
