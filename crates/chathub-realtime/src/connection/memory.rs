//! In-memory frame adapters for tests.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::connection::adapter::{CloseFrame, FrameSink, FrameStream, InboundFrame};
use crate::error::RealtimeError;

/// Something the server wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Text(String),
    Close(CloseFrame),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SinkMode {
    Healthy,
    Stalled,
    Failing,
}

pub struct MemorySink {
    events: mpsc::UnboundedSender<SinkEvent>,
    mode: SinkMode,
}

fn sink_with(mode: SinkMode) -> (MemorySink, mpsc::UnboundedReceiver<SinkEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (MemorySink { events: tx, mode }, rx)
}

/// A sink that records every frame.
pub fn sink() -> (MemorySink, mpsc::UnboundedReceiver<SinkEvent>) {
    sink_with(SinkMode::Healthy)
}

/// A sink whose text writes never complete.
pub fn stalled_sink() -> (MemorySink, mpsc::UnboundedReceiver<SinkEvent>) {
    sink_with(SinkMode::Stalled)
}

/// A sink whose text writes fail immediately.
pub fn failing_sink() -> (MemorySink, mpsc::UnboundedReceiver<SinkEvent>) {
    sink_with(SinkMode::Failing)
}

#[async_trait]
impl FrameSink for MemorySink {
    async fn send_text(&mut self, text: String) -> Result<(), RealtimeError> {
        match self.mode {
            SinkMode::Healthy => self
                .events
                .send(SinkEvent::Text(text))
                .map_err(|_| RealtimeError::Transport("receiver dropped".into())),
            SinkMode::Stalled => std::future::pending().await,
            SinkMode::Failing => Err(RealtimeError::Transport("connection reset".into())),
        }
    }

    async fn close(&mut self, frame: CloseFrame) -> Result<(), RealtimeError> {
        let _ = self.events.send(SinkEvent::Close(frame));
        Ok(())
    }
}

pub struct MemoryStream {
    frames: mpsc::UnboundedReceiver<InboundFrame>,
}

/// A stream fed by the returned sender; dropping the sender ends the stream.
pub fn stream() -> (MemoryStream, mpsc::UnboundedSender<InboundFrame>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (MemoryStream { frames: rx }, tx)
}

#[async_trait]
impl FrameStream for MemoryStream {
    async fn next_frame(&mut self) -> Option<Result<InboundFrame, RealtimeError>> {
        self.frames.recv().await.map(Ok)
    }
}

/// Next frame, which must be text.
pub async fn next_text(events: &mut mpsc::UnboundedReceiver<SinkEvent>) -> String {
    let event = tokio::time::timeout(std::time::Duration::from_secs(5), events.recv())
        .await
        .expect("timed out waiting for a frame")
        .expect("sink dropped");
    match event {
        SinkEvent::Text(text) => text,
        other => panic!("expected text frame, got {other:?}"),
    }
}

/// Next close frame, skipping text frames.
pub async fn next_close(events: &mut mpsc::UnboundedReceiver<SinkEvent>) -> CloseFrame {
    loop {
        let event = tokio::time::timeout(std::time::Duration::from_secs(5), events.recv())
            .await
            .expect("timed out waiting for close")
            .expect("sink dropped");
        if let SinkEvent::Close(frame) = event {
            return frame;
        }
    }
}
