//! Transport seam: the two halves of a duplex text-frame connection.
//!
//! The hub never sees a socket type. The HTTP layer implements these traits
//! for its WebSocket halves; tests implement them in memory.

use std::borrow::Cow;

use async_trait::async_trait;

use crate::error::RealtimeError;

/// WebSocket close status: normal closure.
pub const CLOSE_NORMAL: u16 = 1000;
/// WebSocket close status: endpoint going away.
pub const CLOSE_GOING_AWAY: u16 = 1001;
/// WebSocket close status: policy violation.
pub const CLOSE_POLICY_VIOLATION: u16 = 1008;
/// WebSocket close status: internal error.
pub const CLOSE_INTERNAL_ERROR: u16 = 1011;

/// Reason sent to a subscriber evicted for falling behind.
pub const SLOW_CONSUMER_REASON: &str = "Server too slow to handle load";

/// Status code and reason sent when the server closes a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseFrame {
    /// Close status code.
    pub code: u16,
    /// Human-readable reason.
    pub reason: Cow<'static, str>,
}

impl CloseFrame {
    /// Build a close frame.
    pub fn new(code: u16, reason: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    /// Eviction of a subscriber whose queue overflowed.
    pub fn slow_consumer() -> Self {
        Self::new(CLOSE_POLICY_VIOLATION, SLOW_CONSUMER_REASON)
    }

    /// The client sent a data frame on a receive-only connection.
    pub fn unexpected_data() -> Self {
        Self::new(CLOSE_POLICY_VIOLATION, "unexpected data message")
    }

    /// Server shutdown.
    pub fn going_away() -> Self {
        Self::new(CLOSE_GOING_AWAY, "server shutting down")
    }

    /// Delivery failed (write error or deadline exceeded).
    pub fn delivery_failed() -> Self {
        Self::new(CLOSE_INTERNAL_ERROR, "delivery failed")
    }
}

/// Outbound half of a connection.
#[async_trait]
pub trait FrameSink: Send {
    /// Write one text frame. Deadlines are applied by the caller.
    async fn send_text(&mut self, text: String) -> Result<(), RealtimeError>;

    /// Send a close frame and shut the outbound half.
    async fn close(&mut self, frame: CloseFrame) -> Result<(), RealtimeError>;
}

/// A frame read from the client, reduced to what the hub cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundFrame {
    /// Text or binary payload.
    Data,
    /// Ping/pong.
    Control,
    /// The peer started the closing handshake.
    Close,
}

/// Inbound half of a connection.
#[async_trait]
pub trait FrameStream: Send {
    /// Next inbound frame, or `None` once the stream has ended.
    async fn next_frame(&mut self) -> Option<Result<InboundFrame, RealtimeError>>;
}
