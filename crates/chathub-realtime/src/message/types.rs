//! Broadcast message definitions.

use std::borrow::Cow;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification tag carried by every broadcast message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    /// A subscriber joined.
    Welcome,
    /// A subscriber left.
    Leave,
    /// User content published through the publish endpoint.
    Content,
}

impl MessageKind {
    /// Whether this kind is a join/leave notification rather than user content.
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::Welcome | Self::Leave)
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Welcome => write!(f, "WELCOME"),
            Self::Leave => write!(f, "LEAVE"),
            Self::Content => write!(f, "CONTENT"),
        }
    }
}

/// One published message. Immutable once constructed.
///
/// Fan-out clones the value into every subscriber queue; the payload is an
/// immutable `Bytes`, so no queue can observe another queue's reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    payload: Bytes,
    kind: MessageKind,
    created: DateTime<Utc>,
}

impl Message {
    /// Create a message stamped with the current time.
    pub fn new(payload: impl Into<Bytes>, kind: MessageKind) -> Self {
        Self {
            payload: payload.into(),
            kind,
            created: Utc::now(),
        }
    }

    /// Join notification payload for `display_name`.
    pub fn welcome_text(display_name: &str) -> String {
        format!("Welcome new user: {display_name}")
    }

    /// Leave notification payload for `display_name`.
    pub fn leave_text(display_name: &str) -> String {
        format!("User Logged out: {display_name}")
    }

    /// Payload decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }

    /// Message classification.
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Creation timestamp.
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }
}
