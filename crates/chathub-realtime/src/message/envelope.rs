//! Outbound text-frame envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{Message, MessageKind};

/// JSON shape written to subscribers for every delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEnvelope {
    /// Message payload as text.
    pub message: String,
    /// Message classification.
    pub message_type: MessageKind,
    /// When the message was published.
    pub created: DateTime<Utc>,
}

impl From<&Message> for MessageEnvelope {
    fn from(msg: &Message) -> Self {
        Self {
            message: msg.text().into_owned(),
            message_type: msg.kind(),
            created: msg.created(),
        }
    }
}

impl MessageEnvelope {
    /// Serialize to the JSON text frame.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a text frame back into an envelope.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
