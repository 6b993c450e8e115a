//! Broadcast message types and the outbound wire envelope.

pub mod envelope;
pub mod types;

pub use envelope::MessageEnvelope;
pub use types::{Message, MessageKind};
