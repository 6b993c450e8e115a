//! # chathub-realtime
//!
//! Real-time broadcast engine for chathub. Provides:
//!
//! - A [`Hub`] owning the live subscriber set behind one exclusive lock
//! - Bounded per-subscriber delivery queues with slow-consumer eviction
//! - A token-bucket [`RateLimiter`] gating the publish path
//! - Transport-agnostic session driving (`FrameSink` / `FrameStream`)
//! - Hub metrics counters

pub mod connection;
pub mod error;
pub mod hub;
pub mod message;
pub mod metrics;
pub mod naming;
pub mod rate_limit;
pub mod subscriber;

pub use connection::adapter::{CloseFrame, FrameSink, FrameStream, InboundFrame};
pub use error::RealtimeError;
pub use hub::Hub;
pub use message::{Message, MessageEnvelope, MessageKind};
pub use metrics::HubMetrics;
pub use rate_limit::RateLimiter;
pub use subscriber::{Subscriber, SubscriberId};
