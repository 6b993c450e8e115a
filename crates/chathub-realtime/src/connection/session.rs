//! Read loop, delivery loop and scoped registration for one subscriber.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::connection::adapter::{CloseFrame, FrameSink, FrameStream, InboundFrame};
use crate::error::RealtimeError;
use crate::hub::Hub;
use crate::message::{Message, MessageEnvelope};
use crate::subscriber::{CloseCause, Subscriber};

/// Keeps a subscriber registered for as long as the guard lives.
///
/// [`Registration::release`] unregisters in place. If the guard is dropped
/// without being released (the session future was cancelled), unregistration
/// is spawned onto the current runtime.
pub struct Registration {
    hub: Arc<Hub>,
    subscriber: Arc<Subscriber>,
    released: bool,
}

impl Registration {
    /// Registers `subscriber` and returns the guard.
    pub async fn acquire(hub: Arc<Hub>, subscriber: Arc<Subscriber>) -> Self {
        hub.register(subscriber.clone()).await;
        Self {
            hub,
            subscriber,
            released: false,
        }
    }

    /// The registered subscriber.
    pub fn subscriber(&self) -> &Arc<Subscriber> {
        &self.subscriber
    }

    /// Unregisters now.
    pub async fn release(mut self) {
        self.hub.unregister(&self.subscriber).await;
        self.released = true;
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        self.subscriber.lifetime().cancel();
        let hub = self.hub.clone();
        let subscriber = self.subscriber.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    hub.unregister(&subscriber).await;
                });
            }
            Err(_) => {
                warn!(
                    subscriber_id = %subscriber.id(),
                    "No runtime available to unregister dropped subscriber"
                );
            }
        }
    }
}

/// Drains inbound frames until the peer closes or the lifetime ends.
///
/// Control frames are ignored. A data frame violates the receive-only
/// contract and force-closes the subscriber.
pub async fn run_read_loop<S>(mut stream: S, subscriber: Arc<Subscriber>)
where
    S: FrameStream,
{
    loop {
        let frame = tokio::select! {
            _ = subscriber.closed() => return,
            frame = stream.next_frame() => frame,
        };

        match frame {
            Some(Ok(InboundFrame::Control)) => continue,
            Some(Ok(InboundFrame::Data)) => {
                debug!(subscriber_id = %subscriber.id(), "Data frame on receive-only connection");
                subscriber.force_close(CloseFrame::unexpected_data());
                return;
            }
            Some(Ok(InboundFrame::Close)) | None => {
                subscriber.peer_closed();
                return;
            }
            Some(Err(e)) => {
                debug!(subscriber_id = %subscriber.id(), error = %e, "Read side failed");
                subscriber.peer_closed();
                return;
            }
        }
    }
}

/// Writes queued messages to `sink` in order until the lifetime ends.
///
/// Each write is bounded by `write_timeout`. Cancellation is a clean exit;
/// write failures and timeouts are returned.
pub async fn run_delivery<K>(
    subscriber: &Subscriber,
    queue: &mut mpsc::Receiver<Message>,
    sink: &mut K,
    write_timeout: Duration,
) -> Result<(), RealtimeError>
where
    K: FrameSink + ?Sized,
{
    loop {
        tokio::select! {
            biased;

            _ = subscriber.closed() => return Ok(()),
            next = queue.recv() => {
                let Some(message) = next else {
                    return Ok(());
                };

                let text = MessageEnvelope::from(&message).to_json()?;
                match write_with_deadline(subscriber, sink, text, write_timeout).await {
                    Ok(()) => {}
                    Err(e) if e.is_cancelled() => return Ok(()),
                    Err(e) => return Err(e),
                }
            }
        }
    }
}

async fn write_with_deadline<K>(
    subscriber: &Subscriber,
    sink: &mut K,
    text: String,
    write_timeout: Duration,
) -> Result<(), RealtimeError>
where
    K: FrameSink + ?Sized,
{
    tokio::select! {
        _ = subscriber.closed() => Err(RealtimeError::Cancelled),
        result = tokio::time::timeout(write_timeout, sink.send_text(text)) => match result {
            Ok(write) => write,
            Err(_) => Err(RealtimeError::WriteTimeout(write_timeout)),
        },
    }
}

/// Close frame to send once delivery has stopped, or `None` if the peer
/// already closed.
pub fn closing_frame(
    subscriber: &Subscriber,
    outcome: &Result<(), RealtimeError>,
) -> Option<CloseFrame> {
    if outcome.is_err() {
        return Some(CloseFrame::delivery_failed());
    }

    match subscriber.close_cause() {
        Some(CloseCause::Forced(frame)) => Some(frame),
        Some(CloseCause::PeerClosed) => None,
        None => Some(CloseFrame::going_away()),
    }
}
