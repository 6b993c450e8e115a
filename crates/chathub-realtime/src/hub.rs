//! The broadcast hub.
//!
//! The hub owns the live subscriber set behind one exclusive lock. Publishing
//! holds that lock across the rate-limiter wait and the fan-out, so every
//! subscriber observes publishes in the same order and membership never
//! changes mid-fan-out.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use chathub_core::config::HubConfig;

use crate::connection::adapter::{CloseFrame, FrameSink, FrameStream};
use crate::connection::session::{self, Registration};
use crate::error::RealtimeError;
use crate::message::{Message, MessageKind};
use crate::metrics::HubMetrics;
use crate::naming;
use crate::rate_limit::RateLimiter;
use crate::subscriber::{Enqueue, Subscriber, SubscriberId};

/// Central broadcast hub.
#[derive(Debug)]
pub struct Hub {
    subscribers: Mutex<HashMap<SubscriberId, Arc<Subscriber>>>,
    limiter: RateLimiter,
    config: HubConfig,
    metrics: Arc<HubMetrics>,
    shutdown: CancellationToken,
}

impl Hub {
    /// Create a hub from configuration.
    pub fn new(config: HubConfig) -> Self {
        let limiter = RateLimiter::new(config.publish_interval(), config.publish_burst);
        Self {
            subscribers: Mutex::new(HashMap::new()),
            limiter,
            config,
            metrics: Arc::new(HubMetrics::new()),
            shutdown: CancellationToken::new(),
        }
    }

    /// Hub configuration.
    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Hub metrics.
    pub fn metrics(&self) -> &Arc<HubMetrics> {
        &self.metrics
    }

    /// Publish rate limiter.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Create a subscriber with a random display name and the configured
    /// queue capacity. It is not registered yet.
    pub fn new_subscriber(&self) -> (Arc<Subscriber>, mpsc::Receiver<Message>) {
        self.new_named_subscriber(naming::random_display_name())
    }

    /// Create an unregistered subscriber with the given display name.
    pub fn new_named_subscriber(
        &self,
        display_name: impl Into<String>,
    ) -> (Arc<Subscriber>, mpsc::Receiver<Message>) {
        let (subscriber, queue) = Subscriber::new(
            Uuid::new_v4(),
            display_name,
            self.config.queue_capacity,
            &self.shutdown,
        );
        (Arc::new(subscriber), queue)
    }

    /// Add `subscriber` to the live set and announce it to everyone,
    /// including itself.
    pub async fn register(&self, subscriber: Arc<Subscriber>) {
        let id = subscriber.id();
        let name = subscriber.display_name().to_string();
        {
            let mut subscribers = self.subscribers.lock().await;
            subscribers.insert(id, subscriber);
        }
        self.metrics.record_connect();
        info!(subscriber_id = %id, display_name = %name, "Subscriber registered");

        if let Err(e) = self
            .publish(Message::welcome_text(&name), MessageKind::Welcome)
            .await
        {
            debug!(subscriber_id = %id, error = %e, "Welcome notification not sent");
        }
    }

    /// Remove `subscriber` from the live set and announce its departure to
    /// the rest. Returns `false` if it was not registered; a second call is a
    /// no-op.
    pub async fn unregister(&self, subscriber: &Subscriber) -> bool {
        let id = subscriber.id();
        let removed = {
            let mut subscribers = self.subscribers.lock().await;
            subscribers.remove(&id).is_some()
        };

        if !removed {
            return false;
        }

        self.metrics.record_disconnect();
        info!(subscriber_id = %id, display_name = %subscriber.display_name(), "Subscriber unregistered");

        if let Err(e) = self
            .publish(
                Message::leave_text(subscriber.display_name()),
                MessageKind::Leave,
            )
            .await
        {
            debug!(subscriber_id = %id, error = %e, "Leave notification not sent");
        }
        true
    }

    /// Broadcast `payload` to every registered subscriber.
    ///
    /// Waits on the rate limiter while holding the subscriber lock. Each
    /// subscriber gets the message through a non-blocking enqueue; one whose
    /// queue is full is evicted and skipped. Returns how many queues accepted
    /// the message, or [`RealtimeError::Cancelled`] if the hub shut down
    /// during the wait.
    pub async fn publish(
        &self,
        payload: impl Into<Bytes>,
        kind: MessageKind,
    ) -> Result<usize, RealtimeError> {
        let subscribers = self.subscribers.lock().await;

        if !kind.is_lifecycle() || self.config.rate_limit_lifecycle {
            if let Err(e) = self.limiter.wait(&self.shutdown).await {
                self.metrics.record_publish_cancelled();
                return Err(e);
            }
        }

        let message = Message::new(payload, kind);
        let mut delivered = 0usize;

        for subscriber in subscribers.values() {
            // Already evicted or closing; its session will unregister it.
            if subscriber.is_closed() {
                continue;
            }
            match subscriber.try_enqueue(message.clone()) {
                Enqueue::Queued => delivered += 1,
                Enqueue::Full => {
                    warn!(
                        subscriber_id = %subscriber.id(),
                        "Queue full, evicting slow subscriber"
                    );
                    self.metrics.record_eviction();
                    let slow = subscriber.clone();
                    tokio::spawn(async move {
                        slow.force_close(CloseFrame::slow_consumer());
                    });
                }
                Enqueue::Closed => {
                    debug!(subscriber_id = %subscriber.id(), "Queue closed, skipping");
                }
            }
        }

        self.metrics.record_publish(delivered as u64);
        debug!(kind = %kind, recipients = delivered, "Message published");
        Ok(delivered)
    }

    /// Drive one connection from registration to teardown.
    ///
    /// Registers a new subscriber, reads inbound frames in the background,
    /// delivers queued messages to `sink` until the connection ends, sends a
    /// close frame when appropriate, and unregisters. Unregistration also
    /// happens if this future is dropped early.
    pub async fn serve<K, S>(self: &Arc<Self>, mut sink: K, stream: S) -> Result<(), RealtimeError>
    where
        K: FrameSink,
        S: FrameStream + 'static,
    {
        let (subscriber, mut queue) = self.new_subscriber();
        let registration = Registration::acquire(self.clone(), subscriber.clone()).await;

        let reader = tokio::spawn(session::run_read_loop(stream, subscriber.clone()));

        let outcome = session::run_delivery(
            &subscriber,
            &mut queue,
            &mut sink,
            self.config.write_timeout(),
        )
        .await;

        if let Err(e) = &outcome {
            warn!(subscriber_id = %subscriber.id(), error = %e, "Delivery failed");
        }

        // Stop the reader before closing.
        subscriber.lifetime().cancel();
        let _ = reader.await;

        if let Some(frame) = session::closing_frame(&subscriber, &outcome) {
            match tokio::time::timeout(self.config.write_timeout(), sink.close(frame)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    debug!(subscriber_id = %subscriber.id(), error = %e, "Close frame not sent")
                }
                Err(_) => debug!(subscriber_id = %subscriber.id(), "Close frame timed out"),
            }
        }

        registration.release().await;
        outcome
    }

    /// Number of registered subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.lock().await.len()
    }

    /// Whether `id` is registered.
    pub async fn contains(&self, id: SubscriberId) -> bool {
        self.subscribers.lock().await.contains_key(&id)
    }

    /// Cancel every subscriber lifetime and any pending limiter wait.
    pub fn shutdown(&self) {
        info!("Shutting down hub");
        self.shutdown.cancel();
    }

    /// Whether [`Hub::shutdown`] has been called.
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}
