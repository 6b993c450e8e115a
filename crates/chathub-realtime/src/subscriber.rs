//! A registered receiver with its own bounded delivery queue.

use std::sync::Mutex;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::connection::adapter::CloseFrame;
use crate::message::Message;

/// Unique subscriber identifier.
pub type SubscriberId = Uuid;

/// Why a subscriber's connection lifetime ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseCause {
    /// The client closed the connection or the read side failed.
    PeerClosed,
    /// The server closed the connection with the given frame.
    Forced(CloseFrame),
}

/// Result of a non-blocking enqueue attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueue {
    /// The message is queued for delivery.
    Queued,
    /// The queue is at capacity.
    Full,
    /// The delivery loop has already stopped.
    Closed,
}

/// One connected receiver.
///
/// Publishers push into the queue through [`Subscriber::try_enqueue`]; the
/// session's delivery loop is the only consumer. The lifetime token is a
/// child of the hub's shutdown token, so shutdown ends every session.
#[derive(Debug)]
pub struct Subscriber {
    id: SubscriberId,
    display_name: String,
    queue: mpsc::Sender<Message>,
    lifetime: CancellationToken,
    cause: Mutex<Option<CloseCause>>,
}

impl Subscriber {
    /// Creates a subscriber and the receiving end of its queue.
    pub fn new(
        id: SubscriberId,
        display_name: impl Into<String>,
        capacity: usize,
        parent: &CancellationToken,
    ) -> (Self, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(capacity);
        let subscriber = Self {
            id,
            display_name: display_name.into(),
            queue: tx,
            lifetime: parent.child_token(),
            cause: Mutex::new(None),
        };
        (subscriber, rx)
    }

    /// Subscriber id.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Display name shown in join/leave notifications.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Token cancelled when the connection lifetime ends.
    pub fn lifetime(&self) -> &CancellationToken {
        &self.lifetime
    }

    /// Pushes a message without waiting.
    pub fn try_enqueue(&self, message: Message) -> Enqueue {
        match self.queue.try_send(message) {
            Ok(()) => Enqueue::Queued,
            Err(mpsc::error::TrySendError::Full(_)) => Enqueue::Full,
            Err(mpsc::error::TrySendError::Closed(_)) => Enqueue::Closed,
        }
    }

    /// Forcibly ends the connection with `frame`. The first cause recorded wins.
    pub fn force_close(&self, frame: CloseFrame) {
        self.end(CloseCause::Forced(frame));
    }

    /// Records that the peer went away.
    pub fn peer_closed(&self) {
        self.end(CloseCause::PeerClosed);
    }

    fn end(&self, cause: CloseCause) {
        if let Ok(mut slot) = self.cause.lock() {
            if slot.is_none() {
                *slot = Some(cause);
            }
        }
        self.lifetime.cancel();
    }

    /// The recorded close cause, if any. `None` with a cancelled lifetime
    /// means the hub shut down.
    pub fn close_cause(&self) -> Option<CloseCause> {
        self.cause.lock().ok().and_then(|slot| slot.clone())
    }

    /// Whether the connection lifetime has ended.
    pub fn is_closed(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    /// Completes once the connection lifetime ends.
    pub async fn closed(&self) {
        self.lifetime.cancelled().await
    }
}
