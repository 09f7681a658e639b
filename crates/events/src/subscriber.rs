//! The write side of a live connection, as seen by the hub.

use tokio::sync::mpsc;

/// Failure to hand a frame to one subscriber.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The connection behind the subscriber has gone away.
    #[error("subscriber closed")]
    Closed,

    #[error("write failed: {0}")]
    Write(String),
}

/// Receives serialized frames from [`EventHub::broadcast`](crate::EventHub::broadcast).
///
/// `notify` is called synchronously during a broadcast and must not block.
pub trait Subscriber: Send + Sync {
    fn notify(&self, frame: &str) -> Result<(), DeliveryError>;
}

impl<F> Subscriber for F
where
    F: Fn(&str) -> Result<(), DeliveryError> + Send + Sync,
{
    fn notify(&self, frame: &str) -> Result<(), DeliveryError> {
        self(frame)
    }
}

/// Subscriber that forwards frames into an unbounded channel.
///
/// The receiving half is drained by the HTTP response body of a streaming
/// connection. Once that body is dropped, `notify` reports
/// [`DeliveryError::Closed`].
pub struct ChannelSubscriber {
    sender: mpsc::UnboundedSender<String>,
}

impl ChannelSubscriber {
    /// Create a subscriber and the receiver its frames arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Subscriber for ChannelSubscriber {
    fn notify(&self, frame: &str) -> Result<(), DeliveryError> {
        self.sender
            .send(frame.to_owned())
            .map_err(|_| DeliveryError::Closed)
    }
}
