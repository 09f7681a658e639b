//! Pulse live event fan-out.
//!
//! - [`EventHub`] — in-process subscriber registry that pushes every
//!   broadcast [`StreamEvent`] to each current [`Subscriber`].
//! - [`frame`] — the `text/event-stream` wire encoding shared by the hub and
//!   the per-connection heartbeat.
//! - [`ChannelSubscriber`] — subscriber that feeds a tokio channel, used to
//!   back streaming HTTP responses.

pub mod frame;
pub mod hub;
pub mod subscriber;

pub use hub::{BroadcastReport, EventHub, StreamEvent, Subscription, SubscriptionId};
pub use subscriber::{ChannelSubscriber, DeliveryError, Subscriber};
