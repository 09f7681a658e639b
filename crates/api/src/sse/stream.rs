use std::sync::Arc;
use std::time::Duration;

use futures::{Stream, StreamExt};
use pulse_events::{frame, ChannelSubscriber, EventHub, Subscription};
use tokio_stream::wrappers::{IntervalStream, UnboundedReceiverStream};
use tokio_util::sync::CancellationToken;

/// MIME type of a server-sent event response.
pub const EVENT_STREAM_CONTENT_TYPE: &str = "text/event-stream";

/// Subscribe to `hub` and return the frames for one streaming connection.
///
/// The stream yields every frame broadcast on the hub plus a heartbeat
/// comment every `heartbeat`, starting one period after connect. It owns the
/// hub subscription: when the HTTP layer drops the stream on disconnect, the
/// subscriber is removed. The stream ends once `shutdown` is cancelled.
pub fn connection_stream(
    hub: &Arc<EventHub>,
    heartbeat: Duration,
    shutdown: CancellationToken,
) -> impl Stream<Item = String> + Send + 'static {
    let (subscriber, rx) = ChannelSubscriber::new();
    let guard = ConnectionGuard {
        subscription: hub.subscribe(subscriber),
    };
    tracing::info!(subscriber_id = %guard.subscription.id(), "Event stream connected");

    let events = UnboundedReceiverStream::new(rx);
    let start = tokio::time::Instant::now() + heartbeat;
    let pings = IntervalStream::new(tokio::time::interval_at(start, heartbeat))
        .map(|_| frame::HEARTBEAT.to_owned());

    futures::stream::select(events, pings)
        .map(move |frame| {
            let _connection = &guard;
            frame
        })
        .take_until(shutdown.cancelled_owned())
}

/// Keeps the hub subscription alive for the lifetime of the stream.
struct ConnectionGuard {
    subscription: Subscription,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        tracing::info!(subscriber_id = %self.subscription.id(), "Event stream disconnected");
    }
}
