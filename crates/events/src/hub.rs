//! In-process event hub with handle-keyed subscribers.
//!
//! [`EventHub`] is the central fan-out point for [`StreamEvent`]s. It is
//! designed to be shared via `Arc<EventHub>` across the application; every
//! open streaming connection holds one [`Subscription`] for as long as its
//! response body lives.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use pulse_core::sms::SmsEvent;
use serde::{Deserialize, Serialize};

use crate::frame;
use crate::subscriber::{DeliveryError, Subscriber};

// ---------------------------------------------------------------------------
// StreamEvent
// ---------------------------------------------------------------------------

/// An event pushed to live feeds, tagged on the wire by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Sms(SmsEvent),
}

impl StreamEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            StreamEvent::Sms(_) => "sms",
        }
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Opaque handle identifying one subscriber. Never reused within a hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Guard returned by [`EventHub::subscribe`].
///
/// Dropping the guard unsubscribes, so tying it to the lifetime of a
/// response stream removes the subscriber as soon as the transport drops
/// the stream.
pub struct Subscription {
    hub: Arc<EventHub>,
    id: SubscriptionId,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Unsubscribe now. Equivalent to dropping the guard.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.id);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

// ---------------------------------------------------------------------------
// EventHub
// ---------------------------------------------------------------------------

/// Outcome of a single [`EventHub::broadcast`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Subscribers whose writer accepted the frame.
    pub delivered: usize,
    /// Subscribers whose writer errored or panicked.
    pub failed: usize,
}

/// In-process fan-out hub.
///
/// Delivery is best-effort and at-most-once: there is no buffering, so a
/// subscriber only sees events broadcast while it is registered.
pub struct EventHub {
    next_id: AtomicU64,
    subscribers: RwLock<BTreeMap<SubscriptionId, Arc<dyn Subscriber>>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            subscribers: RwLock::new(BTreeMap::new()),
        }
    }

    /// Register `subscriber` and return the guard that keeps it registered.
    pub fn subscribe(self: &Arc<Self>, subscriber: impl Subscriber + 'static) -> Subscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(subscriber));
        tracing::debug!(subscriber_id = %id, "Subscriber added");

        Subscription {
            hub: Arc::clone(self),
            id,
        }
    }

    /// Remove a subscriber. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some();
        if removed {
            tracing::debug!(subscriber_id = %id, "Subscriber removed");
        }
        removed
    }

    /// Serialize `event` once and hand the frame to every current subscriber.
    ///
    /// Subscribers are snapshotted before any writer runs. A writer that
    /// errors or panics is skipped; the rest still receive the frame.
    pub fn broadcast(&self, event: &StreamEvent) -> BroadcastReport {
        let frame = match frame::data(event) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(error = %e, kind = event.kind(), "Failed to encode event");
                return BroadcastReport::default();
            }
        };

        let targets: Vec<(SubscriptionId, Arc<dyn Subscriber>)> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, subscriber)| (*id, Arc::clone(subscriber)))
            .collect();

        let mut report = BroadcastReport::default();
        for (id, subscriber) in targets {
            let result = catch_unwind(AssertUnwindSafe(|| subscriber.notify(&frame)))
                .unwrap_or_else(|_| Err(DeliveryError::Write("writer panicked".into())));
            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::debug!(subscriber_id = %id, error = %e, "Dropped frame for subscriber");
                    report.failed += 1;
                }
            }
        }

        tracing::debug!(
            kind = event.kind(),
            delivered = report.delivered,
            failed = report.failed,
            "Event broadcast",
        );
        report
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
