//! # In-Process Event Bus
//!
//! Fast, in-memory dispatch for domain events. Delivery is at-most-once,
//! best-effort, in-process only: there is no replay for late subscribers
//! and no persistence across restarts.
//!
//! ## Failure isolation
//!
//! - Handler failures are logged and returned, never propagated to the
//!   publisher
//! - All matching handlers run for every event; a failing handler does not
//!   prevent its siblings
//! - A single handler is never reentered concurrently with itself (each
//!   subscription carries an in-flight mutex)

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, warn};

use super::envelope::{DomainEvent, EventType};

/// Async event handler, bound to exactly one event type at subscription.
pub type EventHandler = Arc<
    dyn Fn(DomainEvent) -> Pin<Box<dyn Future<Output = Result<(), EventHandlerError>> + Send>>
        + Send
        + Sync,
>;

/// Errors produced by event handlers during dispatch.
#[derive(Debug, Clone, Error)]
pub enum EventHandlerError {
    #[error("handler failed on event '{event_name}': {reason}")]
    ExecutionFailed { event_name: String, reason: String },

    #[error("handler error: {0}")]
    Generic(String),
}

/// Token identifying one subscription; required for unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Clone)]
struct Subscription {
    id: SubscriptionId,
    handler: EventHandler,
    /// Serializes invocations so the handler is never reentered
    /// concurrently with itself.
    in_flight: Arc<tokio::sync::Mutex<()>>,
}

/// Bus counters for observability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventBusStats {
    pub events_published: u64,
    pub handler_dispatches: u64,
    pub handler_errors: u64,
    pub subscriptions: u64,
}

/// In-process event bus keyed by [`EventType`].
pub struct EventBus {
    subscriptions: RwLock<HashMap<EventType, Vec<Subscription>>>,
    next_id: AtomicU64,
    events_published: AtomicU64,
    handler_dispatches: AtomicU64,
    handler_errors: AtomicU64,
}

// Manual Debug implementation because subscriptions contain closures
impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscription_count", &self.subscription_count())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            events_published: AtomicU64::new(0),
            handler_dispatches: AtomicU64::new(0),
            handler_errors: AtomicU64::new(0),
        }
    }

    /// Register `handler` for `event_type`. Events published before the
    /// subscription are not replayed.
    pub fn subscribe(&self, event_type: EventType, handler: EventHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!(
            event_type = %event_type,
            subscription_id = id.0,
            "Registering event subscriber"
        );
        self.subscriptions
            .write()
            .entry(event_type)
            .or_default()
            .push(Subscription {
                id,
                handler,
                in_flight: Arc::new(tokio::sync::Mutex::new(())),
            });
        id
    }

    /// Remove a subscription; returns whether it existed.
    pub fn unsubscribe(&self, event_type: EventType, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.write();
        let Some(handlers) = subscriptions.get_mut(&event_type) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|s| s.id != id);
        let removed = handlers.len() != before;
        if handlers.is_empty() {
            subscriptions.remove(&event_type);
        }
        removed
    }

    /// Dispatch `event` to every handler subscribed to its type, exactly
    /// once each. Handlers run concurrently; dispatch order across
    /// handlers is unspecified. Failures are logged and returned — the
    /// publisher is never failed by a subscriber.
    pub async fn publish(&self, event: DomainEvent) -> Vec<EventHandlerError> {
        self.events_published.fetch_add(1, Ordering::Relaxed);

        let matching: Vec<Subscription> = {
            let subscriptions = self.subscriptions.read();
            subscriptions
                .get(&event.event_type)
                .cloned()
                .unwrap_or_default()
        };

        if matching.is_empty() {
            debug!(
                event_type = %event.event_type,
                event_id = %event.event_id,
                "No subscribers for event"
            );
            return Vec::new();
        }

        debug!(
            event_type = %event.event_type,
            event_id = %event.event_id,
            handler_count = matching.len(),
            "Publishing domain event"
        );

        let handler_count = matching.len();
        let futures: Vec<_> = matching
            .into_iter()
            .map(|subscription| {
                let event = event.clone();
                async move {
                    let _guard = subscription.in_flight.lock().await;
                    (subscription.handler)(event).await.err()
                }
            })
            .collect();

        let errors: Vec<EventHandlerError> =
            join_all(futures).await.into_iter().flatten().collect();

        self.handler_dispatches
            .fetch_add(handler_count as u64, Ordering::Relaxed);
        self.handler_errors
            .fetch_add(errors.len() as u64, Ordering::Relaxed);

        for error in &errors {
            warn!(
                event_type = %event.event_type,
                event_id = %event.event_id,
                error = %error,
                "Event handler failed (isolated from siblings)"
            );
        }

        errors
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().values().map(Vec::len).sum()
    }

    pub fn get_statistics(&self) -> EventBusStats {
        EventBusStats {
            events_published: self.events_published.load(Ordering::Relaxed),
            handler_dispatches: self.handler_dispatches.load(Ordering::Relaxed),
            handler_errors: self.handler_errors.load(Ordering::Relaxed),
            subscriptions: self.subscription_count() as u64,
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
