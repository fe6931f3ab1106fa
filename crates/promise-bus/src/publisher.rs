//! # Event Publisher
//!
//! Defines the publishing side of the event hub.

use crate::events::{EventFilter, ProtocolEvent};
use crate::subscriber::{EventStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// The publishing side of the event hub.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an event and return how many subscribers it reached.
    async fn publish(&self, event: ProtocolEvent) -> usize;

    /// Lifetime count of published events, delivered or not.
    fn events_published(&self) -> u64;
}

/// The subscribing side of the event hub.
pub trait EventSubscriber: Send + Sync {
    /// Attach a filtered subscription.
    fn subscribe(&self, filter: EventFilter) -> Subscription;
}

/// In-memory implementation of the event hub.
///
/// Uses `tokio::sync::broadcast` for multi-producer, multi-consumer
/// semantics. Events published with no subscribers are dropped; the hub
/// is observability, not a durable queue.
pub struct InMemoryEventBus {
    /// Broadcast end every subscription hangs off.
    sender: broadcast::Sender<ProtocolEvent>,

    /// Live subscription counts, keyed by topic list.
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,

    /// Lifetime publish counter.
    events_published: AtomicU64,

    /// Per-subscriber buffer size.
    capacity: usize,
}

impl InMemoryEventBus {
    /// Create a hub with the default buffer capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a hub buffering up to `capacity` events per subscriber.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Attach a subscription that sees events matching `filter`.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        let receiver = self.sender.subscribe();
        let topic_key = format!("{:?}", filter.topics);

        if let Ok(mut subs) = self.subscriptions.write() {
            *subs.entry(topic_key.clone()).or_insert(0) += 1;
        }

        debug!(topics = ?filter.topics, "New subscription created");

        Subscription::new(receiver, filter, self.subscriptions.clone(), topic_key)
    }

    /// Subscribe and wrap the result as an [`EventStream`].
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        EventStream::new(self.subscribe(filter))
    }

    /// Number of attached subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Per-subscriber buffer size chosen at construction.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: ProtocolEvent) -> usize {
        let topic = event.topic();

        // Counted whether or not anyone is listening.
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receiver_count) => {
                debug!(topic = ?topic, receivers = receiver_count, "Event published");
                receiver_count
            }
            Err(e) => {
                warn!(topic = ?topic, error = %e, "Event dropped (no receivers)");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, filter: EventFilter) -> Subscription {
        InMemoryEventBus::subscribe(self, filter)
    }
}
