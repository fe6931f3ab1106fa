//! # Event Subscriber
//!
//! Defines the subscription side of the event hub.

use crate::events::{EventFilter, ProtocolEvent};
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::Stream;
use tracing::debug;

/// Ways receiving from a subscription can fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The event hub was closed.
    #[error("Event hub closed")]
    Closed,
}

/// A live attachment to the event hub.
///
/// Filtering happens on the receiving side; dropping the handle
/// unregisters it from the hub's bookkeeping.
pub struct Subscription {
    /// Raw channel end delivering every published event.
    receiver: broadcast::Receiver<ProtocolEvent>,

    /// Which of those events this subscriber wants.
    filter: EventFilter,

    /// Shared counter map, decremented on drop.
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,

    /// Key into the counter map.
    topic_key: String,
}

impl Subscription {
    /// Assemble a handle; only the hub constructs these.
    pub(crate) fn new(
        receiver: broadcast::Receiver<ProtocolEvent>,
        filter: EventFilter,
        subscriptions: Arc<RwLock<HashMap<String, usize>>>,
        topic_key: String,
    ) -> Self {
        Self {
            receiver,
            filter,
            subscriptions,
            topic_key,
        }
    }

    /// Wait for the next event that matches the filter.
    ///
    /// Returns `None` once the hub has been dropped. A lagged subscriber
    /// skips the overwritten events and keeps receiving.
    pub async fn recv(&mut self) -> Option<ProtocolEvent> {
        loop {
            let event = match self.receiver.recv().await {
                Ok(e) => e,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Subscriber lagged, events were overwritten");
                    continue;
                }
            };

            if self.filter.matches(&event) {
                return Some(event);
            }
            // Filtered out; keep waiting.
        }
    }

    /// Receive the next matching event without blocking.
    ///
    /// `Ok(None)` means nothing matching is buffered right now;
    /// [`SubscriptionError::Closed`] means the hub is gone.
    pub fn try_recv(&mut self) -> Result<Option<ProtocolEvent>, SubscriptionError> {
        loop {
            let event = match self.receiver.try_recv() {
                Ok(e) => e,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };

            if self.filter.matches(&event) {
                return Ok(Some(event));
            }
            // Filtered out; look at the next buffered event.
        }
    }

    /// Drain every matching event that is already buffered.
    ///
    /// Useful after a deterministic run: the runtime has settled, so all
    /// events of interest are in the channel.
    pub fn drain(&mut self) -> Vec<ProtocolEvent> {
        let mut drained = Vec::new();
        while let Ok(Some(event)) = self.try_recv() {
            drained.push(event);
        }
        drained
    }

    /// The filter this subscription applies.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Ok(mut subs) = self.subscriptions.write() else {
            return;
        };
        let Some(count) = subs.get_mut(&self.topic_key) else {
            debug!(topic = %self.topic_key, "Subscription dropped");
            return;
        };

        *count = count.saturating_sub(1);
        if *count == 0 {
            subs.remove(&self.topic_key);
        }
        debug!(topic = %self.topic_key, "Subscription dropped");
    }
}

/// A [`Subscription`] wrapped as a `tokio_stream::Stream`, for use with
/// stream combinators.
pub struct EventStream {
    subscription: Subscription,
}

impl EventStream {
    /// Wrap a subscription.
    #[must_use]
    pub fn new(subscription: Subscription) -> Self {
        Self { subscription }
    }

    /// The filter the wrapped subscription applies.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        self.subscription.filter()
    }
}

impl Stream for EventStream {
    type Item = ProtocolEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.subscription.try_recv() {
            Ok(Some(event)) => Poll::Ready(Some(event)),
            Ok(None) => {
                // Nothing buffered. Re-wake immediately so the stream keeps
                // polling instead of parking with no registered notifier.
                cx.waker().wake_by_ref();
                Poll::Pending
            }
            Err(SubscriptionError::Closed) => Poll::Ready(None),
        }
    }
}
