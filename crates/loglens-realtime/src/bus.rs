//! Event bus with per-subscriber bounded delivery.

use std::collections::HashMap;
use std::sync::RwLock;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use loglens_core::events::ProcessingEvent;

use crate::subscriber::{SubscriberHandle, SubscriberId};

/// A live subscription: the id to unsubscribe with and the receiving
/// end of the event stream.
#[derive(Debug)]
pub struct Subscription {
    pub id: SubscriberId,
    pub receiver: mpsc::Receiver<ProcessingEvent>,
}

/// Fan-out bus for processing events.
///
/// Events are delivered per subscriber in publish order. A subscriber
/// whose buffer is full or whose receiver is gone is removed; late
/// subscribers see only events published after they joined.
#[derive(Debug)]
pub struct EventBus {
    subscribers: RwLock<HashMap<SubscriberId, SubscriberHandle>>,
    buffer_size: usize,
}

impl EventBus {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            buffer_size: buffer_size.max(1),
        }
    }

    /// Register a new subscriber.
    pub fn subscribe(&self) -> Subscription {
        let (sender, receiver) = mpsc::channel(self.buffer_size);
        let handle = SubscriberHandle::new(sender);
        let id = handle.id;

        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner());
        subscribers.insert(id, handle);
        debug!(subscriber_id = %id, total = subscribers.len(), "Subscriber joined");

        Subscription { id, receiver }
    }

    /// Remove a subscriber. Safe to call for an already removed id.
    pub fn unsubscribe(&self, id: SubscriberId) {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner());
        if subscribers.remove(&id).is_some() {
            debug!(subscriber_id = %id, total = subscribers.len(), "Subscriber left");
        }
    }

    /// Deliver an event to every live subscriber.
    ///
    /// Uses `try_send`: a full buffer means the subscriber is not
    /// keeping up, and it is dropped rather than stalling the bus.
    pub fn publish(&self, event: &ProcessingEvent) {
        let stale: Vec<SubscriberId> = {
            let subscribers = self
                .subscribers
                .read()
                .unwrap_or_else(|e| e.into_inner());
            subscribers
                .values()
                .filter(|handle| handle.sender.try_send(event.clone()).is_err())
                .map(|handle| handle.id)
                .collect()
        };

        if !stale.is_empty() {
            let mut subscribers = self
                .subscribers
                .write()
                .unwrap_or_else(|e| e.into_inner());
            for id in stale {
                if subscribers.remove(&id).is_some() {
                    warn!(subscriber_id = %id, "Dropped slow or closed subscriber");
                }
            }
        }
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loglens_core::events::EventKind;

    #[tokio::test]
    async fn delivers_events_in_publish_order() {
        let bus = EventBus::new(16);
        let mut sub = bus.subscribe();

        for i in 0..5 {
            bus.publish(&ProcessingEvent::info(format!("event {i}")));
        }

        for i in 0..5 {
            let event = sub.receiver.recv().await.unwrap();
            assert_eq!(event.message, format!("event {i}"));
            assert_eq!(event.kind, EventKind::Info);
        }
    }

    #[tokio::test]
    async fn every_subscriber_gets_every_event() {
        let bus = EventBus::new(16);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.publish(&ProcessingEvent::info("shared"));

        assert_eq!(a.receiver.recv().await.unwrap().message, "shared");
        assert_eq!(b.receiver.recv().await.unwrap().message, "shared");
    }

    #[tokio::test]
    async fn slow_subscriber_is_dropped_without_stalling_others() {
        let bus = EventBus::new(2);
        let slow = bus.subscribe();
        let mut fast = bus.subscribe();

        // The slow subscriber never drains; its buffer fills after two
        // events and the third drops it. The fast one keeps up.
        for i in 0..3 {
            bus.publish(&ProcessingEvent::info(format!("event {i}")));
            assert_eq!(
                fast.receiver.recv().await.unwrap().message,
                format!("event {i}")
            );
        }

        assert_eq!(bus.subscriber_count(), 1);
        drop(slow);
    }

    #[tokio::test]
    async fn late_subscribers_see_no_replay() {
        let bus = EventBus::new(16);
        bus.publish(&ProcessingEvent::info("before"));

        let mut sub = bus.subscribe();
        bus.publish(&ProcessingEvent::info("after"));

        assert_eq!(sub.receiver.recv().await.unwrap().message, "after");
        assert!(sub.receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn unsubscribe_stops_delivery() {
        let bus = EventBus::new(16);
        let sub = bus.subscribe();
        bus.unsubscribe(sub.id);
        bus.unsubscribe(sub.id);

        assert_eq!(bus.subscriber_count(), 0);
        bus.publish(&ProcessingEvent::info("gone"));
    }
}
