//! # grasp_event - Typed Event Dispatch
//!
//! The interaction core never broadcasts into a global bus. Each owner holds
//! an [`EventDispatcher`] for its own event type and hands a shared
//! reference to whatever produces events during a frame:
//! - Publishing takes `&self` and only enqueues
//! - [`EventDispatcher::process`] delivers the queue to subscribers, higher
//!   priority first, emission order within a priority
//! - [`EventDispatcher::drain`] pulls the queue without delivering, for
//!   callers that poll instead of subscribing

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicU64, Ordering};

/// Event priority
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low = 0,
    #[default]
    Normal = 1,
    High = 2,
    Critical = 3,
}

/// Event handler function type
pub type EventHandler<E> = Box<dyn Fn(&E) + Send + Sync>;

/// Subscriber ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

struct Envelope<E> {
    event: E,
    priority: Priority,
    sequence: u64,
}

/// Queue plus subscriber list for one event type
pub struct EventDispatcher<E> {
    sender: Sender<Envelope<E>>,
    receiver: Receiver<Envelope<E>>,
    /// Sorted by priority, highest first
    handlers: Vec<(SubscriberId, Priority, EventHandler<E>)>,
    next_subscriber_id: u64,
    sequence: AtomicU64,
}

impl<E> EventDispatcher<E> {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            handlers: Vec::new(),
            next_subscriber_id: 1,
            sequence: AtomicU64::new(0),
        }
    }

    /// Publish an event at normal priority
    pub fn publish(&self, event: E) {
        self.publish_with_priority(event, Priority::Normal);
    }

    pub fn publish_with_priority(&self, event: E, priority: Priority) {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        // The receiver lives as long as `self`, so the send cannot fail.
        let _ = self.sender.send(Envelope {
            event,
            priority,
            sequence,
        });
    }

    pub fn subscribe<F>(&mut self, handler: F) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.subscribe_with_priority(handler, Priority::Normal)
    }

    pub fn subscribe_with_priority<F>(&mut self, handler: F, priority: Priority) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriberId(self.next_subscriber_id);
        self.next_subscriber_id += 1;

        self.handlers.push((id, priority, Box::new(handler)));
        // Stable: subscribers of equal priority keep registration order
        self.handlers.sort_by(|a, b| b.1.cmp(&a.1));

        id
    }

    /// Remove a subscriber; returns whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sub_id, _, _)| *sub_id != id);
        before != self.handlers.len()
    }

    /// Deliver every pending event to every subscriber.
    ///
    /// Returns the delivered events in delivery order.
    pub fn process(&mut self) -> Vec<E> {
        let events = self.drain();
        for event in &events {
            for (_, _, handler) in &self.handlers {
                handler(event);
            }
        }
        if !events.is_empty() {
            log::trace!("delivered {} events to {} subscribers", events.len(), self.handlers.len());
        }
        events
    }

    /// Take every pending event without delivering it
    pub fn drain(&self) -> Vec<E> {
        let mut envelopes: Vec<Envelope<E>> = self.receiver.try_iter().collect();
        envelopes.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.sequence.cmp(&b.sequence)));
        envelopes.into_iter().map(|envelope| envelope.event).collect()
    }

    /// Drop every pending event
    pub fn clear(&self) {
        while self.receiver.try_recv().is_ok() {}
    }

    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.receiver.is_empty()
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}

impl<E> Default for EventDispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Prelude
pub mod prelude {
    pub use crate::{EventDispatcher, EventHandler, Priority, SubscriberId};
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicU32;
    use std::sync::Arc;

    #[derive(Debug, PartialEq)]
    struct TestEvent(i32);

    #[test]
    fn test_subscriber_receives_event() {
        let mut dispatcher = EventDispatcher::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        dispatcher.subscribe(move |_: &TestEvent| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        dispatcher.publish(TestEvent(42));
        let delivered = dispatcher.process();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(delivered, vec![TestEvent(42)]);
        assert!(!dispatcher.has_pending());
    }

    #[test]
    fn test_drain_keeps_emission_order() {
        let dispatcher = EventDispatcher::new();
        dispatcher.publish(TestEvent(1));
        dispatcher.publish(TestEvent(2));
        dispatcher.publish(TestEvent(3));

        assert_eq!(dispatcher.pending_count(), 3);
        let events = dispatcher.drain();
        assert_eq!(events, vec![TestEvent(1), TestEvent(2), TestEvent(3)]);
    }

    #[test]
    fn test_event_priority_orders_queue() {
        let dispatcher = EventDispatcher::new();
        dispatcher.publish(TestEvent(1));
        dispatcher.publish_with_priority(TestEvent(2), Priority::High);
        dispatcher.publish(TestEvent(3));

        assert_eq!(dispatcher.drain(), vec![TestEvent(2), TestEvent(1), TestEvent(3)]);
    }

    #[test]
    fn test_subscriber_priority() {
        let mut dispatcher = EventDispatcher::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        let order1 = order.clone();
        let order2 = order.clone();

        dispatcher.subscribe_with_priority(
            move |e: &TestEvent| order1.lock().push(("low", e.0)),
            Priority::Low,
        );
        dispatcher.subscribe_with_priority(
            move |e: &TestEvent| order2.lock().push(("high", e.0)),
            Priority::High,
        );

        dispatcher.publish(TestEvent(42));
        dispatcher.process();

        let received = order.lock();
        assert_eq!(received[0], ("high", 42));
        assert_eq!(received[1], ("low", 42));
    }

    #[test]
    fn test_unsubscribe() {
        let mut dispatcher: EventDispatcher<TestEvent> = EventDispatcher::new();
        let id = dispatcher.subscribe(|_| {});
        assert!(dispatcher.unsubscribe(id));
        assert!(!dispatcher.unsubscribe(id));
        assert_eq!(dispatcher.subscriber_count(), 0);
    }
}
