//! One-shot event queues.

use std::{
    any::{Any, TypeId},
    collections::VecDeque,
};

use rustc_hash::FxHashMap;

use crate::Event;

/// FIFO queue of events of a single type.
///
/// Every event is delivered at most once: draining removes it.
pub struct Events<E> {
    queue: VecDeque<E>,
    /// Total events ever sent, for diagnostics.
    sent: u64,
}

impl<E> Default for Events<E> {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            sent: 0,
        }
    }
}

impl<E> Events<E> {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event.
    pub fn send(&mut self, event: E) {
        self.sent += 1;
        self.queue.push_back(event);
    }

    /// Pop the oldest pending event.
    pub fn pop(&mut self) -> Option<E> {
        self.queue.pop_front()
    }

    /// Remove and return every pending event, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = E> + '_ {
        self.queue.drain(..)
    }

    /// Peek at pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.queue.iter()
    }

    /// Check if no events are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Total number of events ever sent through this queue.
    #[must_use]
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Drop all pending events.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

impl<E> core::fmt::Debug for Events<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Events")
            .field("type", &std::any::type_name::<E>())
            .field("pending", &self.queue.len())
            .field("sent", &self.sent)
            .finish()
    }
}

/// One [`Events`] queue per event type.
#[derive(Default)]
pub struct EventQueues {
    queues: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl EventQueues {
    /// Create an empty set of queues.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The queue for `E`, created on first use.
    ///
    /// # Panics
    ///
    /// Never in practice: queues are keyed by their own `TypeId`.
    pub fn queue<E: Event>(&mut self) -> &mut Events<E> {
        self.queues
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(Events::<E>::new()))
            .downcast_mut()
            .expect("event queue stored under its own TypeId")
    }

    /// The queue for `E`, if any event of that type was ever sent.
    #[must_use]
    pub fn get<E: Event>(&self) -> Option<&Events<E>> {
        self.queues.get(&TypeId::of::<E>())?.downcast_ref()
    }

    /// Queue an event.
    pub fn send<E: Event>(&mut self, event: E) {
        tracing::trace!(event = std::any::type_name::<E>(), "event sent");
        self.queue::<E>().send(event);
    }

    /// Remove and return every pending event of type `E`.
    pub fn drain<E: Event>(&mut self) -> impl Iterator<Item = E> + '_ {
        self.queue::<E>().drain()
    }

    /// Number of pending events of type `E`.
    #[must_use]
    pub fn pending<E: Event>(&self) -> usize {
        self.get::<E>().map_or(0, Events::len)
    }

    /// Number of distinct event types seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queues.len()
    }

    /// Check if no event type was ever used.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }
}

impl core::fmt::Debug for EventQueues {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventQueues")
            .field("types", &self.queues.len())
            .finish()
    }
}
