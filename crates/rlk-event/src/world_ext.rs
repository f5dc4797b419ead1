//! World extension for sending and draining events.
//!
//! The queues live in an [`EventQueues`] resource on the world, created on
//! first use.

use rlk_ecs::World;

use crate::Event;
use crate::queue::EventQueues;

/// Extension trait adding event methods to [`World`].
pub trait EventWorldExt {
    /// Insert the event queues resource if it is missing.
    fn init_events(&mut self);

    /// Queue an event for a later reader.
    fn send_event<E: Event>(&mut self, event: E);

    /// Remove and return every pending event of type `E`, oldest first.
    fn drain_events<E: Event>(&mut self) -> impl Iterator<Item = E> + '_;

    /// Number of pending events of type `E`.
    fn pending_events<E: Event>(&self) -> usize;
}

impl EventWorldExt for World {
    fn init_events(&mut self) {
        self.resource_or_insert_with(EventQueues::new);
    }

    fn send_event<E: Event>(&mut self, event: E) {
        self.resource_or_insert_with(EventQueues::new).send(event);
    }

    fn drain_events<E: Event>(&mut self) -> impl Iterator<Item = E> + '_ {
        self.resource_or_insert_with(EventQueues::new).drain::<E>()
    }

    fn pending_events<E: Event>(&self) -> usize {
        self.resource::<EventQueues>()
            .map_or(0, EventQueues::pending::<E>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct PlayerMoved {
        x: i32,
        y: i32,
    }

    #[test]
    fn test_send_then_drain_through_world() {
        let mut world = World::new();
        assert_eq!(world.pending_events::<PlayerMoved>(), 0);

        world.send_event(PlayerMoved { x: 1, y: 2 });
        world.send_event(PlayerMoved { x: 1, y: 3 });
        assert_eq!(world.pending_events::<PlayerMoved>(), 2);

        let moves: Vec<PlayerMoved> = world.drain_events::<PlayerMoved>().collect();
        assert_eq!(moves.last(), Some(&PlayerMoved { x: 1, y: 3 }));
        assert_eq!(world.pending_events::<PlayerMoved>(), 0);
    }

    #[test]
    fn test_init_events_is_idempotent() {
        let mut world = World::new();
        world.send_event(7u8);
        world.init_events();

        assert_eq!(world.pending_events::<u8>(), 1);
    }
}
