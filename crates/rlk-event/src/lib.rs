//! RLK Event System
//!
//! One-shot, typed event queues for passing messages between systems.
//!
//! A system that changes something another system cares about sends an
//! event; the interested system drains its queue during its own update.
//! Each event is delivered once.
//!
//! # Example
//!
//! ```ignore
//! // Player system, after a successful move
//! world.send_event(PlayerMoved { x: 10, y: 4 });
//!
//! // Visibility system, later in the same frame
//! if world.drain_events::<PlayerMoved>().count() > 0 {
//!     recompute_fov(world);
//! }
//! ```

mod event;
mod queue;
mod world_ext;

use rlk_ecs::World;

pub use event::Event;
pub use queue::{EventQueues, Events};
pub use world_ext::EventWorldExt;

/// Insert the event queues resource into `world`.
pub fn init(world: &mut World) {
    world.init_events();
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Event, EventQueues, EventWorldExt, Events};
}
