#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_fields_in_debug)]

//! RLK ECS - sparse-set Entity Component System for roguelike game loops.
//!
//! # Key Concepts
//!
//! - **Entity**: A generational identifier; never handed out twice
//! - **Component**: Plain data attached to entities (e.g., Position, Renderable)
//! - **Store**: One sparse set per component type, keyed by entity
//! - **Resource**: A world-level singleton (tile map, visibility grids, camera)
//!
//! # Access Patterns
//!
//! Lookups return `Option`s instead of nullable pointers:
//! - `get<T>()` / `get_mut<T>()` - Borrow a component if present
//! - `insert<T>()` - Attach or overwrite a component
//! - `remove<T>()` - Detach and return a component
//! - `query<(A, B)>()` / `each_mut<(A, B)>()` - Iterate entities holding all types
//!
//! ```ignore
//! let mut world = World::new();
//! let player = world.spawn().insert(Position { x: 5, y: 5 }).id();
//!
//! if let Some(pos) = world.get_mut::<Position>(player) {
//!     pos.x += 1;
//! }
//!
//! world.destroy(player);
//! assert!(world.get::<Position>(player).is_none());
//! ```

mod component;
mod entity;
mod error;
mod query;
mod resource;
mod storage;
mod world;

pub use component::{Component, ComponentId, ComponentInfo, ComponentRegistry};
pub use entity::{Entity, EntityAllocator, EntityIndex, Generation};
pub use error::{EcsError, EcsResult};
pub use query::{Query, QueryMut};
pub use resource::{Resource, Resources};
pub use storage::{ComponentStore, ErasedStore};
pub use world::{EntityMut, EntityRef, World};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Component, EcsError, Entity, EntityMut, EntityRef, World};
}
