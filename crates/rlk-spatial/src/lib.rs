//! RLK Spatial
//!
//! Tile grids and line-of-sight for 2D roguelike maps.
//!
//! The visibility sweep is purely geometric: it knows nothing about map
//! bounds or tile storage. The caller supplies an opacity predicate and a
//! visit callback, and decides what out-of-bounds means.
//!
//! ```ignore
//! let mut visible = VisibilityMap::new(map.width(), map.height());
//! visibility_sweep((px, py), 8, |(x, y)| map.is_opaque(x, y), |(x, y)| {
//!     visible.reveal(x, y);
//! });
//! ```

pub mod fov;
pub mod grid;
pub mod location;
pub mod visibility;

pub use fov::{FieldOfView, MAX_RADIUS, visibility_sweep};
pub use grid::Grid;
pub use location::Location;
pub use visibility::VisibilityMap;
