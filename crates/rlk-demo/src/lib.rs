//! Field-of-view exploration demo.
//!
//! A player walks a walled map while the visibility sweep reveals what it
//! can see. Each frame runs four systems in order:
//!
//! ```text
//! player ──PlayerMoved──▶ visibility ──▶ camera ──▶ actor_render
//! ```
//!
//! The console and input are supplied by the host through the [`Console`]
//! and [`InputSource`] traits, so the whole loop runs headless.

pub mod camera;
pub mod components;
pub mod config;
pub mod console;
mod error;
mod game;
pub mod input;
pub mod map;
pub mod systems;

pub use camera::Camera;
pub use components::{Player, PlayerMoved, Position, Renderable, Viewshed};
pub use config::{ConfigError, DemoConfig};
pub use console::{BufferConsole, Color, Console, Glyph};
pub use error::DemoError;
pub use game::{Game, scheduler};
pub use input::{InputSource, Intent, ScriptedInput, UnknownKey};
pub use map::{MapError, Tile, TileMap};
pub use systems::{ActorRenderSystem, CameraSystem, PlayerSystem, VisibilitySystem};
