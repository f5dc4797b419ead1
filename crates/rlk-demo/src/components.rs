//! Components and events used by the demo systems.

use rlk_ecs::Entity;
use rlk_spatial::Location;

use crate::console::{Color, Glyph};

/// Tile coordinate of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Location for Position {
    fn x(&self) -> i32 {
        self.x
    }

    fn y(&self) -> i32 {
        self.y
    }

    fn at(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// How an entity is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderable {
    pub glyph: char,
    pub fg: Color,
    pub bg: Color,
}

impl Renderable {
    /// A glyph in `fg` on black.
    #[must_use]
    pub const fn new(glyph: char, fg: Color) -> Self {
        Self {
            glyph,
            fg,
            bg: Color::BLACK,
        }
    }

    #[must_use]
    pub const fn to_glyph(self) -> Glyph {
        Glyph::new(self.glyph, self.fg, self.bg)
    }
}

/// Marks the entity driven by player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Player;

/// Sight range of an entity that reveals the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewshed {
    pub radius: u32,
}

/// Sent by the player system after a successful step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerMoved {
    pub entity: Entity,
    pub from: Position,
    pub to: Position,
}
