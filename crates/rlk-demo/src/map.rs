//! The tile map the demo explores.

use rand::Rng;
use rlk_spatial::Grid;
use thiserror::Error;

/// A single map tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tile {
    #[default]
    Floor,
    Wall,
}

impl Tile {
    /// Character drawn for this tile.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Floor => '.',
            Self::Wall => '#',
        }
    }

    #[must_use]
    pub const fn is_opaque(self) -> bool {
        matches!(self, Self::Wall)
    }
}

/// Why an ASCII map could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map has no rows")]
    Empty,

    #[error("row {row} is {found} tiles wide, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown tile {ch:?} at ({x}, {y})")]
    UnknownTile { ch: char, x: usize, y: usize },

    #[error("second start tile at ({x}, {y})")]
    DuplicateStart { x: usize, y: usize },
}

/// A rectangular map of floors and walls plus the player's start point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    tiles: Grid<Tile>,
    start: (i32, i32),
}

impl TileMap {
    /// An open floor ringed by walls, starting in the middle.
    #[must_use]
    pub fn bordered(width: u32, height: u32) -> Self {
        let mut tiles = Grid::new(width, height);
        let (w, h) = (width as i32, height as i32);
        for x in 0..w {
            tiles.set(x, 0, Tile::Wall);
            tiles.set(x, h - 1, Tile::Wall);
        }
        for y in 0..h {
            tiles.set(0, y, Tile::Wall);
            tiles.set(w - 1, y, Tile::Wall);
        }

        Self {
            tiles,
            start: (w / 2, h / 2),
        }
    }

    /// A bordered map with roughly one interior tile in `one_in` turned to
    /// wall. The start tile is always left open.
    pub fn with_debris(width: u32, height: u32, rng: &mut impl Rng, one_in: u32) -> Self {
        let mut map = Self::bordered(width, height);
        let one_in = one_in.max(1);

        for y in 1..height as i32 - 1 {
            for x in 1..width as i32 - 1 {
                if (x, y) != map.start && rng.gen_ratio(1, one_in) {
                    map.tiles.set(x, y, Tile::Wall);
                }
            }
        }

        tracing::debug!(width, height, walls = map.wall_count(), "generated map");
        map
    }

    /// Parse a map from text: `#` is a wall, `.` a floor, and `@` a floor
    /// where the player starts.
    ///
    /// Blank lines and surrounding whitespace are ignored. Without an `@` the
    /// player starts in the middle.
    pub fn from_ascii(text: &str) -> Result<Self, MapError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let width = rows.first().ok_or(MapError::Empty)?.chars().count();

        let mut tiles = Grid::new(width as u32, rows.len() as u32);
        let mut start = None;

        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(MapError::Ragged {
                    row: y,
                    expected: width,
                    found,
                });
            }

            for (x, ch) in row.chars().enumerate() {
                let tile = match ch {
                    '#' => Tile::Wall,
                    '.' => Tile::Floor,
                    '@' => {
                        if start.replace((x as i32, y as i32)).is_some() {
                            return Err(MapError::DuplicateStart { x, y });
                        }
                        Tile::Floor
                    }
                    _ => return Err(MapError::UnknownTile { ch, x, y }),
                };
                tiles.set(x as i32, y as i32, tile);
            }
        }

        let start = start.unwrap_or((width as i32 / 2, rows.len() as i32 / 2));
        Ok(Self { tiles, start })
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.tiles.width()
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.tiles.height()
    }

    /// Where the player spawns.
    #[must_use]
    pub const fn start(&self) -> (i32, i32) {
        self.start
    }

    #[must_use]
    pub fn tile(&self, x: i32, y: i32) -> Option<Tile> {
        self.tiles.get(x, y).copied()
    }

    /// Overwrite a tile. Out of bounds writes are ignored.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) -> bool {
        self.tiles.set(x, y, tile)
    }

    /// Whether `(x, y)` blocks sight. Anything off the map does.
    #[must_use]
    pub fn is_opaque(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).is_none_or(Tile::is_opaque)
    }

    /// Whether an entity may stand on `(x, y)`.
    #[must_use]
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.tile(x, y) == Some(Tile::Floor)
    }

    /// Nearest on-map coordinate to `(x, y)`.
    #[must_use]
    pub fn clamp(&self, x: i32, y: i32) -> (i32, i32) {
        self.tiles.clamp(x, y)
    }

    /// Number of wall tiles.
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.tiles
            .iter()
            .filter(|(_, _, tile)| tile.is_opaque())
            .count()
    }
}
