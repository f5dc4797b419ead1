//! Per-tile visibility state for one map.

use crate::Grid;

/// Tiles in view this frame, and tiles ever seen.
///
/// `revealed` only grows: every tile marked visible is also marked revealed,
/// and clearing the visible set leaves revealed tiles alone.
#[derive(Debug, Clone)]
pub struct VisibilityMap {
    visible: Grid<bool>,
    revealed: Grid<bool>,
}

impl VisibilityMap {
    /// Create a map of `width x height` unseen tiles.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            visible: Grid::new(width, height),
            revealed: Grid::new(width, height),
        }
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.visible.width()
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.visible.height()
    }

    /// Forget what is in view, keeping what has been revealed.
    pub fn clear_visible(&mut self) {
        self.visible.fill(false);
    }

    /// Mark `(x, y)` visible and revealed.
    ///
    /// Coordinates outside the map are ignored and return `false`.
    pub fn reveal(&mut self, x: i32, y: i32) -> bool {
        self.visible.set(x, y, true) && self.revealed.set(x, y, true)
    }

    #[must_use]
    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        self.visible.get(x, y).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn is_revealed(&self, x: i32, y: i32) -> bool {
        self.revealed.get(x, y).copied().unwrap_or(false)
    }

    /// Number of tiles currently in view.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|(_, _, v)| **v).count()
    }

    /// Number of tiles ever seen.
    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.revealed.iter().filter(|(_, _, v)| **v).count()
    }

    /// Coordinates of the tiles currently in view.
    pub fn visible_tiles(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.visible
            .iter()
            .filter(|(_, _, v)| **v)
            .map(|(x, y, _)| (x, y))
    }
}
