//! Field of view by symmetric shadowcasting.
//!
//! The area around the origin is split into four quadrants (north, east,
//! south, west). Each quadrant is scanned row by row moving away from the
//! origin, tracking the wedge of light between a start and an end slope.
//! Opaque tiles narrow the wedge for the rows behind them.
//!
//! ```text
//!        \ N /
//!         \ /
//!      W   @   E
//!         / \
//!        / S \
//! ```
//!
//! Rules:
//!
//! - Distance is Chebyshev: a radius of `r` covers the `(2r + 1)^2` square
//!   around the origin.
//! - A floor tile is visible when its center lies inside the wedge. An opaque
//!   tile is visible when any part of it is lit, so walls bounding a room are
//!   drawn.
//! - Light does not squeeze between two diagonally touching opaque tiles. A
//!   floor tile whose two neighbors toward the origin (the one behind it in
//!   the row before, and the one beside it in its own row) are both opaque is
//!   reachable only through their shared corner. It is hidden and casts a
//!   shadow like a wall. An opaque tile in that spot is still drawn, so room
//!   corners show up.
//! - Slopes are exact fractions, so the result does not depend on floating
//!   point rounding and is the same under rotation and reflection.

use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::Location;

/// Largest radius a sweep will scan. Larger radii are clamped.
pub const MAX_RADIUS: u32 = 1024;

/// Reusable field-of-view calculator.
///
/// Holds scratch buffers so repeated sweeps do not allocate.
///
/// # Example
///
/// ```ignore
/// let mut fov = FieldOfView::new();
/// visibility.clear_visible();
/// fov.compute(player_pos, 8, |p| map.is_opaque(p.x, p.y), |p| {
///     visibility.reveal(p.x, p.y);
/// });
/// ```
#[derive(Default)]
pub struct FieldOfView {
    visited: Visited,
    rows: SmallVec<[Row; 16]>,
}

impl FieldOfView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report every tile within `radius` of `origin` that the origin can see.
    ///
    /// `on_visible` is called exactly once per visible tile, starting with the
    /// origin itself. `is_opaque` may be asked about the same tile more than
    /// once. Tiles whose coordinates would overflow `i32` are treated as
    /// opaque and never reported.
    ///
    /// Returns the number of tiles reported.
    pub fn compute<L, O, V>(&mut self, origin: L, radius: u32, mut is_opaque: O, mut on_visible: V) -> usize
    where
        L: Location,
        O: FnMut(L) -> bool,
        V: FnMut(L),
    {
        if radius > MAX_RADIUS {
            warn!(radius, max = MAX_RADIUS, "visibility radius clamped");
        }
        let radius = radius.min(MAX_RADIUS) as i32;

        self.visited.reset(radius);
        self.visited.insert(0, 0);
        on_visible(origin);

        let mut count = 1;
        for quadrant in Quadrant::ALL {
            count += self.scan(origin, radius, quadrant, &mut is_opaque, &mut on_visible);
        }

        trace!(x = origin.x(), y = origin.y(), radius, visible = count, "visibility sweep");
        count
    }

    fn scan<L, O, V>(
        &mut self,
        origin: L,
        radius: i32,
        quadrant: Quadrant,
        is_opaque: &mut O,
        on_visible: &mut V,
    ) -> usize
    where
        L: Location,
        O: FnMut(L) -> bool,
        V: FnMut(L),
    {
        let mut revealed = 0;

        self.rows.clear();
        self.rows.push(Row::first());

        while let Some(mut row) = self.rows.pop() {
            if row.depth > radius {
                continue;
            }

            let mut prev_opaque = None;
            for col in row.min_col()..=row.max_col() {
                let (dx, dy) = quadrant.offset(row.depth, col);
                let tile = translate(origin, dx, dy);
                let blocked = tile.is_none_or(&mut *is_opaque);
                let pinched = !blocked && is_pinched(origin, quadrant, row.depth, col, is_opaque);

                if let Some(tile) = tile {
                    let lit = blocked || (!pinched && row.is_symmetric(col));
                    if lit && self.visited.insert(dx, dy) {
                        on_visible(tile);
                        revealed += 1;
                    }
                }

                let opaque = blocked || pinched;

                match (prev_opaque, opaque) {
                    // Leaving a wall: light resumes at this tile's near edge
                    (Some(true), false) => row.start = Slope::edge(row.depth, col),
                    // Entering a wall: the floor run so far lights the next row
                    (Some(false), true) => self.rows.push(Row {
                        depth: row.depth + 1,
                        start: row.start,
                        end: Slope::edge(row.depth, col),
                    }),
                    _ => {}
                }
                prev_opaque = Some(opaque);
            }

            if prev_opaque == Some(false) {
                self.rows.push(row.next());
            }
        }

        revealed
    }
}

impl std::fmt::Debug for FieldOfView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldOfView")
            .field("radius", &self.visited.radius)
            .finish_non_exhaustive()
    }
}

/// Sweep once with a fresh [`FieldOfView`].
///
/// Prefer keeping a `FieldOfView` around when sweeping every frame.
pub fn visibility_sweep<L, O, V>(origin: L, radius: u32, is_opaque: O, on_visible: V) -> usize
where
    L: Location,
    O: FnMut(L) -> bool,
    V: FnMut(L),
{
    FieldOfView::new().compute(origin, radius, is_opaque, on_visible)
}

fn translate<L: Location>(origin: L, dx: i32, dy: i32) -> Option<L> {
    Some(L::at(origin.x().checked_add(dx)?, origin.y().checked_add(dy)?))
}

/// Whether both tiles between `(depth, col)` and the origin's side of it are
/// opaque, leaving only the diagonal corner between them.
///
/// The center column has no diagonal approach and is never pinched.
fn is_pinched<L, O>(origin: L, quadrant: Quadrant, depth: i32, col: i32, is_opaque: &mut O) -> bool
where
    L: Location,
    O: FnMut(L) -> bool,
{
    if col == 0 {
        return false;
    }
    let behind = quadrant.offset(depth - 1, col);
    let beside = quadrant.offset(depth, col - col.signum());
    [behind, beside]
        .into_iter()
        .all(|(dx, dy)| translate(origin, dx, dy).is_none_or(&mut *is_opaque))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quadrant {
    North,
    East,
    South,
    West,
}

impl Quadrant {
    const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Offset from the origin of column `col` in the row `depth` tiles out.
    const fn offset(self, depth: i32, col: i32) -> (i32, i32) {
        match self {
            Self::North => (col, -depth),
            Self::East => (depth, col),
            Self::South => (col, depth),
            Self::West => (-depth, col),
        }
    }
}

/// Exact fraction `num / den` with `den > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slope {
    num: i64,
    den: i64,
}

impl Slope {
    const LEFT: Self = Self { num: -1, den: 1 };
    const RIGHT: Self = Self { num: 1, den: 1 };

    /// Slope through the edge of `col` nearest the start of the row.
    const fn edge(depth: i32, col: i32) -> Self {
        Self {
            num: 2 * col as i64 - 1,
            den: 2 * depth as i64,
        }
    }
}

/// One row of a quadrant scan: the tiles `depth` steps from the origin that
/// fall between `start` and `end`.
#[derive(Debug, Clone, Copy)]
struct Row {
    depth: i32,
    start: Slope,
    end: Slope,
}

impl Row {
    const fn first() -> Self {
        Self {
            depth: 1,
            start: Slope::LEFT,
            end: Slope::RIGHT,
        }
    }

    const fn next(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }

    /// `depth * start`, rounded half up.
    fn min_col(&self) -> i32 {
        let Slope { num, den } = self.start;
        let twice = 2 * i64::from(self.depth) * num + den;
        twice.div_euclid(2 * den) as i32
    }

    /// `depth * end`, rounded half down.
    fn max_col(&self) -> i32 {
        let Slope { num, den } = self.end;
        let twice = 2 * i64::from(self.depth) * num - den;
        let floor_of_negated = (-twice).div_euclid(2 * den);
        (-floor_of_negated) as i32
    }

    /// Whether the center of `col` lies inside the wedge, edges included.
    fn is_symmetric(&self, col: i32) -> bool {
        let col = i64::from(col);
        let depth = i64::from(self.depth);
        col * self.start.den >= depth * self.start.num && col * self.end.den <= depth * self.end.num
    }
}

/// Bitmap over the `(2r + 1)^2` square around the origin.
#[derive(Default)]
struct Visited {
    words: Vec<u64>,
    side: usize,
    radius: i32,
}

impl Visited {
    fn reset(&mut self, radius: i32) {
        self.radius = radius;
        self.side = 2 * radius as usize + 1;
        self.words.clear();
        self.words.resize((self.side * self.side).div_ceil(64), 0);
    }

    /// Mark the tile at offset `(dx, dy)`. Returns `true` the first time.
    fn insert(&mut self, dx: i32, dy: i32) -> bool {
        let i = (dy + self.radius) as usize * self.side + (dx + self.radius) as usize;
        let bit = 1u64 << (i % 64);
        let word = &mut self.words[i / 64];
        let fresh = *word & bit == 0;
        *word |= bit;
        fresh
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    type Walls = BTreeSet<(i32, i32)>;

    fn sweep(origin: (i32, i32), radius: u32, walls: &Walls) -> BTreeSet<(i32, i32)> {
        let mut seen = BTreeSet::new();
        visibility_sweep(origin, radius, |p| walls.contains(&p), |p| {
            seen.insert(p);
        });
        seen
    }

    /// Deterministic wall layout around the origin, roughly `percent`% filled.
    fn scatter(seed: u64, extent: i32, percent: u64) -> Walls {
        let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let mut walls = Walls::new();
        for y in -extent..=extent {
            for x in -extent..=extent {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                if (x, y) != (0, 0) && (state >> 33) % 100 < percent {
                    walls.insert((x, y));
                }
            }
        }
        walls
    }

    fn rotate((x, y): (i32, i32)) -> (i32, i32) {
        (-y, x)
    }

    #[test]
    fn test_open_area_shows_full_square() {
        let seen = sweep((2, 2), 2, &Walls::new());

        assert_eq!(seen.len(), 25);
        for y in 0..5 {
            for x in 0..5 {
                assert!(seen.contains(&(x, y)), "({x},{y}) should be visible");
            }
        }
    }

    #[test]
    fn test_wall_occludes_tile_behind() {
        let walls = Walls::from([(2, 1)]);
        let seen = sweep((2, 2), 2, &walls);

        assert!(seen.contains(&(2, 1)), "the wall itself is lit");
        assert!(!seen.contains(&(2, 0)), "tile behind the wall is hidden");
        assert!(seen.contains(&(1, 0)));
        assert!(seen.contains(&(3, 0)));
        assert_eq!(seen.len(), 24);
    }

    #[test]
    fn test_pillar_shadow_widens_with_distance() {
        let walls = Walls::from([(0, -2)]);
        let seen = sweep((0, 0), 4, &walls);

        assert!(!seen.contains(&(0, -3)));
        assert!(!seen.contains(&(0, -4)));
        assert!(seen.contains(&(1, -4)));
        assert!(seen.contains(&(-1, -4)));
    }

    #[test]
    fn test_radius_zero_is_origin_only() {
        let seen = sweep((7, -3), 0, &Walls::new());
        assert_eq!(seen, BTreeSet::from([(7, -3)]));
    }

    #[test]
    fn test_origin_visible_inside_wall() {
        let walls = Walls::from([(0, 0)]);
        let seen = sweep((0, 0), 1, &walls);

        assert!(seen.contains(&(0, 0)));
        assert_eq!(seen.len(), 9);
    }

    #[test]
    fn test_diagonal_wall_pair_blocks_sight() {
        let walls = Walls::from([(1, 0), (0, 1)]);
        let seen = sweep((0, 0), 3, &walls);

        assert!(seen.contains(&(1, 0)));
        assert!(seen.contains(&(0, 1)));
        for step in 1..=3 {
            assert!(!seen.contains(&(step, step)), "({step},{step}) is behind the corner");
        }
        assert!(seen.contains(&(-1, -1)), "other diagonals are open");
        assert!(seen.contains(&(3, -3)));
    }

    #[test]
    fn test_off_axis_wall_pair_blocks_sight() {
        // Wedge between (1, -1) and (0, -2) is open only at their corner
        let walls = Walls::from([(1, -1), (0, -2)]);
        let seen = sweep((0, 0), 3, &walls);

        assert!(!seen.contains(&(1, -2)));
        assert!(!seen.contains(&(1, -3)));
        assert!(seen.contains(&(-1, -3)));
    }

    #[test]
    fn test_room_corners_are_drawn() {
        let mut walls = Walls::new();
        for i in -3..=3 {
            walls.extend([(i, -3), (i, 3), (-3, i), (3, i)]);
        }
        let seen = sweep((0, 0), 5, &walls);

        for corner in [(-3, -3), (3, -3), (-3, 3), (3, 3)] {
            assert!(seen.contains(&corner), "{corner:?}");
        }
        assert_eq!(seen.len(), 49);
    }

    #[test]
    fn test_enclosed_room_shows_walls_only() {
        let mut walls = Walls::new();
        for i in -1..=1 {
            walls.extend([(i, -1), (i, 1), (-1, i), (1, i)]);
        }
        let seen = sweep((0, 0), 5, &walls);

        let expected: BTreeSet<(i32, i32)> = walls.iter().copied().chain([(0, 0)]).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_each_tile_reported_once() {
        for seed in 0..20 {
            let walls = scatter(seed, 8, 20);
            let mut reports = Vec::new();
            let count = visibility_sweep((0, 0), 7, |p| walls.contains(&p), |p| reports.push(p));

            let unique: BTreeSet<(i32, i32)> = reports.iter().copied().collect();
            assert_eq!(unique.len(), reports.len(), "seed {seed} reported a tile twice");
            assert_eq!(count, reports.len());
        }
    }

    #[test]
    fn test_open_area_diagonals_reported_once() {
        let mut reports = Vec::new();
        visibility_sweep((0, 0), 3, |_| false, |p| reports.push(p));
        assert_eq!(reports.len(), 49);
    }

    #[test]
    fn test_rotation_symmetry() {
        for seed in 0..20 {
            let walls = scatter(seed, 7, 25);
            let rotated_walls: Walls = walls.iter().copied().map(rotate).collect();

            let expected: BTreeSet<(i32, i32)> = sweep((0, 0), 6, &walls)
                .into_iter()
                .map(rotate)
                .collect();
            let actual = sweep((0, 0), 6, &rotated_walls);

            assert_eq!(actual, expected, "seed {seed}");
        }
    }

    #[test]
    fn test_monotone_in_radius() {
        for seed in 0..10 {
            let walls = scatter(seed, 10, 20);
            let mut previous = sweep((0, 0), 0, &walls);
            for radius in 1..=9 {
                let current = sweep((0, 0), radius, &walls);
                assert!(previous.is_subset(&current), "seed {seed} radius {radius}");
                previous = current;
            }
        }
    }

    #[test]
    fn test_idempotent_with_reused_scratch() {
        let walls = scatter(42, 9, 30);
        let mut fov = FieldOfView::new();
        let mut first = BTreeSet::new();
        let mut second = BTreeSet::new();

        fov.compute((0, 0), 8, |p| walls.contains(&p), |p| {
            first.insert(p);
        });
        fov.compute((0, 0), 3, |_| false, |_| {});
        fov.compute((0, 0), 8, |p| walls.contains(&p), |p| {
            second.insert(p);
        });

        assert_eq!(first, second);
        assert_eq!(first, sweep((0, 0), 8, &walls));
    }

    #[test]
    fn test_results_stay_within_radius() {
        let walls = scatter(7, 12, 10);
        let seen = sweep((3, -4), 5, &walls);

        assert!(
            seen.iter()
                .all(|&(x, y)| (x - 3).abs() <= 5 && (y + 4).abs() <= 5)
        );
    }

    #[test]
    fn test_extreme_origin_does_not_overflow() {
        let origin = (i32::MAX, i32::MIN);
        let seen = sweep(origin, 2, &Walls::new());

        assert_eq!(seen.len(), 9);
        assert!(seen.contains(&(i32::MAX - 2, i32::MIN + 2)));
    }

    #[test]
    fn test_row_column_rounding() {
        let row = Row {
            depth: 2,
            start: Slope::LEFT,
            end: Slope { num: -1, den: 2 },
        };
        assert_eq!(row.min_col(), -2);
        assert_eq!(row.max_col(), -1);

        let row = Row {
            depth: 2,
            start: Slope { num: 1, den: 2 },
            end: Slope::RIGHT,
        };
        assert_eq!(row.min_col(), 1);
        assert_eq!(row.max_col(), 2);
        assert!(row.is_symmetric(1));
        assert!(!row.is_symmetric(0));
    }
}
