//! Dense 2D tile grid.

/// A `width x height` grid of values stored row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell set to `value`.
    #[must_use]
    pub fn filled(width: u32, height: u32, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width as usize * height as usize],
        }
    }

    /// Set every cell to `value`.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

impl<T: Clone + Default> Grid<T> {
    /// Create a grid of default values.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, T::default())
    }
}

impl<T> Grid<T> {
    /// Grid width in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the grid has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major index of `(x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let x = u32::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = u32::try_from(y).ok().filter(|&y| y < self.height)?;
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Check if `(x, y)` lies inside the grid.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.index_of(x, y).is_some()
    }

    /// Clamp `(x, y)` to the nearest coordinate inside the grid.
    ///
    /// An empty grid clamps everything to `(0, 0)`.
    #[must_use]
    pub fn clamp(&self, x: i32, y: i32) -> (i32, i32) {
        let max_x = self.width.saturating_sub(1).min(i32::MAX as u32) as i32;
        let max_y = self.height.saturating_sub(1).min(i32::MAX as u32) as i32;
        (x.clamp(0, max_x), y.clamp(0, max_y))
    }

    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    #[must_use]
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut T> {
        self.index_of(x, y).map(|i| &mut self.cells[i])
    }

    /// Write `value` at `(x, y)`. Returns `false` and drops the value if the
    /// coordinate is outside the grid.
    pub fn set(&mut self, x: i32, y: i32, value: T) -> bool {
        match self.get_mut(x, y) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Iterate over `(x, y, &value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, &T)> {
        let width = self.width.max(1) as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| ((i % width) as i32, (i / width) as i32, cell))
    }

    /// Cells of row `y`, or `None` outside the grid.
    #[must_use]
    pub fn row(&self, y: i32) -> Option<&[T]> {
        let start = self.index_of(0, y)?;
        Some(&self.cells[start..start + self.width as usize])
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Grid<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_of_bounds() {
        let grid: Grid<u8> = Grid::new(10, 4);

        assert_eq!(grid.index_of(0, 0), Some(0));
        assert_eq!(grid.index_of(9, 0), Some(9));
        assert_eq!(grid.index_of(0, 1), Some(10));
        assert_eq!(grid.index_of(9, 3), Some(39));

        // Out of bounds
        assert_eq!(grid.index_of(-1, 0), None);
        assert_eq!(grid.index_of(10, 0), None);
        assert_eq!(grid.index_of(0, 4), None);
    }

    #[test]
    fn test_set_and_get() {
        let mut grid = Grid::filled(3, 3, '.');

        assert!(grid.set(1, 2, '#'));
        assert!(!grid.set(3, 0, '#'));

        assert_eq!(grid.get(1, 2), Some(&'#'));
        assert_eq!(grid.get(0, 0), Some(&'.'));
        assert_eq!(grid.get(-1, 2), None);
        assert_eq!(grid.row(2), Some(&['.', '#', '.'][..]));
    }

    #[test]
    fn test_clamp() {
        let grid: Grid<bool> = Grid::new(80, 25);

        assert_eq!(grid.clamp(-5, 10), (0, 10));
        assert_eq!(grid.clamp(100, 30), (79, 24));
        assert_eq!(grid.clamp(40, 12), (40, 12));
        assert!(grid.contains(79, 24));
    }

    #[test]
    fn test_iter_yields_coordinates() {
        let mut grid: Grid<u32> = Grid::new(4, 2);
        grid.set(3, 1, 7);

        let hits: Vec<(i32, i32)> = grid
            .iter()
            .filter(|(_, _, v)| **v == 7)
            .map(|(x, y, _)| (x, y))
            .collect();

        assert_eq!(hits, vec![(3, 1)]);
        assert_eq!(grid.iter().count(), grid.len());
    }

    #[test]
    fn test_fill_resets_every_cell() {
        let mut grid = Grid::filled(5, 5, true);
        grid.fill(false);
        assert!(grid.iter().all(|(_, _, v)| !*v));
    }
}
