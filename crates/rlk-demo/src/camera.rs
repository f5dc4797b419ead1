//! Screen clipping around the player.

/// Map area shown on the console: `left_x..right_x` by `top_y..bottom_y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Camera {
    pub left_x: i32,
    pub right_x: i32,
    pub top_y: i32,
    pub bottom_y: i32,
}

impl Camera {
    /// A `width x height` view with `(x, y)` at its center.
    #[must_use]
    pub fn centered_on(x: i32, y: i32, width: u32, height: u32) -> Self {
        let left_x = x.saturating_sub((width / 2) as i32);
        let top_y = y.saturating_sub((height / 2) as i32);
        Self {
            left_x,
            right_x: left_x.saturating_add(width as i32),
            top_y,
            bottom_y: top_y.saturating_add(height as i32),
        }
    }

    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left_x && x < self.right_x && y >= self.top_y && y < self.bottom_y
    }

    /// Console coordinate of map tile `(x, y)`, if it is on screen.
    #[must_use]
    pub const fn to_screen(&self, x: i32, y: i32) -> Option<(i32, i32)> {
        if self.contains(x, y) {
            Some((x - self.left_x, y - self.top_y))
        } else {
            None
        }
    }

    /// Every map coordinate in view, row by row.
    pub fn tiles(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let (left_x, right_x) = (self.left_x, self.right_x);
        (self.top_y..self.bottom_y).flat_map(move |y| (left_x..right_x).map(move |x| (x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_on() {
        let camera = Camera::centered_on(50, 50, 80, 50);

        assert_eq!(camera.left_x, 10);
        assert_eq!(camera.right_x, 90);
        assert_eq!(camera.top_y, 25);
        assert_eq!(camera.bottom_y, 75);
        assert_eq!(camera.to_screen(50, 50), Some((40, 25)));
    }

    #[test]
    fn test_to_screen_clips() {
        let camera = Camera::centered_on(1, 1, 11, 7);

        assert_eq!(camera.to_screen(1, 1), Some((5, 3)));
        assert_eq!(camera.to_screen(-4, -2), Some((0, 0)));
        assert_eq!(camera.to_screen(7, 1), None);
        assert_eq!(camera.tiles().count(), 77);
    }
}
