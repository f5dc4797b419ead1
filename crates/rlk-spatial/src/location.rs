//! Grid coordinates.

/// A point on an integer tile grid.
///
/// Lets the sweep work directly with a host's own coordinate type, such as
/// a `Position` component.
pub trait Location: Copy {
    fn x(&self) -> i32;

    fn y(&self) -> i32;

    /// Build a location from grid coordinates.
    fn at(x: i32, y: i32) -> Self;
}

impl Location for (i32, i32) {
    fn x(&self) -> i32 {
        self.0
    }

    fn y(&self) -> i32 {
        self.1
    }

    fn at(x: i32, y: i32) -> Self {
        (x, y)
    }
}
