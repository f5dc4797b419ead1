//! Character console surface.

use rlk_spatial::Grid;

/// 24-bit terminal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const GREY: Self = Self::new(128, 128, 128);
    pub const DARKEST_GREY: Self = Self::new(31, 31, 31);
    pub const YELLOW: Self = Self::new(255, 255, 0);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// One console cell: a character with foreground and background colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Glyph {
    /// Empty cell.
    pub const BLANK: Self = Self::new(' ', Color::WHITE, Color::BLACK);

    #[must_use]
    pub const fn new(ch: char, fg: Color, bg: Color) -> Self {
        Self { ch, fg, bg }
    }
}

impl Default for Glyph {
    fn default() -> Self {
        Self::BLANK
    }
}

/// A grid of glyphs the game draws into.
///
/// The `dirty` flag tells renderers the screen needs a full redraw.
pub trait Console {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Draw `glyph` at `(x, y)`. Writes outside the console are ignored.
    fn set_char(&mut self, x: i32, y: i32, glyph: Glyph);

    /// Blank every cell.
    fn clear(&mut self);

    fn is_dirty(&self) -> bool;

    fn set_dirty(&mut self, dirty: bool);
}

/// In-memory console, used headless and in tests.
#[derive(Debug, Clone)]
pub struct BufferConsole {
    cells: Grid<Glyph>,
    dirty: bool,
}

impl BufferConsole {
    /// Create a blank console. It starts dirty so the first frame draws.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: Grid::new(width, height),
            dirty: true,
        }
    }

    #[must_use]
    pub fn glyph_at(&self, x: i32, y: i32) -> Option<Glyph> {
        self.cells.get(x, y).copied()
    }

    /// The characters of the console, one line per row.
    #[must_use]
    pub fn render_to_string(&self) -> String {
        (0..self.cells.height() as i32)
            .filter_map(|y| self.cells.row(y))
            .map(|row| row.iter().map(|glyph| glyph.ch).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Console for BufferConsole {
    fn width(&self) -> u32 {
        self.cells.width()
    }

    fn height(&self) -> u32 {
        self.cells.height()
    }

    fn set_char(&mut self, x: i32, y: i32, glyph: Glyph) {
        self.cells.set(x, y, glyph);
    }

    fn clear(&mut self) {
        self.cells.fill(Glyph::BLANK);
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }
}
