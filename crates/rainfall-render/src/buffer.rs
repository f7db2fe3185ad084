#![forbid(unsafe_code)]

//! Buffer grid storage.
//!
//! The `Buffer` is a 2D grid of [`Cell`]s stored in row-major order:
//! `index = y * width + x`.
//!
//! # Invariants
//!
//! 1. `cells.len() == width * height`
//! 2. A zero-width or zero-height buffer is valid and holds no cells
//! 3. Out-of-bounds reads return `None`; out-of-bounds writes are ignored

use crate::cell::Cell;
use rainfall_core::geometry::Rect;

/// A 2D grid of terminal cells.
///
/// # Example
///
/// ```
/// use rainfall_render::buffer::Buffer;
/// use rainfall_render::cell::Cell;
///
/// let mut buffer = Buffer::new(80, 24);
/// buffer.set(0, 0, Cell::from_char('H'));
/// buffer.set(1, 0, Cell::from_char('i'));
/// assert_eq!(buffer.row_text(0).trim_end(), "Hi");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Create a new buffer filled with default (cleared) cells.
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::default(); len],
        }
    }

    /// Width in cells.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in cells.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Full-buffer rectangle.
    #[inline]
    pub const fn area(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the buffer holds no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Get a cell, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Get a mutable cell, or `None` when out of bounds.
    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        match self.index(x, y) {
            Some(i) => Some(&mut self.cells[i]),
            None => None,
        }
    }

    /// Set a cell. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(slot) = self.get_mut(x, y) {
            *slot = cell;
        }
    }

    /// Fill a rectangle (clipped to the buffer) with `cell`.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let clipped = rect.intersection(&self.area());
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                self.set(x, y, cell);
            }
        }
    }

    /// Replace the grid with a cleared one of the new size.
    pub fn resize(&mut self, width: u16, height: u16) {
        *self = Self::new(width, height);
    }

    /// All cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells of row `y` (empty slice when out of bounds).
    pub fn row_cells(&self, y: u16) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        let start = y as usize * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// Glyphs of row `y` as text, empty cells rendered as spaces.
    pub fn row_text(&self, y: u16) -> String {
        self.row_cells(y)
            .iter()
            .map(|c| c.content.as_char().unwrap_or(' '))
            .collect()
    }

    /// Number of cells currently holding a glyph.
    pub fn glyph_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_cleared() {
        let buf = Buffer::new(4, 3);
        assert_eq!(buf.len(), 12);
        assert!(buf.cells().iter().all(|c| *c == Cell::default()));
        assert_eq!(buf.glyph_count(), 0);
    }

    #[test]
    fn zero_sized_buffer_is_valid() {
        let mut buf = Buffer::new(0, 10);
        assert!(buf.is_empty());
        assert!(buf.get(0, 0).is_none());
        buf.set(0, 0, Cell::from_char('x'));
        assert!(buf.row_cells(0).is_empty());
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut buf = Buffer::new(2, 2);
        buf.set(2, 0, Cell::from_char('x'));
        buf.set(0, 2, Cell::from_char('x'));
        assert_eq!(buf.glyph_count(), 0);
    }

    #[test]
    fn fill_clips() {
        let mut buf = Buffer::new(3, 3);
        buf.fill(Rect::new(1, 1, 10, 10), Cell::from_char('#'));
        assert_eq!(buf.glyph_count(), 4);
        assert_eq!(buf.row_text(0), "   ");
        assert_eq!(buf.row_text(2), " ##");
    }

    #[test]
    fn resize_clears() {
        let mut buf = Buffer::new(3, 3);
        buf.set(0, 0, Cell::from_char('a'));
        buf.resize(5, 2);
        assert_eq!((buf.width(), buf.height()), (5, 2));
        assert_eq!(buf.glyph_count(), 0);
    }

    #[test]
    fn row_text_reads_glyphs() {
        let mut buf = Buffer::new(3, 1);
        buf.set(1, 0, Cell::from_char('Z'));
        assert_eq!(buf.row_text(0), " Z ");
        assert_eq!(buf.row_text(1), "");
    }
}
