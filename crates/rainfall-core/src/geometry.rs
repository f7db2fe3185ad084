#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Two coordinate spaces are in play:
//!
//! - **Cells**: terminal grid coordinates ([`Rect`]), 0-indexed from the
//!   top-left, `u16` like the terminal itself reports.
//! - **Pixels**: drawing-surface coordinates ([`PixelSize`], [`PixelRect`]).
//!   The render loop works in pixels so that a glyph cell of `font_size`
//!   pixels maps onto whatever the host surface actually is.

/// A rectangle of terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u16,
    /// Top edge (inclusive).
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Area in cells.
    #[inline]
    pub const fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns an empty rectangle if the rectangles don't overlap.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if x < right && y < bottom {
            Rect::new(x, y, right - x, bottom - y)
        } else {
            Rect::default()
        }
    }
}

/// Size of a drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct PixelSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelSize {
    /// Create a new pixel size.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel size of a `cols x rows` terminal grid with square `cell_px` cells.
    #[inline]
    pub const fn from_cells(cols: u16, rows: u16, cell_px: u16) -> Self {
        Self {
            width: cols as u32 * cell_px as u32,
            height: rows as u32 * cell_px as u32,
        }
    }

    /// Whether either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Full-surface rectangle at the origin.
    #[inline]
    pub const fn bounds(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width, self.height)
    }
}

/// A rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct PixelRect {
    /// Left edge (inclusive).
    pub x: u32,
    /// Top edge (inclusive).
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Create a new pixel rectangle.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Clip this rectangle to `size`, returning an empty rect when disjoint.
    pub fn clip_to(&self, size: PixelSize) -> PixelRect {
        let right = self.right().min(size.width);
        let bottom = self.bottom().min(size.height);
        if self.x < right && self.y < bottom {
            PixelRect::new(self.x, self.y, right - self.x, bottom - self.y)
        } else {
            PixelRect::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges_saturate() {
        let r = Rect::new(u16::MAX - 1, 0, 10, 1);
        assert_eq!(r.right(), u16::MAX);
    }

    #[test]
    fn rect_intersection_disjoint_is_empty() {
        let a = Rect::new(0, 0, 5, 5);
        let b = Rect::new(5, 5, 5, 5);
        assert!(a.intersection(&b).is_empty());
    }

    #[test]
    fn rect_intersection_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 2, 10, 3);
        assert_eq!(a.intersection(&b), Rect::new(5, 2, 5, 3));
    }

    #[test]
    fn pixel_size_from_cells() {
        assert_eq!(PixelSize::from_cells(10, 4, 14), PixelSize::new(140, 56));
        assert!(PixelSize::from_cells(0, 4, 14).is_empty());
    }

    #[test]
    fn pixel_rect_clip() {
        let size = PixelSize::new(100, 50);
        assert_eq!(
            PixelRect::new(90, 40, 20, 20).clip_to(size),
            PixelRect::new(90, 40, 10, 10)
        );
        assert!(PixelRect::new(100, 0, 5, 5).clip_to(size).is_empty());
        assert_eq!(size.bounds().clip_to(size), size.bounds());
    }
}
