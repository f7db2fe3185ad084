#![forbid(unsafe_code)]

//! Drawing surfaces.
//!
//! A [`Surface`] is a 2D immediate-mode canvas measured in pixels. It
//! retains what was drawn between calls, blends translucent fills over
//! existing content, and loses everything when resized. That is all the
//! rain effect needs: the fade trail comes from painting a faint overlay
//! instead of clearing.
//!
//! Two implementations ship here:
//!
//! - [`CellSurface`] rasterizes onto a terminal [`Buffer`], one cell per
//!   `cell_px x cell_px` pixel square.
//! - [`RecordingSurface`] records every call as a [`DrawOp`].

use rainfall_core::geometry::{PixelRect, PixelSize};
use unicode_width::UnicodeWidthChar;

use crate::buffer::Buffer;
use crate::cell::{Cell, CellContent, PackedRgba};

/// A single glyph draw: `ch` with its baseline at `(x, baseline)`.
///
/// The glyph box spans pixel rows `baseline - size .. baseline`, matching a
/// canvas `fillText` with alphabetic baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    /// Character to draw.
    pub ch: char,
    /// Left edge in pixels.
    pub x: u32,
    /// Baseline in pixels.
    pub baseline: u32,
    /// Font size in pixels.
    pub size: u16,
    /// Fill color.
    pub color: PackedRgba,
}

/// A 2D drawing surface.
pub trait Surface {
    /// Current size in pixels.
    fn size(&self) -> PixelSize;

    /// Resize the surface. Existing content is discarded.
    fn resize(&mut self, size: PixelSize);

    /// Blend `color` over every pixel of `rect` (source-over).
    fn fill_rect(&mut self, rect: PixelRect, color: PackedRgba);

    /// Draw one glyph.
    fn fill_glyph(&mut self, glyph: Glyph);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn size(&self) -> PixelSize {
        (**self).size()
    }

    fn resize(&mut self, size: PixelSize) {
        (**self).resize(size);
    }

    fn fill_rect(&mut self, rect: PixelRect, color: PackedRgba) {
        (**self).fill_rect(rect, color);
    }

    fn fill_glyph(&mut self, glyph: Glyph) {
        (**self).fill_glyph(glyph);
    }
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn size(&self) -> PixelSize {
        (**self).size()
    }

    fn resize(&mut self, size: PixelSize) {
        (**self).resize(size);
    }

    fn fill_rect(&mut self, rect: PixelRect, color: PackedRgba) {
        (**self).fill_rect(rect, color);
    }

    fn fill_glyph(&mut self, glyph: Glyph) {
        (**self).fill_glyph(glyph);
    }
}

// =============================================================================
// CellSurface
// =============================================================================

/// A pixel surface backed by a grid of terminal cells.
///
/// Pixel `(px, py)` belongs to cell `(px / cell_px, py / cell_px)`. Fills
/// blend into both colors of every touched cell. A glyph lands in the cell
/// containing the top-left of its box; glyphs whose box starts above the
/// surface, and glyphs that are not exactly one cell wide, are not drawn.
///
/// Repeated faint fills stall once 8-bit rounding can no longer move a
/// glyph's color. A glyph whose color stops changing under a translucent
/// fill is erased, so trails end instead of leaving permanent ghosts.
#[derive(Debug, Clone)]
pub struct CellSurface {
    buffer: Buffer,
    cell_px: u16,
    size: PixelSize,
}

impl CellSurface {
    /// Create a surface of `size` pixels with square cells of `cell_px`.
    ///
    /// A `cell_px` of zero is treated as one.
    pub fn new(size: PixelSize, cell_px: u16) -> Self {
        let cell_px = cell_px.max(1);
        let (cols, rows) = Self::grid_for(size, cell_px);
        Self {
            buffer: Buffer::new(cols, rows),
            cell_px,
            size,
        }
    }

    /// Create a surface exactly covering a `cols x rows` terminal.
    pub fn for_terminal(cols: u16, rows: u16, cell_px: u16) -> Self {
        let cell_px = cell_px.max(1);
        Self::new(PixelSize::from_cells(cols, rows, cell_px), cell_px)
    }

    fn grid_for(size: PixelSize, cell_px: u16) -> (u16, u16) {
        let cp = cell_px as u32;
        let cols = (size.width / cp).min(u16::MAX as u32) as u16;
        let rows = (size.height / cp).min(u16::MAX as u32) as u16;
        (cols, rows)
    }

    /// The backing cell grid.
    #[inline]
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Pixels per cell edge.
    #[inline]
    pub fn cell_px(&self) -> u16 {
        self.cell_px
    }

    fn blend_cell(cell: &mut Cell, color: PackedRgba) {
        if color.is_opaque() {
            *cell = Cell {
                content: CellContent::EMPTY,
                fg: color,
                bg: color,
            };
            return;
        }

        cell.bg = color.over(cell.bg);
        let fg = color.over(cell.fg);
        if !cell.is_empty() && fg == cell.fg {
            cell.content = CellContent::EMPTY;
            cell.fg = cell.bg;
        } else {
            cell.fg = fg;
        }
    }
}

impl Surface for CellSurface {
    fn size(&self) -> PixelSize {
        self.size
    }

    fn resize(&mut self, size: PixelSize) {
        let (cols, rows) = Self::grid_for(size, self.cell_px);
        self.buffer.resize(cols, rows);
        self.size = size;
    }

    fn fill_rect(&mut self, rect: PixelRect, color: PackedRgba) {
        if color.a() == 0 {
            return;
        }
        let rect = rect.clip_to(self.size);
        if rect.is_empty() {
            return;
        }

        let cp = self.cell_px as u32;
        let x0 = rect.x / cp;
        let y0 = rect.y / cp;
        let x1 = rect.right().div_ceil(cp).min(self.buffer.width() as u32);
        let y1 = rect.bottom().div_ceil(cp).min(self.buffer.height() as u32);

        for y in y0..y1 {
            for x in x0..x1 {
                if let Some(cell) = self.buffer.get_mut(x as u16, y as u16) {
                    Self::blend_cell(cell, color);
                }
            }
        }
    }

    fn fill_glyph(&mut self, glyph: Glyph) {
        if glyph.size == 0
            || glyph.color.a() == 0
            || glyph.ch.is_control()
            || glyph.ch.width() != Some(1)
        {
            return;
        }
        let Some(top) = glyph.baseline.checked_sub(glyph.size as u32) else {
            return;
        };

        let cp = self.cell_px as u32;
        let col = glyph.x / cp;
        let row = top / cp;
        if col > u16::MAX as u32 || row > u16::MAX as u32 {
            return;
        }

        if let Some(cell) = self.buffer.get_mut(col as u16, row as u16) {
            cell.content = CellContent::from_char(glyph.ch);
            cell.fg = glyph.color;
        }
    }
}

// =============================================================================
// RecordingSurface
// =============================================================================

/// One recorded surface call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOp {
    /// `resize(size)`.
    Resize(PixelSize),
    /// `fill_rect(rect, color)`.
    Fill {
        /// Filled area.
        rect: PixelRect,
        /// Fill color.
        color: PackedRgba,
    },
    /// `fill_glyph(glyph)`.
    Glyph(Glyph),
}

/// A surface that records calls instead of rasterizing.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: PixelSize,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    /// Create an empty recording surface of `size` pixels.
    pub fn new(size: PixelSize) -> Self {
        Self {
            size,
            ops: Vec::new(),
        }
    }

    /// All recorded operations, oldest first.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drain the recorded operations.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Recorded glyph draws, oldest first.
    pub fn glyphs(&self) -> impl Iterator<Item = &Glyph> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Glyph(g) => Some(g),
            _ => None,
        })
    }

    /// Number of recorded glyph draws.
    pub fn glyph_count(&self) -> usize {
        self.glyphs().count()
    }

    /// Number of recorded rectangle fills.
    pub fn fill_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Fill { .. }))
            .count()
    }

    /// Number of draw calls (fills plus glyphs); resizes are not draws.
    pub fn draw_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| !matches!(op, DrawOp::Resize(_)))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> PixelSize {
        self.size
    }

    fn resize(&mut self, size: PixelSize) {
        self.size = size;
        self.ops.push(DrawOp::Resize(size));
    }

    fn fill_rect(&mut self, rect: PixelRect, color: PackedRgba) {
        self.ops.push(DrawOp::Fill { rect, color });
    }

    fn fill_glyph(&mut self, glyph: Glyph) {
        self.ops.push(DrawOp::Glyph(glyph));
    }
}
