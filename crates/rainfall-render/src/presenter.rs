#![forbid(unsafe_code)]

//! Presenter: state-tracked ANSI emission.
//!
//! The presenter turns a [`BufferDiff`] into terminal output. It tracks the
//! cursor and the last emitted colors so only the sequences that change are
//! written, buffers the whole frame, and flushes once.
//!
//! Cells hold straight-alpha colors. Terminals do not, so each cell is
//! flattened at emission: the background is composited over the opaque
//! backdrop, then the foreground over that background.
//!
//! ```
//! use rainfall_render::buffer::Buffer;
//! use rainfall_render::cell::{Cell, PackedRgba};
//! use rainfall_render::diff::BufferDiff;
//! use rainfall_render::presenter::Presenter;
//!
//! let mut presenter = Presenter::new(Vec::new(), PackedRgba::rgb(10, 25, 47));
//! let prev = Buffer::new(4, 2);
//! let mut next = prev.clone();
//! next.set(1, 0, Cell::from_char('A'));
//! presenter.present(&next, &BufferDiff::compute(&prev, &next))?;
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, BufWriter, Write};

use crate::ansi;
use crate::buffer::Buffer;
use crate::cell::{Cell, PackedRgba};
use crate::diff::BufferDiff;

/// Size of the internal write buffer (64KB).
const BUFFER_CAPACITY: usize = 64 * 1024;

/// Opaque colors actually sent to the terminal for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EmittedStyle {
    fg: PackedRgba,
    bg: PackedRgba,
}

/// State-tracked ANSI presenter.
pub struct Presenter<W: Write> {
    writer: BufWriter<W>,
    backdrop: PackedRgba,
    sync_output: bool,
    /// Last emitted style (None = unknown/reset).
    current_style: Option<EmittedStyle>,
    /// Current cursor position (0-indexed). None = unknown.
    cursor_x: Option<u16>,
    cursor_y: Option<u16>,
}

impl<W: Write> Presenter<W> {
    /// Create a presenter writing to `writer`, flattening onto `backdrop`.
    ///
    /// The backdrop's alpha is ignored; it is always treated as opaque.
    pub fn new(writer: W, backdrop: PackedRgba) -> Self {
        Self {
            writer: BufWriter::with_capacity(BUFFER_CAPACITY, writer),
            backdrop: PackedRgba::rgb(backdrop.r(), backdrop.g(), backdrop.b()),
            sync_output: false,
            current_style: None,
            cursor_x: None,
            cursor_y: None,
        }
    }

    /// Wrap each frame in DEC 2026 synchronized-output markers.
    #[must_use]
    pub fn with_sync_output(mut self, enabled: bool) -> Self {
        self.sync_output = enabled;
        self
    }

    /// The opaque backdrop color.
    #[inline]
    pub fn backdrop(&self) -> PackedRgba {
        self.backdrop
    }

    /// Present a frame: emit every changed cell of `buffer` listed in `diff`.
    pub fn present(&mut self, buffer: &Buffer, diff: &BufferDiff) -> io::Result<()> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "present",
            width = buffer.width(),
            height = buffer.height(),
            changes = diff.len()
        )
        .entered();

        if self.sync_output {
            ansi::sync_begin(&mut self.writer)?;
        }

        for run in diff.runs() {
            self.move_cursor_to(run.x0, run.y)?;
            for x in run.x0..=run.x1 {
                if let Some(cell) = buffer.get(x, run.y) {
                    self.emit_cell(cell)?;
                }
            }
        }

        ansi::sgr_reset(&mut self.writer)?;
        self.current_style = None;

        if self.sync_output {
            ansi::sync_end(&mut self.writer)?;
        }

        self.writer.flush()
    }

    /// Paint the whole screen with the backdrop and home the cursor.
    pub fn clear_screen(&mut self) -> io::Result<()> {
        let b = self.backdrop;
        ansi::sgr_bg_rgb(&mut self.writer, b.r(), b.g(), b.b())?;
        ansi::erase_display(&mut self.writer)?;
        ansi::sgr_reset(&mut self.writer)?;
        ansi::cup(&mut self.writer, 0, 0)?;
        self.current_style = None;
        self.cursor_x = Some(0);
        self.cursor_y = Some(0);
        self.writer.flush()
    }

    /// Forget tracked cursor and style state.
    ///
    /// Call after a resize or whenever the terminal state is unknown.
    pub fn reset(&mut self) {
        self.current_style = None;
        self.cursor_x = None;
        self.cursor_y = None;
    }

    /// Get the inner writer (consuming the presenter), flushing first.
    pub fn into_inner(self) -> Result<W, io::Error> {
        self.writer
            .into_inner()
            .map_err(|e| io::Error::other(e.to_string()))
    }

    fn flatten(&self, cell: &Cell) -> EmittedStyle {
        let bg = cell.bg.over(self.backdrop);
        let fg = cell.fg.over(bg);
        EmittedStyle { fg, bg }
    }

    fn emit_cell(&mut self, cell: &Cell) -> io::Result<()> {
        let style = self.flatten(cell);
        if self.current_style != Some(style) {
            ansi::sgr_fg_rgb(&mut self.writer, style.fg.r(), style.fg.g(), style.fg.b())?;
            ansi::sgr_bg_rgb(&mut self.writer, style.bg.r(), style.bg.g(), style.bg.b())?;
            self.current_style = Some(style);
        }

        let ch = cell.content.as_char().unwrap_or(' ');
        let mut buf = [0u8; 4];
        self.writer.write_all(ch.encode_utf8(&mut buf).as_bytes())?;

        if let Some(x) = self.cursor_x {
            self.cursor_x = Some(x.saturating_add(1));
        }
        Ok(())
    }

    fn move_cursor_to(&mut self, x: u16, y: u16) -> io::Result<()> {
        if self.cursor_x == Some(x) && self.cursor_y == Some(y) {
            return Ok(());
        }
        ansi::cup(&mut self.writer, y, x)?;
        self.cursor_x = Some(x);
        self.cursor_y = Some(y);
        Ok(())
    }
}
