#![forbid(unsafe_code)]

//! ANSI escape sequence generation helpers.
//!
//! Pure byte-generation functions; the [`Presenter`](crate::presenter::Presenter)
//! does all state tracking.
//!
//! | Sequence | Description |
//! |----------|-------------|
//! | `ESC [ 0 m` | SGR reset |
//! | `ESC [ 38;2;r;g;b m` | True-color foreground |
//! | `ESC [ 48;2;r;g;b m` | True-color background |
//! | `ESC [ row ; col H` | CUP (Cursor Position, 1-indexed) |
//! | `ESC [ 2 J` | Erase entire display |
//! | `ESC [ ? 2026 h/l` | Synchronized output begin/end |

use std::io::{self, Write};

/// SGR reset: `CSI 0 m`
pub const SGR_RESET: &[u8] = b"\x1b[0m";

/// Erase entire display: `CSI 2 J`
pub const ERASE_DISPLAY: &[u8] = b"\x1b[2J";

/// Begin synchronized output: `CSI ? 2026 h`
pub const SYNC_BEGIN: &[u8] = b"\x1b[?2026h";

/// End synchronized output: `CSI ? 2026 l`
pub const SYNC_END: &[u8] = b"\x1b[?2026l";

/// Write SGR reset sequence.
#[inline]
pub fn sgr_reset<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(SGR_RESET)
}

/// True-color foreground: `CSI 38;2;r;g;b m`
#[inline]
pub fn sgr_fg_rgb<W: Write>(w: &mut W, r: u8, g: u8, b: u8) -> io::Result<()> {
    write!(w, "\x1b[38;2;{r};{g};{b}m")
}

/// True-color background: `CSI 48;2;r;g;b m`
#[inline]
pub fn sgr_bg_rgb<W: Write>(w: &mut W, r: u8, g: u8, b: u8) -> io::Result<()> {
    write!(w, "\x1b[48;2;{r};{g};{b}m")
}

/// Cursor position (0-indexed arguments, emitted 1-indexed).
#[inline]
pub fn cup<W: Write>(w: &mut W, row: u16, col: u16) -> io::Result<()> {
    write!(
        w,
        "\x1b[{};{}H",
        row as u32 + 1,
        col as u32 + 1
    )
}

/// Erase the whole display.
#[inline]
pub fn erase_display<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(ERASE_DISPLAY)
}

/// Begin synchronized output (DEC 2026).
#[inline]
pub fn sync_begin<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(SYNC_BEGIN)
}

/// End synchronized output (DEC 2026).
#[inline]
pub fn sync_end<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(SYNC_END)
}
