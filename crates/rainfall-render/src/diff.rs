#![forbid(unsafe_code)]

//! Diff computation between buffers.
//!
//! A row-major scan records every position whose cell differs between the
//! previous and next frame. Adjacent changes on a row are coalesced into
//! [`ChangeRun`]s so the presenter positions the cursor once per run.
//!
//! ```
//! use rainfall_render::buffer::Buffer;
//! use rainfall_render::cell::Cell;
//! use rainfall_render::diff::BufferDiff;
//!
//! let old = Buffer::new(80, 24);
//! let mut new = Buffer::new(80, 24);
//! new.set(5, 5, Cell::from_char('X'));
//! new.set(6, 5, Cell::from_char('Y'));
//!
//! let diff = BufferDiff::compute(&old, &new);
//! assert_eq!(diff.len(), 2);
//! assert_eq!(diff.runs().len(), 1);
//! ```

use crate::buffer::Buffer;

/// A contiguous run of changed cells on a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeRun {
    /// Row index.
    pub y: u16,
    /// Start column (inclusive).
    pub x0: u16,
    /// End column (inclusive).
    pub x1: u16,
}

impl ChangeRun {
    /// Create a new change run.
    #[inline]
    pub const fn new(y: u16, x0: u16, x1: u16) -> Self {
        debug_assert!(x0 <= x1);
        Self { y, x0, x1 }
    }

    /// Number of cells in this run.
    #[inline]
    pub const fn len(&self) -> u16 {
        self.x1 - self.x0 + 1
    }
}

/// The set of changed positions between two buffers, in row-major order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferDiff {
    changes: Vec<(u16, u16)>,
}

impl BufferDiff {
    /// An empty diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the changed cells between `old` and `new`.
    ///
    /// When the sizes differ every cell of `new` counts as changed.
    pub fn compute(old: &Buffer, new: &Buffer) -> Self {
        if old.width() != new.width() || old.height() != new.height() {
            return Self::full(new);
        }

        let width = new.width();
        let changes = old
            .cells()
            .iter()
            .zip(new.cells())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| {
                let x = (i % width as usize) as u16;
                let y = (i / width as usize) as u16;
                (x, y)
            })
            .collect();
        Self { changes }
    }

    /// A diff marking every cell of `buffer` as changed (full repaint).
    pub fn full(buffer: &Buffer) -> Self {
        let mut changes = Vec::with_capacity(buffer.len());
        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                changes.push((x, y));
            }
        }
        Self { changes }
    }

    /// Number of changed cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Whether nothing changed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Changed `(x, y)` positions in row-major order.
    #[inline]
    pub fn changes(&self) -> &[(u16, u16)] {
        &self.changes
    }

    /// Coalesce horizontally adjacent changes into runs.
    pub fn runs(&self) -> Vec<ChangeRun> {
        let mut runs: Vec<ChangeRun> = Vec::new();
        for &(x, y) in &self.changes {
            match runs.last_mut() {
                Some(run) if run.y == y && run.x1.checked_add(1) == Some(x) => run.x1 = x,
                _ => runs.push(ChangeRun::new(y, x, x)),
            }
        }
        runs
    }
}
