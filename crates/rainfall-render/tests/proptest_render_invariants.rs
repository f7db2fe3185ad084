//! Property-based invariants for the render kernel.
//!
//! 1. `over` with an opaque source returns the source; with a transparent
//!    source returns the destination.
//! 2. Compositing onto an opaque destination yields an opaque color.
//! 3. Diff runs cover exactly the changed cells, without overlap.
//! 4. Glyph placement on a `CellSurface` never writes outside the grid.
//! 5. Applying a diff to the old buffer reproduces the new one.

use proptest::prelude::*;
use rainfall_core::geometry::{PixelRect, PixelSize};
use rainfall_render::buffer::Buffer;
use rainfall_render::cell::{Cell, PackedRgba};
use rainfall_render::diff::BufferDiff;
use rainfall_render::surface::{CellSurface, Glyph, Surface};

fn rgba_strategy() -> impl Strategy<Value = PackedRgba> {
    any::<u32>().prop_map(PackedRgba)
}

fn edits_strategy() -> impl Strategy<Value = Vec<(u16, u16, char)>> {
    prop::collection::vec((0u16..12, 0u16..6, proptest::char::range('A', 'Z')), 0..40)
}

proptest! {
    #[test]
    fn opaque_source_wins(src in rgba_strategy(), dst in rgba_strategy()) {
        let src = PackedRgba::rgb(src.r(), src.g(), src.b());
        prop_assert_eq!(src.over(dst), src);
    }

    #[test]
    fn transparent_source_is_identity(dst in rgba_strategy()) {
        prop_assert_eq!(PackedRgba::TRANSPARENT.over(dst), dst);
    }

    #[test]
    fn over_opaque_is_opaque(src in rgba_strategy(), dst in rgba_strategy()) {
        let dst = PackedRgba::rgb(dst.r(), dst.g(), dst.b());
        prop_assert!(src.over(dst).is_opaque());
    }

    #[test]
    fn runs_cover_exactly_the_changes(edits in edits_strategy()) {
        let old = Buffer::new(12, 6);
        let mut new = old.clone();
        for (x, y, ch) in edits {
            new.set(x, y, Cell::from_char(ch));
        }
        let diff = BufferDiff::compute(&old, &new);
        let covered: Vec<(u16, u16)> = diff
            .runs()
            .iter()
            .flat_map(|run| (run.x0..=run.x1).map(move |x| (x, run.y)))
            .collect();
        prop_assert_eq!(covered.as_slice(), diff.changes());
    }

    #[test]
    fn applying_diff_reproduces_target(edits in edits_strategy()) {
        let old = Buffer::new(12, 6);
        let mut new = old.clone();
        for (x, y, ch) in edits {
            new.set(x, y, Cell::from_char(ch));
        }
        let diff = BufferDiff::compute(&old, &new);
        let mut patched = old.clone();
        for &(x, y) in diff.changes() {
            patched.set(x, y, *new.get(x, y).unwrap());
        }
        prop_assert_eq!(patched, new);
    }

    #[test]
    fn glyphs_stay_inside_grid(
        cols in 0u16..20,
        rows in 0u16..20,
        cell_px in 1u16..20,
        x in 0u32..1000,
        baseline in 0u32..1000,
    ) {
        let mut surface = CellSurface::for_terminal(cols, rows, cell_px);
        surface.fill_glyph(Glyph {
            ch: 'X',
            x,
            baseline,
            size: cell_px,
            color: PackedRgba::rgba(100, 255, 218, 89),
        });
        let drawn = surface.buffer().glyph_count();
        let size = surface.size();
        let cp = cell_px as u32;
        let inside = x < size.width && baseline >= cp && baseline - cp < size.height;
        prop_assert_eq!(drawn, usize::from(inside));
    }

    #[test]
    fn fills_never_grow_the_grid(
        rect in (0u32..500, 0u32..500, 0u32..500, 0u32..500),
        color in rgba_strategy(),
    ) {
        let mut surface = CellSurface::new(PixelSize::new(140, 100), 14);
        surface.fill_rect(PixelRect::new(rect.0, rect.1, rect.2, rect.3), color);
        prop_assert_eq!(surface.buffer().len(), 10 * 7);
    }
}
