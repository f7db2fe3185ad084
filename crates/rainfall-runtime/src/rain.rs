#![forbid(unsafe_code)]

//! Falling-glyph state and the per-tick step.
//!
//! One drop per column. A drop is the row index of its stream's head; the
//! head glyph is drawn with its baseline at `drop * font_size` pixels. Old
//! heads are never erased, the faint overlay painted each tick makes them
//! fade into a trail.

use rand::Rng;
use rand::seq::SliceRandom;
use rainfall_render::surface::{Glyph, Surface};

use crate::config::RainConfig;

/// What one [`RainState::step`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Glyphs drawn.
    pub glyphs: usize,
    /// Columns that restarted from the top.
    pub resets: usize,
}

/// Per-column drop positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RainState {
    drops: Vec<u32>,
    font_size: u16,
}

impl RainState {
    /// Allocate `floor(width / font_size)` columns, every drop at row 1.
    ///
    /// A `font_size` of zero yields no columns.
    pub fn new(width: u32, font_size: u16) -> Self {
        let columns = match font_size {
            0 => 0,
            fs => (width / fs as u32) as usize,
        };
        Self {
            drops: vec![1; columns],
            font_size,
        }
    }

    /// Number of columns.
    #[inline]
    pub fn columns(&self) -> usize {
        self.drops.len()
    }

    /// Current drop positions, leftmost column first.
    #[inline]
    pub fn drops(&self) -> &[u32] {
        &self.drops
    }

    /// Glyph size and column pitch in pixels.
    #[inline]
    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    /// Run one tick against `surface`.
    ///
    /// Paints the fade overlay, draws one random glyph per column at its
    /// drop, maybe restarts columns past the bottom edge, then advances
    /// every drop by one.
    pub fn step<S, R>(&mut self, surface: &mut S, rng: &mut R, config: &RainConfig) -> TickReport
    where
        S: Surface + ?Sized,
        R: Rng + ?Sized,
    {
        let size = surface.size();
        surface.fill_rect(size.bounds(), config.fade.to_packed());

        let fs = self.font_size as u32;
        let accent = config.accent.to_packed();
        let mut report = TickReport::default();

        for (i, drop) in self.drops.iter_mut().enumerate() {
            if let Some(&ch) = config.alphabet.choose(rng) {
                surface.fill_glyph(Glyph {
                    ch,
                    x: (i as u32).saturating_mul(fs),
                    baseline: drop.saturating_mul(fs),
                    size: self.font_size,
                    color: accent,
                });
                report.glyphs += 1;
            }

            let head = *drop as u64 * fs as u64;
            if head > size.height as u64 && rng.r#gen::<f64>() < config.reset_probability {
                *drop = 0;
                report.resets += 1;
            }

            *drop = drop.saturating_add(1);
        }

        report
    }
}
