#![forbid(unsafe_code)]

//! Render loop configuration.
//!
//! [`RainConfig::default`] reproduces the portfolio backdrop: 14px glyphs,
//! a 33ms period, a 2.5% reset chance, and the navy/teal palette.

use std::time::Duration;

use rainfall_render::cell::PackedRgba;
use thiserror::Error;

/// Default glyph set: `A-Z`, `0-9`, then `@#$%^&*()`.
pub const DEFAULT_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789@#$%^&*()";

/// Default font size in pixels.
pub const DEFAULT_FONT_SIZE: u16 = 14;

/// Default redraw period (~30 Hz).
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(33);

/// Default per-tick reset probability for a column past the bottom edge.
pub const DEFAULT_RESET_PROBABILITY: f64 = 0.025;

/// A color with a fractional opacity, as written in CSS `rgba()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
}

impl Tint {
    /// Create a tint.
    pub const fn new(r: u8, g: u8, b: u8, opacity: f32) -> Self {
        Self { r, g, b, opacity }
    }

    /// Pack into an 8-bit straight-alpha color.
    #[inline]
    pub fn to_packed(self) -> PackedRgba {
        PackedRgba::rgba_f32(self.r, self.g, self.b, self.opacity)
    }

    fn opacity_in_range(self) -> bool {
        self.opacity.is_finite() && (0.0..=1.0).contains(&self.opacity)
    }
}

/// Errors reported by [`RainConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("font size must be at least 1px")]
    ZeroFontSize,

    #[error("tick period must be non-zero")]
    ZeroTickPeriod,

    #[error("reset probability must be within [0, 1], got {0}")]
    ResetProbability(f64),

    #[error("{which} opacity must be within [0, 1], got {value}")]
    Opacity { which: &'static str, value: f32 },
}

/// Everything the render loop needs to know up front.
#[derive(Debug, Clone, PartialEq)]
pub struct RainConfig {
    /// Glyph size and column pitch in pixels.
    pub font_size: u16,
    /// Time between ticks.
    pub tick_period: Duration,
    /// Chance that an overflowing column restarts on a given tick.
    pub reset_probability: f64,
    /// Glyphs drawn at random. Empty means nothing is drawn.
    pub alphabet: Vec<char>,
    /// Overlay painted over the whole surface every tick.
    pub fade: Tint,
    /// Glyph color.
    pub accent: Tint,
    /// Opaque page color behind the surface.
    pub backdrop: PackedRgba,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            tick_period: DEFAULT_TICK_PERIOD,
            reset_probability: DEFAULT_RESET_PROBABILITY,
            alphabet: DEFAULT_ALPHABET.chars().collect(),
            fade: Tint::new(10, 25, 47, 0.02),
            accent: Tint::new(100, 255, 218, 0.35),
            backdrop: PackedRgba::rgb(10, 25, 47),
            seed: None,
        }
    }
}

impl RainConfig {
    /// Replace the alphabet.
    #[must_use]
    pub fn with_alphabet(mut self, alphabet: &str) -> Self {
        self.alphabet = alphabet.chars().collect();
        self
    }

    /// Fix the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the tick period.
    #[must_use]
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Set the reset probability.
    #[must_use]
    pub fn with_reset_probability(mut self, p: f64) -> Self {
        self.reset_probability = p;
        self
    }

    /// Check every field that could make a tick misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.font_size == 0 {
            return Err(ConfigError::ZeroFontSize);
        }
        if self.tick_period.is_zero() {
            return Err(ConfigError::ZeroTickPeriod);
        }
        let p = self.reset_probability;
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::ResetProbability(p));
        }
        for (which, tint) in [("fade", self.fade), ("accent", self.accent)] {
            if !tint.opacity_in_range() {
                return Err(ConfigError::Opacity {
                    which,
                    value: tint.opacity,
                });
            }
        }
        Ok(())
    }
}
