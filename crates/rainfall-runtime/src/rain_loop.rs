#![forbid(unsafe_code)]

//! The background render loop.
//!
//! [`RainLoop`] ties together a [`Surface`], the per-column [`RainState`], an
//! RNG, and a fixed-period [`Interval`]. The host owns time: it calls
//! [`RainLoop::advance`] with the current monotonic time and forwards viewport
//! changes to [`RainLoop::on_resize`].
//!
//! # Lifecycle
//!
//! ```text
//! mount ──► running ──(shutdown)──► stopped
//!   │
//!   └─(no surface)──► inert (never draws)
//! ```
//!
//! ```
//! use std::time::Duration;
//! use rainfall_core::geometry::PixelSize;
//! use rainfall_render::surface::RecordingSurface;
//! use rainfall_runtime::{RainConfig, RainLoop};
//!
//! let viewport = PixelSize::new(140, 100);
//! let config = RainConfig::default().with_seed(1);
//! let mut rain = RainLoop::mount(config, viewport, Some(RecordingSurface::new(viewport)), Duration::ZERO)?;
//! assert!(rain.advance(Duration::from_millis(33)));
//! assert_eq!(rain.state().drops(), &[2; 10]);
//! rain.shutdown();
//! assert!(!rain.advance(Duration::from_secs(10)));
//! # Ok::<(), rainfall_runtime::ConfigError>(())
//! ```

use std::time::Duration;

use rainfall_core::geometry::PixelSize;
use rainfall_render::surface::Surface;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::config::{ConfigError, RainConfig};
use crate::rain::{RainState, TickReport};
use crate::schedule::Interval;

/// A mounted falling-glyph loop drawing onto `S`.
#[derive(Debug)]
pub struct RainLoop<S, R = StdRng> {
    config: RainConfig,
    surface: Option<S>,
    state: RainState,
    rng: R,
    interval: Interval,
    resize_attached: bool,
    tick_count: u64,
}

impl<S: Surface> RainLoop<S, StdRng> {
    /// Mount with an RNG seeded from `config.seed`, or from entropy.
    pub fn mount(
        config: RainConfig,
        viewport: PixelSize,
        surface: Option<S>,
        now: Duration,
    ) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::mount_with_rng(config, viewport, surface, rng, now)
    }
}

impl<S: Surface, R: Rng> RainLoop<S, R> {
    /// Mount with an explicit RNG.
    ///
    /// Sizes the surface to `viewport`, allocates one drop per column and
    /// starts the schedule. Without a surface the loop is inert.
    pub fn mount_with_rng(
        config: RainConfig,
        viewport: PixelSize,
        mut surface: Option<S>,
        rng: R,
        now: Duration,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let state = RainState::new(viewport.width, config.font_size);
        let mut interval = Interval::start(config.tick_period, now);

        match surface.as_mut() {
            Some(surface) => {
                surface.resize(viewport);
                info!(
                    width = viewport.width,
                    height = viewport.height,
                    columns = state.columns(),
                    period_ms = config.tick_period.as_millis() as u64,
                    "rain loop mounted"
                );
            }
            None => {
                interval.cancel();
                info!("no drawing surface; rain loop is inert");
            }
        }

        let resize_attached = surface.is_some();
        Ok(Self {
            config,
            surface,
            state,
            rng,
            interval,
            resize_attached,
            tick_count: 0,
        })
    }

    /// Run one tick now, regardless of the schedule.
    ///
    /// Does nothing once shut down or when inert.
    pub fn tick(&mut self) -> TickReport {
        if !self.interval.is_active() {
            return TickReport::default();
        }
        let Some(surface) = self.surface.as_mut() else {
            return TickReport::default();
        };

        let report = self.state.step(surface, &mut self.rng, &self.config);
        self.tick_count = self.tick_count.saturating_add(1);
        trace!(
            tick = self.tick_count,
            glyphs = report.glyphs,
            resets = report.resets,
            "tick"
        );
        report
    }

    /// Tick if the schedule is due at `now`. Returns whether a tick ran.
    pub fn advance(&mut self, now: Duration) -> bool {
        if !self.interval.poll(now) {
            return false;
        }
        self.tick();
        true
    }

    /// Re-fit the surface to a new viewport. Drops are left alone.
    pub fn on_resize(&mut self, size: PixelSize) {
        if !self.resize_attached {
            return;
        }
        if let Some(surface) = self.surface.as_mut() {
            debug!(width = size.width, height = size.height, "surface resized");
            surface.resize(size);
        }
    }

    /// Cancel the schedule and detach resize handling. Idempotent.
    pub fn shutdown(&mut self) {
        if !self.interval.is_active() && !self.resize_attached {
            return;
        }
        self.interval.cancel();
        self.resize_attached = false;
        info!(ticks = self.tick_count, "rain loop shut down");
    }

    /// Whether ticks are still scheduled.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.interval.is_active()
    }

    /// Time until the next scheduled tick, or `None` when not running.
    pub fn time_until_next_tick(&self, now: Duration) -> Option<Duration> {
        self.interval.time_until_due(now)
    }

    /// Ticks run so far.
    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Drop positions.
    #[inline]
    pub fn state(&self) -> &RainState {
        &self.state
    }

    /// Active configuration.
    #[inline]
    pub fn config(&self) -> &RainConfig {
        &self.config
    }

    /// The drawing surface, if any.
    #[inline]
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rainfall_render::surface::RecordingSurface;

    const P: Duration = Duration::from_millis(33);

    fn mount(viewport: PixelSize) -> RainLoop<RecordingSurface> {
        let surface = RecordingSurface::new(PixelSize::new(1, 1));
        RainLoop::mount(
            RainConfig::default().with_seed(3),
            viewport,
            Some(surface),
            Duration::ZERO,
        )
        .unwrap()
    }

    #[test]
    fn mount_sizes_surface_to_viewport() {
        let rain = mount(PixelSize::new(140, 100));
        let surface = rain.surface().unwrap();
        assert_eq!(surface.size(), PixelSize::new(140, 100));
        assert_eq!(surface.draw_count(), 0);
        assert!(rain.is_running());
    }

    #[test]
    fn mount_rejects_invalid_config() {
        let config = RainConfig::default().with_reset_probability(3.0);
        let err = RainLoop::mount(
            config,
            PixelSize::new(10, 10),
            Some(RecordingSurface::default()),
            Duration::ZERO,
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::ResetProbability(3.0));
    }

    #[test]
    fn advance_waits_for_deadline() {
        let mut rain = mount(PixelSize::new(28, 100));
        assert!(!rain.advance(Duration::from_millis(32)));
        assert!(rain.advance(P));
        assert!(!rain.advance(P));
        assert_eq!(rain.tick_count(), 1);
        assert_eq!(rain.time_until_next_tick(P), Some(P));
    }

    #[test]
    fn inert_without_surface() {
        let mut rain: RainLoop<RecordingSurface> = RainLoop::mount(
            RainConfig::default(),
            PixelSize::new(140, 100),
            None,
            Duration::ZERO,
        )
        .unwrap();
        assert!(!rain.is_running());
        assert!(!rain.advance(Duration::from_secs(1)));
        assert_eq!(rain.tick(), TickReport::default());
        rain.on_resize(PixelSize::new(10, 10));
        rain.shutdown();
        assert_eq!(rain.state().drops(), &[1; 10]);
    }

    #[test]
    fn zero_width_viewport_is_an_empty_loop() {
        let mut rain = mount(PixelSize::new(0, 100));
        assert_eq!(rain.state().columns(), 0);
        assert!(rain.advance(P));
        let surface = rain.surface().unwrap();
        assert_eq!(surface.glyph_count(), 0);
        assert_eq!(surface.fill_count(), 1);
    }

    #[test]
    fn shutdown_is_idempotent_and_detaches_resize() {
        let mut rain = mount(PixelSize::new(28, 28));
        rain.shutdown();
        rain.shutdown();
        rain.on_resize(PixelSize::new(280, 280));
        assert_eq!(rain.surface().unwrap().size(), PixelSize::new(28, 28));
        assert_eq!(rain.tick(), TickReport::default());
    }
}
