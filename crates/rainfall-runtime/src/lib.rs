#![forbid(unsafe_code)]

//! Rainfall runtime
//!
//! The fixed-period falling-glyph loop and its schedule.
//!
//! # Key Components
//!
//! - [`RainLoop`] - mount / tick / resize / shutdown lifecycle
//! - [`RainState`] - per-column drop positions and the tick step
//! - [`Interval`] - host-polled fixed-period deadline
//! - [`RainConfig`] - tunables, validated at mount
//!
//! # How it fits in the system
//! The runtime draws through the `Surface` trait from `rainfall-render` and
//! never touches the terminal. Hosts feed it monotonic time and viewport
//! sizes, then present whatever the surface holds.

pub mod config;
pub mod rain;
pub mod rain_loop;
pub mod schedule;

pub use config::{ConfigError, RainConfig, Tint};
pub use rain::{RainState, TickReport};
pub use rain_loop::RainLoop;
pub use schedule::Interval;
