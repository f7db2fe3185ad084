#![forbid(unsafe_code)]

//! Core: terminal lifecycle, geometry, clocks, and canonical events.

pub mod clock;
pub mod event;
pub mod geometry;
pub mod logging;
#[cfg(not(target_arch = "wasm32"))]
pub mod terminal_session;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};
