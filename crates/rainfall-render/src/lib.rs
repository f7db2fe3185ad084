#![forbid(unsafe_code)]

//! Render kernel: cells, buffers, drawing surfaces, diffs, and ANSI
//! presentation.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod diff;
pub mod presenter;
pub mod surface;
