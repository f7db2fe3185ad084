#![forbid(unsafe_code)]

//! Rainfall terminal front end: CLI parsing, logging setup, and the
//! full-screen event loop.

pub mod app;
pub mod cli;
pub mod logging;
