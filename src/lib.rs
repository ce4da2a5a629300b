//! `case-curves` library crate.
//!
//! The binary (`cases`) is a thin wrapper around this library so that:
//!
//! - the selection pipeline is testable without spawning processes
//! - every front-end (text report, ASCII plot, JSON, TUI) shares one pipeline
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod series;
pub mod tui;
