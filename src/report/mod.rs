//! Reporting utilities: formatted terminal output for selections.
//!
//! The pipeline never formats numbers or dates for display; every adapter
//! goes through the helpers here.

pub mod format;

pub use format::*;
