//! Series derivation for one selected entity.
//!
//! Responsibilities:
//!
//! - list selectable entities in first-seen order
//! - project the table onto one entity
//! - parse dates (dropping rows that fail) and derive the daily rate
//! - draw a bounded, chronological sample for display

pub mod builder;
pub mod dates;
pub mod entities;
pub mod filter;
pub mod sampler;

pub use builder::*;
pub use dates::*;
pub use entities::*;
pub use filter::*;
pub use sampler::*;
