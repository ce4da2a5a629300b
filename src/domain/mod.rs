//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the source table and its column contract (`CaseTable`, `TableSchema`)
//! - per-stage records (`CaseRecord`, `NormalizedRecord`, `DailySeriesPoint`)
//! - selection outputs handed to renderers (`SelectionOutput`, `EntitySummary`)

pub mod types;

pub use types::*;
