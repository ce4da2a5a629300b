//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - produced once at load time (`CaseRecord`, `CaseTable`)
//! - recomputed on every entity selection (`NormalizedRecord`, `DailySeriesPoint`)
//! - handed to renderers or serialized to JSON (`SelectionOutput`)

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Length of the reporting window behind the `Biweekly cases` column.
pub const BIWEEKLY_WINDOW_DAYS: f64 = 14.0;

/// Number of points drawn for display when the caller does not choose.
pub const DEFAULT_SAMPLE_SIZE: usize = 50;

/// File name used when no CSV path is configured.
pub const DEFAULT_DATA_FILE: &str = "biweekly-confirmed-covid-19-cases.csv";

/// Column-name contract of the source table.
///
/// The loader resolves these names to column positions exactly once; every
/// later stage works with typed `CaseRecord` fields instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub entity: String,
    pub day: String,
    pub biweekly_cases: String,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self {
            entity: "Entity".to_string(),
            day: "Day".to_string(),
            biweekly_cases: "Biweekly cases".to_string(),
        }
    }
}

impl TableSchema {
    /// Required column names in declaration order.
    pub fn columns(&self) -> [&str; 3] {
        [&self.entity, &self.day, &self.biweekly_cases]
    }
}

/// A raw row of the source table.
///
/// `day` is kept as text: date validity is checked per selection, not at load.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRecord {
    pub entity: String,
    pub day: String,
    /// Confirmed cases over the trailing 14-day window.
    pub biweekly_cases: f64,
}

/// The loaded source table.
#[derive(Debug, Clone)]
pub struct CaseTable {
    /// Where the table was read from (`None` for in-memory readers).
    pub source: Option<PathBuf>,
    pub schema: TableSchema,
    pub records: Vec<CaseRecord>,
}

impl CaseTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A `CaseRecord` whose `day` parsed into a calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub entity: String,
    pub date: NaiveDate,
    pub biweekly_cases: f64,
}

/// One point of the derived daily case-rate series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailySeriesPoint {
    pub date: NaiveDate,
    /// `biweekly_cases / 14`.
    pub daily_cases: f64,
}

/// Row counts observed while running one selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionStats {
    /// Rows whose entity matched the selection.
    pub rows_matched: usize,
    /// Matched rows discarded because their date did not parse.
    pub dates_dropped: usize,
    /// Points in the full derived series.
    pub series_len: usize,
    /// Points kept for display.
    pub sample_len: usize,
}

/// Everything a renderer needs for one selected entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionOutput {
    pub entity: String,
    /// Chronologically ordered sample of the daily series.
    pub sample: Vec<DailySeriesPoint>,
    pub stats: SelectionStats,
}

impl SelectionOutput {
    /// `true` when the selection produced nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.sample.is_empty()
    }
}

/// Per-entity overview row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub entity: String,
    pub rows: usize,
    pub dates_dropped: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub peak_daily_cases: Option<f64>,
}

/// A full run's configuration as understood by the adapters.
///
/// This is derived from CLI flags (plus `.env` and defaults).
#[derive(Debug, Clone)]
pub struct SeriesConfig {
    pub csv_path: PathBuf,
    pub schema: TableSchema,
    pub entity: Option<String>,
    pub sample_size: usize,
    /// Seed for the sampler; `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Number of filtered rows to preview before the sample table.
    pub preview_rows: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_DATA_FILE),
            schema: TableSchema::default(),
            entity: None,
            sample_size: DEFAULT_SAMPLE_SIZE,
            seed: None,
            preview_rows: 5,
            plot: true,
            plot_width: 100,
            plot_height: 25,
        }
    }
}
