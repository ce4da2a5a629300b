//! Shared "selection pipeline" logic used by every front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! filter -> date normalization -> daily series -> sample
//!
//! The CLI report, the ASCII plot, JSON output and the TUI then only differ in
//! presentation.

use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::domain::{CaseTable, DailySeriesPoint, EntitySummary, SelectionOutput, SelectionStats};
use crate::series::{build_series, filter_entity, list_entities, normalize_dates, sample_series};

/// The full daily series for one entity plus how many rows fed it.
#[derive(Debug, Clone, Default)]
pub struct EntitySeries {
    pub series: Vec<DailySeriesPoint>,
    pub rows_matched: usize,
    pub dates_dropped: usize,
}

/// Filter, normalize and build the full daily series for `entity`.
pub fn entity_series(table: &CaseTable, entity: &str) -> EntitySeries {
    let rows = filter_entity(table, entity);
    let rows_matched = rows.len();

    let normalized = normalize_dates(rows);
    let series = build_series(normalized.records);

    EntitySeries {
        series,
        rows_matched,
        dates_dropped: normalized.dropped,
    }
}

/// Execute the selection pipeline and return what a renderer needs.
///
/// An entity with no rows produces an empty sample, not an error.
pub fn run_selection<R: Rng + ?Sized>(
    table: &CaseTable,
    entity: &str,
    sample_size: usize,
    rng: &mut R,
) -> SelectionOutput {
    let EntitySeries {
        series,
        rows_matched,
        dates_dropped,
    } = entity_series(table, entity);

    if dates_dropped > 0 {
        warn!(entity, dates_dropped, "rows dropped for unparseable dates");
    }

    let sample = sample_series(&series, sample_size, rng);
    let stats = SelectionStats {
        rows_matched,
        dates_dropped,
        series_len: series.len(),
        sample_len: sample.len(),
    };
    debug!(entity, ?stats, "selection complete");

    SelectionOutput {
        entity: entity.to_string(),
        sample,
        stats,
    }
}

/// Per-entity overview of the whole table, in first-seen entity order.
///
/// Selections only read the shared table, so entities are processed in
/// parallel.
pub fn summarize_entities(table: &CaseTable) -> Vec<EntitySummary> {
    let entities = list_entities(table);
    entities
        .into_par_iter()
        .map(|entity| {
            let run = entity_series(table, &entity);
            let peak_daily_cases = run
                .series
                .iter()
                .map(|p| p.daily_cases)
                .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));
            EntitySummary {
                first_date: run.series.first().map(|p| p.date),
                last_date: run.series.last().map(|p| p.date),
                peak_daily_cases,
                rows: run.rows_matched,
                dates_dropped: run.dates_dropped,
                entity,
            }
        })
        .collect()
}
