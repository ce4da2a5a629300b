//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pipeline code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use chrono::NaiveDate;

use crate::domain::{CaseRecord, CaseTable, DailySeriesPoint, EntitySummary, SelectionOutput};

/// Format the selection header (source + row accounting).
pub fn format_selection_summary(table: &CaseTable, output: &SelectionOutput) -> String {
    let mut out = String::new();
    let stats = &output.stats;

    out.push_str(&format!("=== Daily COVID-19 cases in {} ===\n", output.entity));
    if let Some(source) = &table.source {
        out.push_str(&format!("Source: {}\n", source.display()));
    }
    out.push_str(&format!(
        "Rows: table={} | matched={} | dropped (bad date)={}\n",
        table.len(),
        stats.rows_matched,
        stats.dates_dropped,
    ));

    match (output.sample.first(), output.sample.last()) {
        (Some(first), Some(last)) => out.push_str(&format!(
            "Series: n={} | sample n={} | sample range {} .. {}\n",
            stats.series_len, stats.sample_len, first.date, last.date,
        )),
        _ if stats.series_len > 0 => out.push_str(&format!(
            "Series: n={} | sample n=0 (nothing sampled)\n",
            stats.series_len,
        )),
        _ => out.push_str("Series: no data for this entity\n"),
    }

    out
}

/// Format the first `n` filtered source rows, as read.
pub fn format_preview(rows: &[CaseRecord], n: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<24} {:<12} {:>14}\n", "entity", "day", "biweekly"));
    out.push_str(&format!("{:-<24} {:-<12} {:-<14}\n", "", "", ""));
    for r in rows.iter().take(n) {
        out.push_str(&format!(
            "{:<24} {:<12} {:>14.2}\n",
            truncate(&r.entity, 24),
            truncate(&r.day, 12),
            r.biweekly_cases,
        ));
    }
    if rows.len() > n {
        out.push_str(&format!("... {} more row(s)\n", rows.len() - n));
    }
    out
}

/// Format the sampled points as a two-column table.
pub fn format_sample_table(sample: &[DailySeriesPoint]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<12} {:>14}\n", "date", "daily_cases"));
    out.push_str(&format!("{:-<12} {:-<14}\n", "", ""));
    for p in sample {
        out.push_str(&format!("{:<12} {:>14.2}\n", p.date, p.daily_cases));
    }
    out
}

/// Format the per-entity overview table.
pub fn format_entity_summary(rows: &[EntitySummary]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<32} {:>6} {:>7} {:<10} {:<10} {:>8}\n",
            "entity", "rows", "dropped", "first", "last", "peak/day"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(&format!(
        "{:-<32} {:-<6} {:-<7} {:-<10} {:-<10} {:-<8}\n",
        "", "", "", "", "", ""
    ));

    for r in rows {
        out.push_str(
            format!(
                "{:<32} {:>6} {:>7} {:<10} {:<10} {:>8}\n",
                truncate(&r.entity, 32),
                r.rows,
                r.dates_dropped,
                fmt_opt_date(r.first_date),
                fmt_opt_date(r.last_date),
                r.peak_daily_cases.map(fmt_compact).unwrap_or_else(|| "-".to_string()),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Compact magnitude label used on value axes: `12`, `3K`, `2M`.
pub fn fmt_compact(v: f64) -> String {
    if v >= 1e6 {
        format!("{:.0}M", v * 1e-6)
    } else if v >= 1e3 {
        format!("{:.0}K", v * 1e-3)
    } else {
        format!("{v:.0}")
    }
}

/// Month-and-year label used on date axes, e.g. `Mar 2021`.
pub fn fmt_month(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

fn fmt_opt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
