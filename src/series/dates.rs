//! Date normalization.
//!
//! Each row's `day` text is parsed as `YYYY-MM-DD`. Rows that fail (wrong
//! format, impossible calendar date, empty text) are dropped, not repaired.
//! The policy is lossy on purpose; the number of dropped rows is returned
//! alongside the survivors so callers can report or assert on it.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{CaseRecord, NormalizedRecord};

/// The only accepted `day` format.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Output of `normalize_dates`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateNormalization {
    /// Rows whose date parsed, in input order.
    pub records: Vec<NormalizedRecord>,
    /// Rows discarded because their date did not parse.
    pub dropped: usize,
}

/// Parse every record's date, dropping the ones that fail.
pub fn normalize_dates(records: Vec<CaseRecord>) -> DateNormalization {
    let total = records.len();
    let normalized: Vec<NormalizedRecord> = records
        .into_iter()
        .filter_map(|r| {
            let date = parse_day(&r.day)?;
            Some(NormalizedRecord {
                entity: r.entity,
                date,
                biweekly_cases: r.biweekly_cases,
            })
        })
        .collect();

    let dropped = total - normalized.len();
    if dropped > 0 {
        debug!(total, dropped, "dropped rows with unparseable dates");
    }

    DateNormalization {
        records: normalized,
        dropped,
    }
}

/// Parse a `YYYY-MM-DD` day string.
///
/// The layout is checked before chrono sees the text: `%Y-%m-%d` alone also
/// accepts short or signed years and unpadded months and days.
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    if !has_day_layout(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, DAY_FORMAT).ok()
}

fn has_day_layout(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
