//! Daily case-rate derivation.
//!
//! The source column counts cases over a trailing 14-day window, so the
//! per-day estimate is that count divided by 14. Irregular reporting
//! intervals are not corrected for.

use crate::domain::{BIWEEKLY_WINDOW_DAYS, DailySeriesPoint, NormalizedRecord};

/// Sort records by date (stable) and derive `daily_cases` for each.
///
/// Duplicate dates stay as separate points. Negative inputs pass through
/// the division unchanged.
pub fn build_series(mut records: Vec<NormalizedRecord>) -> Vec<DailySeriesPoint> {
    records.sort_by_key(|r| r.date);
    records
        .into_iter()
        .map(|r| DailySeriesPoint {
            date: r.date,
            daily_cases: daily_rate(r.biweekly_cases),
        })
        .collect()
}

/// Convert a biweekly total into a per-day rate.
pub fn daily_rate(biweekly_cases: f64) -> f64 {
    biweekly_cases / BIWEEKLY_WINDOW_DAYS
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(date: &str, cases: f64) -> NormalizedRecord {
        NormalizedRecord {
            entity: "Brazil".to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            biweekly_cases: cases,
        }
    }

    #[test]
    fn divides_by_fourteen_exactly() {
        let series = build_series(vec![record("2020-01-01", 140.0)]);
        assert_eq!(series[0].daily_cases, 10.0);
        assert_eq!(daily_rate(7.0), 0.5);
    }

    #[test]
    fn output_is_chronological() {
        let series = build_series(vec![
            record("2020-03-01", 1.0),
            record("2020-01-01", 2.0),
            record("2020-02-01", 3.0),
            record("2019-12-31", 4.0),
        ]);
        assert!(series.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(series[0].date.to_string(), "2019-12-31");
    }

    #[test]
    fn sort_is_stable_for_duplicate_dates() {
        let series = build_series(vec![
            record("2020-01-02", 14.0),
            record("2020-01-01", 28.0),
            record("2020-01-02", 42.0),
        ]);
        let values: Vec<f64> = series.iter().map(|p| p.daily_cases).collect();
        assert_eq!(values, vec![2.0, 1.0, 3.0]);
    }

    #[test]
    fn negative_values_are_not_clamped() {
        let series = build_series(vec![record("2020-01-01", -28.0)]);
        assert_eq!(series[0].daily_cases, -2.0);
    }

    #[test]
    fn empty_input_builds_empty_series() {
        assert!(build_series(Vec::new()).is_empty());
    }
}
