//! Bounded, chronological sampling for display.
//!
//! Randomness is always supplied by the caller so a fixed seed reproduces
//! the same sample.

use rand::Rng;
use rand::seq::index;

use crate::domain::DailySeriesPoint;

/// Draw up to `size` points without replacement, returned in date order.
///
/// When the series has `size` points or fewer, every point is returned and
/// `rng` is not consulted.
pub fn sample_series<R: Rng + ?Sized>(
    series: &[DailySeriesPoint],
    size: usize,
    rng: &mut R,
) -> Vec<DailySeriesPoint> {
    let mut out: Vec<DailySeriesPoint> = if series.len() <= size {
        series.to_vec()
    } else {
        let mut picked = index::sample(rng, series.len(), size).into_vec();
        // Ascending indices keep ties in series order after the date sort.
        picked.sort_unstable();
        picked.into_iter().map(|i| series[i]).collect()
    };

    out.sort_by_key(|p| p.date);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn series(n: usize) -> Vec<DailySeriesPoint> {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        (0..n)
            .map(|i| DailySeriesPoint {
                date: start + Duration::days(i as i64),
                daily_cases: i as f64,
            })
            .collect()
    }

    #[test]
    fn small_series_is_returned_whole() {
        let s = series(10);
        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(sample_series(&s, 50, &mut rng), s);
        }
    }

    #[test]
    fn small_series_is_sorted_even_if_input_is_not() {
        let mut s = series(5);
        s.reverse();
        let mut rng = StdRng::seed_from_u64(1);
        let out = sample_series(&s, 50, &mut rng);
        assert!(out.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn large_series_is_bounded_distinct_and_sorted() {
        let s = series(1000);
        let mut rng = StdRng::seed_from_u64(7);
        let out = sample_series(&s, 50, &mut rng);

        assert_eq!(out.len(), 50);
        assert!(out.windows(2).all(|w| w[0].date < w[1].date));
        let dates: HashSet<NaiveDate> = out.iter().map(|p| p.date).collect();
        assert_eq!(dates.len(), 50);
        assert!(out.iter().all(|p| s.contains(p)));
    }

    #[test]
    fn same_seed_same_sample() {
        let s = series(300);
        let a = sample_series(&s, 20, &mut StdRng::seed_from_u64(42));
        let b = sample_series(&s, 20, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn exact_size_returns_everything() {
        let s = series(50);
        let out = sample_series(&s, 50, &mut StdRng::seed_from_u64(3));
        assert_eq!(out, s);
    }

    #[test]
    fn empty_series_and_zero_size() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(sample_series(&[], 50, &mut rng).is_empty());
        assert!(sample_series(&series(10), 0, &mut rng).is_empty());
    }
}
