// =============================================================================
// Open-Interest Skew Scorer — Long/short positioning of the latest sample
// =============================================================================
//
// Scores the long/short skew of the most recent open-interest sample into
// [0, 100]:
//
//   ratio = longs / max(1, shorts)        (floor avoids division by zero)
//   score = clamp(round(ratio / 2 * 100), 0, 100)
//
// A ratio of 2.0 (twice as many longs as shorts) maps to 100, 1.0 maps to
// 50, 0 maps to 0. Only the last sample matters; the rest of the series is
// dashboard material.
//
// An empty series is NO SIGNAL, not a neutral reading: the scorer returns
// `None` and the caller keeps its previous component value instead of
// substituting 50.
// =============================================================================

use serde::Serialize;

use crate::types::OpenInterestSample;

/// Result of scoring an open-interest series.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OiBreakdown {
    /// Open-interest skew score in [0, 100]. 50 means balanced.
    pub score: u8,
    /// Long/short ratio of the latest sample.
    pub long_short_ratio: f64,
    /// Total open interest (longs + shorts) of the latest sample.
    pub latest_oi: f64,
}

/// Score an ordered-by-time open-interest series.
///
/// Returns `None` when the series is empty — an absent time series is a
/// different condition from balanced positioning.
pub fn score_open_interest(series: &[OpenInterestSample]) -> Option<OiBreakdown> {
    let latest = series.last()?;

    let ratio = latest.long_short_ratio();
    let score = (ratio / 2.0 * 100.0).round().clamp(0.0, 100.0) as u8;

    Some(OiBreakdown {
        score,
        long_short_ratio: ratio,
        latest_oi: latest.oi(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn sample(longs: f64, shorts: f64) -> OpenInterestSample {
        OpenInterestSample {
            ts: 1_700_000_000,
            longs,
            shorts,
        }
    }

    #[test]
    fn empty_series_is_no_signal() {
        assert!(score_open_interest(&[]).is_none());
    }

    #[test]
    fn balanced_sample_scores_50() {
        let result = score_open_interest(&[sample(1_000_000.0, 1_000_000.0)]).unwrap();
        assert_eq!(result.score, 50);
        assert!((result.long_short_ratio - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn long_heavy_sample_scores_63() {
        // ratio = 1_000_000 / 800_000 = 1.25 => 62.5, rounds half-up to 63.
        let result = score_open_interest(&[sample(1_000_000.0, 800_000.0)]).unwrap();
        assert_eq!(result.score, 63);
        assert!((result.latest_oi - 1_800_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn double_longs_scores_100() {
        let result = score_open_interest(&[sample(2_000_000.0, 1_000_000.0)]).unwrap();
        assert_eq!(result.score, 100);
    }

    #[test]
    fn zero_longs_scores_0() {
        let result = score_open_interest(&[sample(0.0, 500_000.0)]).unwrap();
        assert_eq!(result.score, 0);
        assert_eq!(result.long_short_ratio, 0.0);
    }

    #[test]
    fn zero_shorts_uses_unit_floor() {
        // ratio = 5 / max(1, 0) = 5.0 => 250, clamped to 100.
        let result = score_open_interest(&[sample(5.0, 0.0)]).unwrap();
        assert!((result.long_short_ratio - 5.0).abs() < f64::EPSILON);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn only_the_last_sample_counts() {
        let series = [
            sample(10_000_000.0, 1_000_000.0), // extreme skew, ignored
            sample(900_000.0, 900_000.0),
        ];
        let result = score_open_interest(&series).unwrap();
        assert_eq!(result.score, 50);
    }

    #[test]
    fn score_always_in_range() {
        let cases = [
            sample(0.0, 0.0),
            sample(1.0, 0.0),
            sample(1e9, 1.0),
            sample(1.0, 1e9),
            sample(123_456.0, 654_321.0),
        ];
        for case in cases {
            let result = score_open_interest(&[case]).unwrap();
            assert!(result.score <= 100);
        }
    }
}
