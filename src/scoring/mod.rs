// =============================================================================
// Market Health Scoring Module
// =============================================================================
//
// Aggregates three independent observations into a composite market-health
// index in [0, 100]:
//
//   1. Sentiment      — keyword scoring over news headlines
//   2. Whale flow     — log-compressed cumulative large-trade notional
//   3. Open interest  — long/short skew of the latest OI sample
//
// Each sub-scorer is a pure function of its input snapshot. The composite is
// the equal-weighted mean of the three components, recomputed whenever any
// of them changes — it is a derived value, never cached independently.
//
// Rounding is round-half-away-from-zero (`f64::round`) throughout; every
// rounded quantity here is non-negative, so this is plain half-up.

pub mod open_interest;
pub mod sentiment;
pub mod whale_flow;

pub use open_interest::{score_open_interest, OiBreakdown};
pub use sentiment::{score_headlines, SentimentBreakdown};
pub use whale_flow::{score_whale_flow, WhaleFlowBreakdown};

use chrono::Utc;
use serde::Serialize;

/// Equal-weighted composite of the three component scores.
pub fn composite_of(sentiment: u8, whales: u8, open_interest: u8) -> u8 {
    ((sentiment as f64 + whales as f64 + open_interest as f64) / 3.0).round() as u8
}

/// The four market-health components plus their scoring breakdowns.
///
/// One instance is the engine's entire output for a refresh cycle; the
/// surrounding application swaps the whole snapshot at once so readers never
/// observe a composite computed from mixed-cycle components.
#[derive(Debug, Clone, Serialize)]
pub struct MarketHealth {
    /// Headline sentiment score in [0, 100].
    pub sentiment: u8,
    /// Whale-flow score in [0, 100]. Lower = heavier whale volume.
    pub whales: u8,
    /// Open-interest skew score in [0, 100].
    pub open_interest: u8,
    /// Equal-weighted mean of the three components, rounded.
    pub composite: u8,

    /// Directional label for the composite: BULLISH / BEARISH / NEUTRAL.
    pub composite_bias: String,

    // Breakdown fields surfaced on the dashboard.
    pub positive_hits: u32,
    pub negative_hits: u32,
    pub total_whale_volume_usd: f64,
    pub long_short_ratio: f64,

    /// ISO 8601 timestamp of the last recompute.
    pub last_update: String,
}

impl Default for MarketHealth {
    fn default() -> Self {
        Self {
            sentiment: 50,
            whales: 50,
            open_interest: 50,
            composite: 50,
            composite_bias: bias_label(50).to_string(),
            positive_hits: 0,
            negative_hits: 0,
            total_whale_volume_usd: 0.0,
            long_short_ratio: 1.0,
            last_update: Utc::now().to_rfc3339(),
        }
    }
}

impl MarketHealth {
    /// Build the next snapshot from fresh scorer outputs.
    ///
    /// `oi` is `None` when the open-interest series was empty this cycle; the
    /// previous component value is retained in that case (no-signal policy)
    /// so the composite always averages three defined components.
    pub fn next(
        prev: &MarketHealth,
        sentiment: SentimentBreakdown,
        whales: WhaleFlowBreakdown,
        oi: Option<OiBreakdown>,
    ) -> MarketHealth {
        let (open_interest, long_short_ratio) = match oi {
            Some(breakdown) => (breakdown.score, breakdown.long_short_ratio),
            None => (prev.open_interest, prev.long_short_ratio),
        };

        let composite = composite_of(sentiment.score, whales.score, open_interest);

        MarketHealth {
            sentiment: sentiment.score,
            whales: whales.score,
            open_interest,
            composite,
            composite_bias: bias_label(composite).to_string(),
            positive_hits: sentiment.positive_hits,
            negative_hits: sentiment.negative_hits,
            total_whale_volume_usd: whales.total_volume_usd,
            long_short_ratio,
            last_update: Utc::now().to_rfc3339(),
        }
    }
}

/// Map a composite score to a directional bias label.
fn bias_label(composite: u8) -> &'static str {
    if composite > 60 {
        "BULLISH"
    } else if composite < 40 {
        "BEARISH"
    } else {
        "NEUTRAL"
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn sentiment(score: u8) -> SentimentBreakdown {
        SentimentBreakdown {
            score,
            positive_hits: 0,
            negative_hits: 0,
        }
    }

    fn whales(score: u8) -> WhaleFlowBreakdown {
        WhaleFlowBreakdown {
            score,
            total_volume_usd: 0.0,
        }
    }

    fn oi(score: u8) -> OiBreakdown {
        OiBreakdown {
            score,
            long_short_ratio: 1.0,
            latest_oi: 0.0,
        }
    }

    // ---- composite_of ----------------------------------------------------

    #[test]
    fn composite_of_equal_components() {
        assert_eq!(composite_of(50, 50, 50), 50);
    }

    #[test]
    fn composite_of_mixed_components() {
        assert_eq!(composite_of(100, 0, 50), 50);
        assert_eq!(composite_of(90, 80, 70), 80);
    }

    #[test]
    fn composite_rounds_half_up() {
        // (100 + 100 + 0) / 3 = 66.67 => 67; (50 + 50 + 51) / 3 = 50.33 => 50.
        assert_eq!(composite_of(100, 100, 0), 67);
        assert_eq!(composite_of(50, 50, 51), 50);
    }

    #[test]
    fn composite_always_in_range() {
        for s in [0u8, 25, 50, 75, 100] {
            for w in [0u8, 25, 50, 75, 100] {
                for o in [0u8, 25, 50, 75, 100] {
                    let c = composite_of(s, w, o);
                    assert!(c <= 100);
                }
            }
        }
    }

    // ---- MarketHealth ----------------------------------------------------

    #[test]
    fn default_snapshot_is_all_neutral() {
        let health = MarketHealth::default();
        assert_eq!(health.sentiment, 50);
        assert_eq!(health.whales, 50);
        assert_eq!(health.open_interest, 50);
        assert_eq!(health.composite, 50);
        assert_eq!(health.composite_bias, "NEUTRAL");
    }

    #[test]
    fn next_composes_fresh_components() {
        let prev = MarketHealth::default();
        let health = MarketHealth::next(&prev, sentiment(90), whales(80), Some(oi(70)));
        assert_eq!(health.sentiment, 90);
        assert_eq!(health.whales, 80);
        assert_eq!(health.open_interest, 70);
        assert_eq!(health.composite, 80);
        assert_eq!(health.composite_bias, "BULLISH");
    }

    #[test]
    fn next_retains_previous_oi_on_no_signal() {
        let prev = MarketHealth::default();
        let first = MarketHealth::next(&prev, sentiment(50), whales(50), Some(oi(90)));
        assert_eq!(first.open_interest, 90);

        // Next cycle has no OI series; component and ratio carry over.
        let second = MarketHealth::next(&first, sentiment(50), whales(50), None);
        assert_eq!(second.open_interest, 90);
        assert_eq!(second.composite, composite_of(50, 50, 90));
    }

    #[test]
    fn oi_defaults_to_neutral_before_first_signal() {
        let prev = MarketHealth::default();
        let health = MarketHealth::next(&prev, sentiment(100), whales(0), None);
        assert_eq!(health.open_interest, 50);
        assert_eq!(health.composite, 50);
    }

    #[test]
    fn bearish_bias_below_40() {
        let prev = MarketHealth::default();
        let health = MarketHealth::next(&prev, sentiment(10), whales(20), Some(oi(30)));
        assert_eq!(health.composite, 20);
        assert_eq!(health.composite_bias, "BEARISH");
    }
}
