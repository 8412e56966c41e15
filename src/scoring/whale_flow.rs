// =============================================================================
// Whale-Flow Scorer — Log-compressed notional pressure
// =============================================================================
//
// Scores recent whale (large single trade) activity into [0, 100], where a
// LOWER score means heavier cumulative whale volume:
//
//   total = sum of size_usd over all events
//   score = clamp(100 - round(log10(1 + total) * 10), 0, 100)
//
// Log-scaling compresses dollar ranges spanning many orders of magnitude
// into the bounded score. Zero observed volume scores 100 (no whale
// pressure); roughly $1B of cumulative notional drives the score to 10.
// =============================================================================

use serde::Serialize;

use crate::types::WhaleEvent;

/// Result of scoring one whale-event batch.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WhaleFlowBreakdown {
    /// Whale-flow score in [0, 100]. 100 means no whale pressure.
    pub score: u8,
    /// Cumulative notional across the batch, USD.
    pub total_volume_usd: f64,
}

impl Default for WhaleFlowBreakdown {
    fn default() -> Self {
        Self {
            score: 100,
            total_volume_usd: 0.0,
        }
    }
}

/// Score a batch of whale events.
///
/// # Edge cases
/// - Empty batch => 100 (no pressure), total volume 0.
/// - The score is monotonically non-increasing in cumulative volume.
pub fn score_whale_flow(events: &[WhaleEvent]) -> WhaleFlowBreakdown {
    let total_volume_usd: f64 = events.iter().map(|e| e.size_usd).sum();

    if total_volume_usd <= 0.0 {
        return WhaleFlowBreakdown::default();
    }

    let raw = 100 - ((1.0 + total_volume_usd).log10() * 10.0).round() as i64;
    let score = raw.clamp(0, 100) as u8;

    WhaleFlowBreakdown {
        score,
        total_volume_usd,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;

    fn event(size_usd: f64) -> WhaleEvent {
        WhaleEvent {
            tx_hash: "0xtest".to_string(),
            pair: "HYPE/USDC".to_string(),
            side: Side::Long,
            size_usd,
            observed_at: String::new(),
        }
    }

    #[test]
    fn empty_batch_scores_100() {
        let result = score_whale_flow(&[]);
        assert_eq!(result.score, 100);
        assert_eq!(result.total_volume_usd, 0.0);
    }

    #[test]
    fn zero_sized_events_score_100() {
        let result = score_whale_flow(&[event(0.0), event(0.0)]);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn demo_batch_scores_40() {
        // 250k + 180k + 500k = 930k total.
        // log10(930_001) * 10 = 59.68..., rounds to 60 => 100 - 60 = 40.
        let result = score_whale_flow(&[event(250_000.0), event(180_000.0), event(500_000.0)]);
        assert_eq!(result.total_volume_usd, 930_000.0);
        assert_eq!(result.score, 40);
    }

    #[test]
    fn small_volume_barely_dents_the_score() {
        // log10(10) * 10 = 10 => 90.
        let result = score_whale_flow(&[event(9.0)]);
        assert_eq!(result.score, 90);
    }

    #[test]
    fn extreme_volume_clamps_at_0() {
        // log10(1e12) * 10 = 120 => raw -20, clamped to 0.
        let result = score_whale_flow(&[event(1e12)]);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn score_never_increases_with_more_volume() {
        let mut events = Vec::new();
        let mut prev = score_whale_flow(&events).score;
        for _ in 0..20 {
            events.push(event(50_000.0));
            let next = score_whale_flow(&events).score;
            assert!(next <= prev, "score increased from {prev} to {next}");
            prev = next;
        }
    }

    #[test]
    fn score_always_in_range() {
        for magnitude in 0..15 {
            let result = score_whale_flow(&[event(10f64.powi(magnitude))]);
            assert!(result.score <= 100);
        }
    }
}
