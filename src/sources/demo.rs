// =============================================================================
// Demo Data Source — Deterministic simulated feeds
// =============================================================================
//
// Serves the same simulated datasets the HyperHub dashboard ships with:
// five curated headlines, five whale trades, and a 12-point hourly
// open-interest series generated from a fixed formula. Only timestamps vary
// between calls (they are anchored to "now" so the dashboard shows fresh
// relative ages); every scored quantity is identical on every call.
// =============================================================================

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::sources::DataSource;
use crate::types::{NewsItem, OpenInterestSample, Side, WhaleEvent};

/// Number of points in the simulated open-interest series.
const OI_SERIES_LEN: i64 = 12;

pub struct DemoSource;

impl DemoSource {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataSource for DemoSource {
    async fn fetch_headlines(&self) -> Result<Vec<NewsItem>> {
        Ok(demo_headlines())
    }

    async fn fetch_whale_events(&self) -> Result<Vec<WhaleEvent>> {
        Ok(demo_whale_events())
    }

    async fn fetch_open_interest(&self) -> Result<Vec<OpenInterestSample>> {
        Ok(demo_oi_series(Utc::now().timestamp()))
    }
}

// =============================================================================
// Dataset builders
// =============================================================================

fn demo_headlines() -> Vec<NewsItem> {
    let now = Utc::now();
    let item = |title: &str, source: &str, minutes_ago: i64| NewsItem {
        source: source.to_string(),
        title: title.to_string(),
        link: String::new(),
        published_at: (now - Duration::minutes(minutes_ago)).to_rfc3339(),
        description: String::new(),
    };

    vec![
        item("Hyperliquid open interest hits new weekly high", "Community", 15),
        item("HYPE funding turns positive across majors", "Derivatives", 45),
        item("Top trader rotates size into HYPE/USDC", "On-chain", 120),
        item("Basis normalizes after sharp unwind", "Futures", 180),
        item("BTC range compresses while perps stay elevated", "Market", 300),
    ]
}

fn demo_whale_events() -> Vec<WhaleEvent> {
    let now = Utc::now();
    let event = |pair: &str, side: Side, size_usd: f64, minutes_ago: i64| WhaleEvent {
        tx_hash: format!("0x{}", Uuid::new_v4().simple()),
        pair: pair.to_string(),
        side,
        size_usd,
        observed_at: (now - Duration::minutes(minutes_ago)).to_rfc3339(),
    };

    vec![
        event("HYPE/USDC", Side::Long, 250_000.0, 3),
        event("HYPE/ETH", Side::Short, 180_000.0, 40),
        event("BTC/USDC", Side::Long, 500_000.0, 120),
        event("ETH/USDC", Side::Short, 320_000.0, 180),
        event("SOL/USDC", Side::Long, 210_000.0, 360),
    ]
}

/// Simulated hourly open-interest series ending at `now_ts`.
///
/// longs  = 1_000_000 + i*20_000 + (i mod 3)*50_000
/// shorts =   800_000 + i*15_000 + ((i+1) mod 4)*30_000
fn demo_oi_series(now_ts: i64) -> Vec<OpenInterestSample> {
    (0..OI_SERIES_LEN)
        .map(|i| OpenInterestSample {
            ts: now_ts - (OI_SERIES_LEN - 1 - i) * 3600,
            longs: 1_000_000.0 + (i as f64) * 20_000.0 + ((i % 3) as f64) * 50_000.0,
            shorts: 800_000.0 + (i as f64) * 15_000.0 + (((i + 1) % 4) as f64) * 30_000.0,
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring;

    #[test]
    fn oi_series_has_twelve_hourly_points() {
        let series = demo_oi_series(1_700_000_000);
        assert_eq!(series.len(), 12);
        for pair in series.windows(2) {
            assert_eq!(pair[1].ts - pair[0].ts, 3600);
        }
        assert_eq!(series.last().unwrap().ts, 1_700_000_000);
    }

    #[test]
    fn oi_series_matches_the_generator_formula() {
        let series = demo_oi_series(0);
        assert_eq!(series[0].longs, 1_000_000.0);
        assert_eq!(series[0].shorts, 830_000.0);
        assert_eq!(series[11].longs, 1_320_000.0);
        assert_eq!(series[11].shorts, 965_000.0);
    }

    #[test]
    fn oi_series_is_deterministic_given_an_anchor() {
        let a = demo_oi_series(42);
        let b = demo_oi_series(42);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.longs, y.longs);
            assert_eq!(x.shorts, y.shorts);
            assert_eq!(x.ts, y.ts);
        }
    }

    #[test]
    fn demo_whales_total_1_46_million() {
        let total: f64 = demo_whale_events().iter().map(|e| e.size_usd).sum();
        assert_eq!(total, 1_460_000.0);
    }

    #[test]
    fn demo_whale_tx_hashes_are_unique() {
        let events = demo_whale_events();
        for (i, a) in events.iter().enumerate() {
            for b in &events[i + 1..] {
                assert_ne!(a.tx_hash, b.tx_hash);
            }
        }
    }

    #[test]
    fn demo_headlines_score_bullish() {
        // Exactly one keyword hit across the set ("positive"), so the
        // sentiment scorer reports 100.
        let titles: Vec<String> = demo_headlines().into_iter().map(|n| n.title).collect();
        let result = scoring::score_headlines(&titles);
        assert_eq!(result.positive_hits, 1);
        assert_eq!(result.negative_hits, 0);
        assert_eq!(result.score, 100);
    }

    #[test]
    fn demo_oi_latest_sample_scores_68() {
        // Latest sample: longs 1_320_000, shorts 965_000 => ratio 1.3679
        // => round(68.39) = 68.
        let series = demo_oi_series(1_700_000_000);
        let result = scoring::score_open_interest(&series).unwrap();
        assert_eq!(result.score, 68);
    }
}
