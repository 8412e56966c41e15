// =============================================================================
// Shared types used across the HyperHub backend
// =============================================================================

use serde::{Deserialize, Serialize};

/// Which data-source implementation feeds the scoring engine.
///
/// Chosen at configuration time; `Demo` serves deterministic simulated data,
/// `Live` polls the configured external endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataMode {
    Demo,
    Live,
}

impl Default for DataMode {
    fn default() -> Self {
        Self::Demo
    }
}

impl std::fmt::Display for DataMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Demo => write!(f, "Demo"),
            Self::Live => write!(f, "Live"),
        }
    }
}

/// Direction of a whale trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Long => write!(f, "long"),
            Self::Short => write!(f, "short"),
        }
    }
}

/// A single aggregated news item.
///
/// Only `title` participates in sentiment scoring; the remaining fields exist
/// for the dashboard news panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    /// Feed the item came from (e.g. "CoinTelegraph").
    pub source: String,
    pub title: String,
    #[serde(default)]
    pub link: String,
    /// ISO 8601 publication timestamp, best-effort (feeds disagree on
    /// formats; unparseable dates sort last).
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub description: String,
}

/// One observed large trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhaleEvent {
    pub tx_hash: String,
    /// Market pair, e.g. "HYPE/USDC".
    pub pair: String,
    pub side: Side,
    /// Notional size in USD. Never negative.
    pub size_usd: f64,
    /// ISO 8601 observation timestamp.
    pub observed_at: String,
}

/// One point of the open-interest time series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OpenInterestSample {
    /// Unix timestamp in seconds.
    pub ts: i64,
    /// Outstanding long notional. Never negative.
    pub longs: f64,
    /// Outstanding short notional. Never negative.
    pub shorts: f64,
}

impl OpenInterestSample {
    /// Total open interest: longs + shorts.
    pub fn oi(&self) -> f64 {
        self.longs + self.shorts
    }

    /// Long/short ratio with a floor of 1 on shorts to avoid division by
    /// zero. A ratio of 1.0 means balanced positioning.
    pub fn long_short_ratio(&self) -> f64 {
        self.longs / self.shorts.max(1.0)
    }
}

/// Spot price summary for the tracked coin (CoinGecko-shaped).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSummary {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub price: f64,
    /// 24h price change in percent.
    pub change_24h: f64,
    pub volume_24h: f64,
    pub market_cap: f64,
    #[serde(default)]
    pub last_updated: String,
}
