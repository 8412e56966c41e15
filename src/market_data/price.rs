// =============================================================================
// Price Tracker — Spot price summary from CoinGecko
// =============================================================================
//
// Fetches price, 24h change, 24h volume, and market cap for one coin id via
// the public `/coins/markets` endpoint. This is a stateless fetcher; the
// caller retains the previous summary when a fetch fails.

use anyhow::{Context, Result};
use tracing::debug;

use crate::types::PriceSummary;

const COINGECKO_API: &str = "https://api.coingecko.com/api/v3";

pub struct PriceTracker {
    client: reqwest::Client,
}

impl PriceTracker {
    /// Create a new tracker with a default HTTP client.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .user_agent("HyperHub/1.0")
                .build()
                .expect("failed to build reqwest client for PriceTracker"),
        }
    }

    /// Create a tracker that re-uses an existing HTTP client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetch the current price summary for `coin_id` (CoinGecko id, e.g.
    /// "hyperliquid").
    pub async fn fetch(&self, coin_id: &str) -> Result<PriceSummary> {
        let url = format!("{COINGECKO_API}/coins/markets");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("vs_currency", "usd"),
                ("ids", coin_id),
                ("order", "market_cap_desc"),
                ("per_page", "1"),
                ("page", "1"),
                ("sparkline", "false"),
            ])
            .send()
            .await
            .with_context(|| format!("GET price summary for {coin_id}"))?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse price response")?;

        if !status.is_success() {
            anyhow::bail!("price API returned {}: {}", status, body);
        }

        let item = body
            .as_array()
            .and_then(|arr| arr.first())
            .with_context(|| format!("no market data for coin id {coin_id}"))?;

        let summary = PriceSummary {
            id: str_field(item, "id"),
            symbol: str_field(item, "symbol"),
            name: str_field(item, "name"),
            price: num_field(item, "current_price"),
            change_24h: num_field(item, "price_change_percentage_24h"),
            volume_24h: num_field(item, "total_volume"),
            market_cap: num_field(item, "market_cap"),
            last_updated: str_field(item, "last_updated"),
        };

        debug!(
            coin_id,
            price = summary.price,
            change_24h = summary.change_24h,
            "price summary fetched"
        );

        Ok(summary)
    }
}

impl Default for PriceTracker {
    fn default() -> Self {
        Self::new()
    }
}

// CoinGecko nulls out fields for thin markets; default rather than fail.

fn str_field(value: &serde_json::Value, key: &str) -> String {
    value[key].as_str().unwrap_or_default().to_string()
}

fn num_field(value: &serde_json::Value, key: &str) -> f64 {
    value[key].as_f64().unwrap_or(0.0)
}
