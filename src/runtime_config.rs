// =============================================================================
// Runtime Configuration — Hot-reloadable service settings with atomic save
// =============================================================================
//
// Central configuration for the HyperHub backend. Persistence uses an atomic
// tmp + rename pattern to prevent corruption on crash. All fields carry
// serde defaults so that adding new fields never breaks loading an older
// config file.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::DataMode;

/// Default on-disk location of the config file.
pub const CONFIG_PATH: &str = "hyperhub_config.json";

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_coin_id() -> String {
    "hyperliquid".to_string()
}

fn default_refresh_interval_secs() -> u64 {
    60
}

fn default_bind_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_news_feeds() -> Vec<NewsFeed> {
    let feed = |name: &str, url: &str| NewsFeed {
        name: name.to_string(),
        url: url.to_string(),
    };

    vec![
        feed("CoinTelegraph", "https://cointelegraph.com/rss"),
        feed("TheBlock", "https://www.theblock.co/rss"),
        feed("Hyperliquid", "https://hyperliquid.gitbook.io/rss.xml"),
        feed("Reddit", "https://www.reddit.com/r/Hyperliquid/.rss"),
    ]
}

// =============================================================================
// NewsFeed
// =============================================================================

/// One RSS feed polled by the live news source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsFeed {
    pub name: String,
    pub url: String,
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level runtime configuration for the HyperHub backend.
///
/// Every field has a serde default so that older JSON files missing new
/// fields still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Which data-source implementation feeds the engine: Demo or Live.
    #[serde(default)]
    pub data_mode: DataMode,

    /// CoinGecko coin id for the price panel.
    #[serde(default = "default_coin_id")]
    pub coin_id: String,

    /// Seconds between refresh cycles.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// RSS feeds polled by the live news source.
    #[serde(default = "default_news_feeds")]
    pub news_feeds: Vec<NewsFeed>,

    /// Optional JSON endpoint serving `{"whales": [...]}`.
    #[serde(default)]
    pub whales_endpoint: Option<String>,

    /// Optional JSON endpoint serving `{"series": [...]}`.
    #[serde(default)]
    pub oi_endpoint: Option<String>,

    /// Address the API server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_mode: DataMode::Demo,
            coin_id: default_coin_id(),
            refresh_interval_secs: default_refresh_interval_secs(),
            news_feeds: default_news_feeds(),
            whales_endpoint: None,
            oi_endpoint: None,
            bind_addr: default_bind_addr(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            data_mode = %config.data_mode,
            coin_id = %config.coin_id,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.data_mode, DataMode::Demo);
        assert_eq!(cfg.coin_id, "hyperliquid");
        assert_eq!(cfg.refresh_interval_secs, 60);
        assert_eq!(cfg.news_feeds.len(), 4);
        assert_eq!(cfg.news_feeds[0].name, "CoinTelegraph");
        assert!(cfg.whales_endpoint.is_none());
        assert!(cfg.oi_endpoint.is_none());
        assert_eq!(cfg.bind_addr, "0.0.0.0:5000");
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.data_mode, DataMode::Demo);
        assert_eq!(cfg.refresh_interval_secs, 60);
        assert_eq!(cfg.news_feeds, default_news_feeds());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "data_mode": "Live", "coin_id": "bitcoin" }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.data_mode, DataMode::Live);
        assert_eq!(cfg.coin_id, "bitcoin");
        assert_eq!(cfg.refresh_interval_secs, 60);
        assert_eq!(cfg.bind_addr, "0.0.0.0:5000");
    }

    #[test]
    fn roundtrip_serialisation() {
        let mut cfg = RuntimeConfig::default();
        cfg.whales_endpoint = Some("https://example.com/whales".to_string());
        let json = serde_json::to_string(&cfg).unwrap();
        let cfg2: RuntimeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.data_mode, cfg2.data_mode);
        assert_eq!(cfg.news_feeds, cfg2.news_feeds);
        assert_eq!(cfg.whales_endpoint, cfg2.whales_endpoint);
    }
}
