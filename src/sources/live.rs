// =============================================================================
// Live Data Source — External HTTP feeds
// =============================================================================
//
// Polls the configured external endpoints:
//
//   - News: RSS feeds, merged across sources and sorted newest first.
//     Title extraction is deliberate best-effort string work on the
//     `<item>`/`<title>` structure (robust XML parsing is out of scope);
//     a malformed feed degrades to zero items from that feed.
//   - Whales: a JSON endpoint returning `{"whales": [...]}`.
//   - Open interest: a JSON endpoint returning `{"series": [...]}`.
//
// Whale/OI endpoints are optional — aggregator services (CoinGlass, Dune)
// need keys the operator may not have. An unconfigured endpoint yields an
// empty collection, which the scorers treat by their documented defaults.
// =============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::runtime_config::RuntimeConfig;
use crate::sources::DataSource;
use crate::types::{NewsItem, OpenInterestSample, Side, WhaleEvent};

/// Cap on merged news items kept per refresh.
const MAX_NEWS_ITEMS: usize = 50;
/// Cap on items taken from a single feed.
const MAX_ITEMS_PER_FEED: usize = 20;

pub struct LiveSource {
    client: reqwest::Client,
    feeds: Vec<(String, String)>,
    whales_endpoint: Option<String>,
    oi_endpoint: Option<String>,
}

impl LiveSource {
    pub fn new(config: &RuntimeConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .user_agent("HyperHub/1.0")
                .build()
                .expect("failed to build reqwest client for LiveSource"),
            feeds: config
                .news_feeds
                .iter()
                .map(|f| (f.name.clone(), f.url.clone()))
                .collect(),
            whales_endpoint: config.whales_endpoint.clone(),
            oi_endpoint: config.oi_endpoint.clone(),
        }
    }
}

#[async_trait]
impl DataSource for LiveSource {
    async fn fetch_headlines(&self) -> Result<Vec<NewsItem>> {
        let mut items = Vec::new();

        // One bad feed must not sink the batch; failures are logged and
        // skipped.
        for (name, url) in &self.feeds {
            match self.client.get(url).send().await {
                Ok(resp) => match resp.text().await {
                    Ok(body) => items.extend(parse_feed_items(name, &body)),
                    Err(e) => warn!(feed = %name, error = %e, "failed to read feed body"),
                },
                Err(e) => warn!(feed = %name, error = %e, "failed to fetch feed"),
            }
        }

        sort_newest_first(&mut items);
        items.truncate(MAX_NEWS_ITEMS);

        debug!(count = items.len(), "news feeds merged");
        Ok(items)
    }

    async fn fetch_whale_events(&self) -> Result<Vec<WhaleEvent>> {
        let Some(url) = &self.whales_endpoint else {
            debug!("no whale endpoint configured — empty batch");
            return Ok(Vec::new());
        };

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .context("GET whale events")?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("whale endpoint returned {status}");
        }

        let payload: WhalesPayload = resp
            .json()
            .await
            .context("failed to parse whale events response")?;

        let events = payload
            .whales
            .into_iter()
            .map(|w| WhaleEvent {
                tx_hash: w.tx_hash,
                pair: w.pair,
                side: w.side,
                size_usd: w.size_usd.max(0.0),
                observed_at: w.time,
            })
            .collect::<Vec<_>>();

        debug!(count = events.len(), "whale events fetched");
        Ok(events)
    }

    async fn fetch_open_interest(&self) -> Result<Vec<OpenInterestSample>> {
        let Some(url) = &self.oi_endpoint else {
            debug!("no OI endpoint configured — empty series");
            return Ok(Vec::new());
        };

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .context("GET open interest series")?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("OI endpoint returned {status}");
        }

        let payload: OiPayload = resp
            .json()
            .await
            .context("failed to parse open interest response")?;

        let series = payload
            .series
            .into_iter()
            .map(|s| OpenInterestSample {
                ts: s.ts,
                longs: s.longs.max(0.0),
                shorts: s.shorts.max(0.0),
            })
            .collect::<Vec<_>>();

        debug!(count = series.len(), "open interest series fetched");
        Ok(series)
    }
}

// =============================================================================
// Wire payloads
// =============================================================================

#[derive(Deserialize)]
struct WhalesPayload {
    #[serde(default)]
    whales: Vec<WhaleRecord>,
}

#[derive(Deserialize)]
struct WhaleRecord {
    #[serde(default)]
    tx_hash: String,
    #[serde(default)]
    pair: String,
    side: Side,
    #[serde(default)]
    size_usd: f64,
    #[serde(default)]
    time: String,
}

#[derive(Deserialize)]
struct OiPayload {
    #[serde(default)]
    series: Vec<OiRecord>,
}

#[derive(Deserialize)]
struct OiRecord {
    #[serde(default)]
    ts: i64,
    #[serde(default)]
    longs: f64,
    #[serde(default)]
    shorts: f64,
}

// =============================================================================
// Feed parsing helpers
// =============================================================================

/// Extract the text of the first `<tag>...</tag>` pair in `fragment`,
/// stripping CDATA wrappers. Returns `None` when the tag is absent or empty.
fn extract_tag(fragment: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");

    let start = fragment.find(&open)? + open.len();
    let end = fragment[start..].find(&close)? + start;

    let clean = fragment[start..end]
        .replace("<![CDATA[", "")
        .replace("]]>", "")
        .trim()
        .to_string();

    if clean.is_empty() {
        None
    } else {
        Some(clean)
    }
}

/// Best-effort RSS item extraction: split on `<item>` and read the title,
/// link, publication date, and description of each fragment. Items without
/// a title are dropped.
fn parse_feed_items(source: &str, body: &str) -> Vec<NewsItem> {
    body.split("<item>")
        .skip(1)
        .take(MAX_ITEMS_PER_FEED)
        .filter_map(|part| {
            let title = extract_tag(part, "title")?;
            Some(NewsItem {
                source: source.to_string(),
                title,
                link: extract_tag(part, "link").unwrap_or_default(),
                published_at: extract_tag(part, "pubDate").unwrap_or_default(),
                description: extract_tag(part, "description").unwrap_or_default(),
            })
        })
        .collect()
}

/// Publication timestamp for sorting. RSS feeds use RFC 2822; some emit
/// RFC 3339. Unparseable dates sort to the end.
fn published_ts(item: &NewsItem) -> i64 {
    DateTime::parse_from_rfc2822(&item.published_at)
        .or_else(|_| DateTime::parse_from_rfc3339(&item.published_at))
        .map(|dt| dt.timestamp())
        .unwrap_or(0)
}

fn sort_newest_first(items: &mut [NewsItem]) {
    items.sort_by_key(|item| std::cmp::Reverse(published_ts(item)));
}
