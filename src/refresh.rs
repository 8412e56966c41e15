// =============================================================================
// Refresh Loop — The scoring cycle scheduler
// =============================================================================
//
// Every `refresh_interval_secs` (or sooner, when the refresh notify fires)
// one scoring cycle runs:
//
//   1. Fetch headlines, whale events, and the OI series concurrently from
//      the source selected by the configured data mode.
//   2. Degrade any fetch failure to an empty collection (recorded in the
//      error ring buffer) — a cycle always completes.
//   3. Compute the three base scores, then compose the composite ONCE, and
//      swap the whole `MarketHealth` snapshot atomically.
//
// A single task owns the loop, so cycles never interleave and the composite
// is never derived from mixed-cycle components. The price poller is a
// separate task: price feeds the dashboard header, not the scoring engine.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::app_state::AppState;
use crate::market_data::PriceTracker;
use crate::scoring::{self, MarketHealth};
use crate::sources::SourceSet;

/// Run scoring cycles forever. Never returns, never panics on source errors.
pub async fn run_refresh_loop(state: Arc<AppState>, sources: SourceSet) {
    info!("refresh loop starting");

    loop {
        run_scoring_cycle(&state, &sources).await;

        let secs = state.runtime_config.read().refresh_interval_secs.max(1);
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
            _ = state.refresh_notify.notified() => {
                debug!("refresh requested ahead of schedule");
            }
        }
    }
}

/// Execute one scoring cycle: fetch, score, swap.
pub async fn run_scoring_cycle(state: &Arc<AppState>, sources: &SourceSet) {
    let mode = state.runtime_config.read().data_mode;
    let source = sources.select(mode);

    let (headlines_res, whales_res, oi_res) = tokio::join!(
        source.fetch_headlines(),
        source.fetch_whale_events(),
        source.fetch_open_interest(),
    );

    let mut failures: Vec<&'static str> = Vec::new();
    let news = unwrap_or_empty(headlines_res, state, "news", &mut failures);
    let whales = unwrap_or_empty(whales_res, state, "whales", &mut failures);
    let oi_series = unwrap_or_empty(oi_res, state, "open_interest", &mut failures);

    // Base scores first, composite once — no partial updates.
    let titles: Vec<&str> = news.iter().map(|n| n.title.as_str()).collect();
    let sentiment = scoring::score_headlines(&titles);
    let whale_flow = scoring::score_whale_flow(&whales);
    let oi_breakdown = scoring::score_open_interest(&oi_series);

    if oi_breakdown.is_none() {
        debug!("open-interest series empty — component carries over");
    }

    let next = {
        let prev = state.market_health.read();
        MarketHealth::next(&prev, sentiment, whale_flow, oi_breakdown)
    };

    info!(
        mode = %mode,
        sentiment = next.sentiment,
        whales = next.whales,
        open_interest = next.open_interest,
        composite = next.composite,
        bias = %next.composite_bias,
        "scoring cycle complete"
    );

    // Publish the cycle's collections, then the scores (version bump last).
    *state.news.write() = news;
    *state.whales.write() = whales;
    *state.oi_series.write() = oi_series;

    *state.last_refresh_ok.write() = Some(std::time::Instant::now());
    *state.last_refresh_error.write() = if failures.is_empty() {
        None
    } else {
        Some(format!("fetch failed: {}", failures.join(", ")))
    };

    state.set_market_health(next);
}

/// Poll the spot price on the refresh interval. The previous summary is
/// retained when a fetch fails.
pub async fn run_price_loop(state: Arc<AppState>, tracker: PriceTracker) {
    info!("price loop starting");

    loop {
        let coin_id = state.runtime_config.read().coin_id.clone();

        match tracker.fetch(&coin_id).await {
            Ok(summary) => {
                *state.price.write() = Some(summary);
                state.increment_version();
            }
            Err(e) => {
                warn!(coin_id = %coin_id, error = %e, "price fetch failed — keeping previous summary");
                state.push_error("price", format!("{e:#}"));
            }
        }

        let secs = state.runtime_config.read().refresh_interval_secs.max(1);
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }
}

/// Unwrap a source result, degrading failure to an empty collection.
fn unwrap_or_empty<T>(
    result: Result<Vec<T>>,
    state: &AppState,
    component: &'static str,
    failures: &mut Vec<&'static str>,
) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            warn!(component, error = %e, "source fetch failed — degrading to empty input");
            state.push_error(component, format!("{e:#}"));
            failures.push(component);
            Vec::new()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime_config::RuntimeConfig;
    use crate::types::DataMode;

    fn demo_state() -> Arc<AppState> {
        Arc::new(AppState::new(RuntimeConfig::default()))
    }

    /// A Live-mode config with no feeds or endpoints configured: every
    /// fetch legitimately returns empty without touching the network.
    fn offline_live_state() -> Arc<AppState> {
        let config = RuntimeConfig {
            data_mode: DataMode::Live,
            news_feeds: Vec::new(),
            whales_endpoint: None,
            oi_endpoint: None,
            ..RuntimeConfig::default()
        };
        Arc::new(AppState::new(config))
    }

    #[tokio::test]
    async fn demo_cycle_produces_the_expected_scores() {
        let state = demo_state();
        let sources = SourceSet::new(&state.runtime_config.read().clone());

        run_scoring_cycle(&state, &sources).await;

        let health = state.market_health.read().clone();
        // Demo headlines: one positive hit ("positive"), no negative.
        assert_eq!(health.sentiment, 100);
        // Demo whales: 1.46M total => 100 - round(61.64) = 38.
        assert_eq!(health.whales, 38);
        assert_eq!(health.total_whale_volume_usd, 1_460_000.0);
        // Demo OI latest: ratio 1.3679 => 68.
        assert_eq!(health.open_interest, 68);
        // Composite: round((100 + 38 + 68) / 3) = round(68.67) = 69.
        assert_eq!(health.composite, 69);
        assert_eq!(health.composite_bias, "BULLISH");

        assert_eq!(state.news.read().len(), 5);
        assert_eq!(state.whales.read().len(), 5);
        assert_eq!(state.oi_series.read().len(), 12);
        assert!(state.last_refresh_ok.read().is_some());
        assert!(state.last_refresh_error.read().is_none());
    }

    #[tokio::test]
    async fn empty_inputs_fall_back_to_documented_defaults() {
        let state = offline_live_state();
        let sources = SourceSet::new(&state.runtime_config.read().clone());

        run_scoring_cycle(&state, &sources).await;

        let health = state.market_health.read().clone();
        // No headlines => neutral; no whales => no pressure; no OI signal
        // => component carries its pre-first-cycle default.
        assert_eq!(health.sentiment, 50);
        assert_eq!(health.whales, 100);
        assert_eq!(health.open_interest, 50);
        assert_eq!(health.composite, 67);
    }

    #[tokio::test]
    async fn oi_component_survives_a_source_outage() {
        let state = demo_state();
        let demo_sources = SourceSet::new(&state.runtime_config.read().clone());

        run_scoring_cycle(&state, &demo_sources).await;
        assert_eq!(state.market_health.read().open_interest, 68);

        // Flip to an unconfigured live source: the OI series comes back
        // empty, but the component keeps its last-known value.
        state.runtime_config.write().data_mode = DataMode::Live;
        state.runtime_config.write().news_feeds = Vec::new();
        let offline_sources = SourceSet::new(&state.runtime_config.read().clone());

        run_scoring_cycle(&state, &offline_sources).await;

        let health = state.market_health.read().clone();
        assert_eq!(health.open_interest, 68);
        // Sentiment and whales reset to their empty-input defaults.
        assert_eq!(health.sentiment, 50);
        assert_eq!(health.whales, 100);
        assert_eq!(health.composite, scoring::composite_of(50, 100, 68));
    }

    #[tokio::test]
    async fn cycle_bumps_the_state_version() {
        let state = demo_state();
        let sources = SourceSet::new(&state.runtime_config.read().clone());
        let before = state.current_state_version();

        run_scoring_cycle(&state, &sources).await;

        assert!(state.current_state_version() > before);
    }
}
