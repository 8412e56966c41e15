// =============================================================================
// Central Application State — HyperHub Backend
// =============================================================================
//
// The single source of truth for the service. The refresh loop writes here,
// the REST handlers and WebSocket feed read from here.
//
// Thread safety:
//   - Atomic counters for lock-free version tracking.
//   - parking_lot::RwLock for all mutable shared collections.
//   - The four score components are swapped as one `MarketHealth` value so
//     readers never observe a composite built from mixed refresh cycles.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;

use crate::governance::{demo_hips, Hip};
use crate::runtime_config::RuntimeConfig;
use crate::scoring::MarketHealth;
use crate::types::{NewsItem, OpenInterestSample, PriceSummary, WhaleEvent};

// =============================================================================
// Error Record
// =============================================================================

/// A recorded error event for the dashboard error log.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    /// Human-readable error message.
    pub message: String,
    /// Subsystem the error came from (e.g. "news", "price").
    pub component: String,
    /// ISO 8601 timestamp.
    pub at: String,
}

// =============================================================================
// AppState
// =============================================================================

/// Maximum number of recent errors to retain.
const MAX_RECENT_ERRORS: usize = 50;

/// Central application state shared across all async tasks via `Arc<AppState>`.
pub struct AppState {
    // ── Version tracking ────────────────────────────────────────────────
    /// Monotonically increasing version counter. Incremented on every
    /// meaningful state mutation. The WebSocket feed uses this to detect
    /// changes and push updates.
    pub state_version: AtomicU64,

    /// WebSocket message sequence number (incremented per message sent).
    pub ws_sequence_number: AtomicU64,

    /// Number of currently connected WebSocket clients.
    pub ws_client_count: AtomicU64,

    // ── Configuration ───────────────────────────────────────────────────
    pub runtime_config: Arc<RwLock<RuntimeConfig>>,

    // ── Scoring ─────────────────────────────────────────────────────────
    /// Latest market-health snapshot. Replaced wholesale once per cycle.
    pub market_health: RwLock<MarketHealth>,

    // ── Dashboard data ──────────────────────────────────────────────────
    pub price: RwLock<Option<PriceSummary>>,
    pub news: RwLock<Vec<NewsItem>>,
    pub whales: RwLock<Vec<WhaleEvent>>,
    pub oi_series: RwLock<Vec<OpenInterestSample>>,
    pub hips: RwLock<Vec<Hip>>,

    // ── Refresh status ──────────────────────────────────────────────────
    pub last_refresh_ok: RwLock<Option<std::time::Instant>>,
    pub last_refresh_error: RwLock<Option<String>>,

    /// Wakes the refresh loop ahead of schedule (manual refresh, mode
    /// switch). The loop itself serializes cycles, so a notify can never
    /// interleave two scoring passes.
    pub refresh_notify: tokio::sync::Notify,

    // ── Error Log ───────────────────────────────────────────────────────
    pub recent_errors: RwLock<Vec<ErrorRecord>>,

    // ── Timing ──────────────────────────────────────────────────────────
    /// Instant when the service was started. Used for uptime calculations.
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Construct a new `AppState` from the given runtime configuration.
    ///
    /// The governance panel starts populated (demo proposal set); everything
    /// else starts empty / neutral until the first refresh cycle completes.
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            state_version: AtomicU64::new(1),
            ws_sequence_number: AtomicU64::new(0),
            ws_client_count: AtomicU64::new(0),

            runtime_config: Arc::new(RwLock::new(config)),

            market_health: RwLock::new(MarketHealth::default()),

            price: RwLock::new(None),
            news: RwLock::new(Vec::new()),
            whales: RwLock::new(Vec::new()),
            oi_series: RwLock::new(Vec::new()),
            hips: RwLock::new(demo_hips()),

            last_refresh_ok: RwLock::new(None),
            last_refresh_error: RwLock::new(None),
            refresh_notify: tokio::sync::Notify::new(),

            recent_errors: RwLock::new(Vec::new()),
            start_time: std::time::Instant::now(),
        }
    }

    // ── Version Management ──────────────────────────────────────────────

    /// Atomically increment the state version. Call this after every
    /// meaningful mutation to signal WebSocket clients that fresh data is
    /// available.
    pub fn increment_version(&self) -> u64 {
        self.state_version.fetch_add(1, Ordering::SeqCst)
    }

    /// Read the current state version without modifying it.
    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::SeqCst)
    }

    // ── Error Logging ───────────────────────────────────────────────────

    /// Record an error from `component`. The ring buffer is capped at
    /// [`MAX_RECENT_ERRORS`]; oldest entries are evicted when the limit is
    /// reached.
    pub fn push_error(&self, component: &str, msg: String) {
        let record = ErrorRecord {
            message: msg,
            component: component.to_string(),
            at: Utc::now().to_rfc3339(),
        };

        let mut errors = self.recent_errors.write();
        errors.push(record);
        while errors.len() > MAX_RECENT_ERRORS {
            errors.remove(0);
        }
        drop(errors);

        self.increment_version();
    }

    // ── Scoring ─────────────────────────────────────────────────────────

    /// Atomically replace the market-health snapshot.
    pub fn set_market_health(&self, health: MarketHealth) {
        *self.market_health.write() = health;
        self.increment_version();
    }

    // ── Snapshot Builder ────────────────────────────────────────────────

    /// Build a complete, serialisable snapshot of the service state.
    ///
    /// This is the payload sent to the dashboard via REST `GET /api/v1/state`
    /// and the WebSocket push feed.
    pub fn build_snapshot(&self) -> StateSnapshot {
        let now = Utc::now();
        let config = self.runtime_config.read();

        let whales = self.whales.read().clone();
        let total_whale_volume_usd: f64 = whales.iter().map(|w| w.size_usd).sum();

        let oi_series = self.oi_series.read().clone();
        let oi_latest = oi_series.last().copied();

        StateSnapshot {
            state_version: self.current_state_version(),
            server_time: now.timestamp_millis(),
            uptime_secs: self.start_time.elapsed().as_secs(),
            data_mode: config.data_mode.to_string(),

            refresh: RefreshStatus {
                interval_secs: config.refresh_interval_secs,
                last_ok_age_s: self.last_refresh_ok.read().map(|t| t.elapsed().as_secs()),
                last_error: self.last_refresh_error.read().clone(),
            },

            scores: self.market_health.read().clone(),

            price: self.price.read().clone(),
            news: self.news.read().clone(),
            whales: WhalesSnapshot {
                events: whales,
                total_whale_volume_usd,
            },
            open_interest: OiSnapshot {
                series: oi_series,
                latest: oi_latest,
            },
            governance: self.hips.read().clone(),

            recent_errors: self.recent_errors.read().clone(),
            ws_clients: self.ws_client_count.load(Ordering::Relaxed),
        }
    }
}

// =============================================================================
// Serialisable snapshot types
// =============================================================================

/// Full service state snapshot sent to the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct StateSnapshot {
    pub state_version: u64,
    pub server_time: i64,
    pub uptime_secs: u64,
    pub data_mode: String,
    pub refresh: RefreshStatus,
    pub scores: MarketHealth,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceSummary>,

    pub news: Vec<NewsItem>,
    pub whales: WhalesSnapshot,
    pub open_interest: OiSnapshot,
    pub governance: Vec<Hip>,
    pub recent_errors: Vec<ErrorRecord>,
    pub ws_clients: u64,
}

/// Refresh-loop status for the dashboard status banner.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshStatus {
    pub interval_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_ok_age_s: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Whale panel payload.
#[derive(Debug, Clone, Serialize)]
pub struct WhalesSnapshot {
    pub events: Vec<WhaleEvent>,
    pub total_whale_volume_usd: f64,
}

/// Open-interest panel payload.
#[derive(Debug, Clone, Serialize)]
pub struct OiSnapshot {
    pub series: Vec<OpenInterestSample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<OpenInterestSample>,
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{SentimentBreakdown, WhaleFlowBreakdown};

    fn state() -> AppState {
        AppState::new(RuntimeConfig::default())
    }

    #[test]
    fn version_starts_at_one_and_increments() {
        let state = state();
        assert_eq!(state.current_state_version(), 1);
        state.increment_version();
        assert_eq!(state.current_state_version(), 2);
    }

    #[test]
    fn error_ring_buffer_is_capped() {
        let state = state();
        for i in 0..(MAX_RECENT_ERRORS + 10) {
            state.push_error("test", format!("error {i}"));
        }
        let errors = state.recent_errors.read();
        assert_eq!(errors.len(), MAX_RECENT_ERRORS);
        // Oldest entries evicted first.
        assert_eq!(errors[0].message, "error 10");
    }

    #[test]
    fn set_market_health_bumps_version() {
        let state = state();
        let before = state.current_state_version();

        let prev = MarketHealth::default();
        let next = MarketHealth::next(
            &prev,
            SentimentBreakdown {
                score: 80,
                positive_hits: 4,
                negative_hits: 1,
            },
            WhaleFlowBreakdown {
                score: 40,
                total_volume_usd: 930_000.0,
            },
            None,
        );
        state.set_market_health(next);

        assert!(state.current_state_version() > before);
        assert_eq!(state.market_health.read().sentiment, 80);
    }

    #[test]
    fn snapshot_reflects_current_state() {
        let state = state();
        let snapshot = state.build_snapshot();

        assert_eq!(snapshot.data_mode, "Demo");
        assert_eq!(snapshot.scores.composite, 50);
        assert!(snapshot.price.is_none());
        assert_eq!(snapshot.governance.len(), 2);
        assert_eq!(snapshot.whales.total_whale_volume_usd, 0.0);
        assert!(snapshot.open_interest.latest.is_none());
        assert!(snapshot.refresh.last_ok_age_s.is_none());
    }
}
