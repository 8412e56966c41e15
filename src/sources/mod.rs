// =============================================================================
// Data Sources — Mock vs. live collaborator seam
// =============================================================================
//
// The scoring engine consumes three independent observation feeds:
//
//   1. News headlines       -> sentiment scorer
//   2. Whale trade events   -> whale-flow scorer
//   3. Open-interest series -> open-interest scorer
//
// `DataSource` is the capability interface over those feeds. Two
// implementations exist: `DemoSource` (deterministic simulated data) and
// `LiveSource` (external HTTP endpoints). Which one feeds a given refresh
// cycle is a configuration choice, not a scattering of feature flags — the
// refresh loop selects from the `SourceSet` by the configured `DataMode` on
// every cycle, so a mode switch takes effect at the next tick.

pub mod demo;
pub mod live;

pub use demo::DemoSource;
pub use live::LiveSource;

use anyhow::Result;
use async_trait::async_trait;

use crate::runtime_config::RuntimeConfig;
use crate::types::{DataMode, NewsItem, OpenInterestSample, WhaleEvent};

/// The three observation feeds consumed by the scoring engine.
///
/// Implementations surface transport failures as errors; the refresh loop
/// degrades any failure to an empty collection so a scoring cycle always
/// completes.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Recent news items, newest first.
    async fn fetch_headlines(&self) -> Result<Vec<NewsItem>>;

    /// Recent large-trade observations.
    async fn fetch_whale_events(&self) -> Result<Vec<WhaleEvent>>;

    /// Open-interest time series, ordered by time ascending.
    async fn fetch_open_interest(&self) -> Result<Vec<OpenInterestSample>>;
}

/// Both source implementations, constructed once at startup.
///
/// Holding both avoids rebuilding HTTP clients when the operator flips the
/// data mode at runtime.
pub struct SourceSet {
    demo: DemoSource,
    live: LiveSource,
}

impl SourceSet {
    pub fn new(config: &RuntimeConfig) -> Self {
        Self {
            demo: DemoSource::new(),
            live: LiveSource::new(config),
        }
    }

    /// Select the source implementation for the given mode.
    pub fn select(&self, mode: DataMode) -> &dyn DataSource {
        match mode {
            DataMode::Demo => &self.demo,
            DataMode::Live => &self.live,
        }
    }
}
