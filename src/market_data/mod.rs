// =============================================================================
// Market Data Module
// =============================================================================
//
// External market-data collaborators that feed the dashboard but not the
// scoring engine. Currently: the spot price summary.

pub mod price;

pub use price::PriceTracker;
