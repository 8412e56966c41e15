// =============================================================================
// HyperHub Backend — Main Entry Point
// =============================================================================
//
// The service starts in Demo data mode for a working out-of-the-box
// dashboard. Operators switch to Live mode via the API once feed endpoints
// are configured.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod governance;
mod market_data;
mod refresh;
mod runtime_config;
mod scoring;
mod sources;
mod types;

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::market_data::PriceTracker;
use crate::runtime_config::{RuntimeConfig, CONFIG_PATH};
use crate::sources::SourceSet;
use crate::types::DataMode;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        HyperHub Backend — Starting Up                   ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let mut config = RuntimeConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    // Override data mode and coin id from env if available.
    if let Ok(mode) = std::env::var("HYPERHUB_DATA_MODE") {
        match mode.to_lowercase().as_str() {
            "demo" => config.data_mode = DataMode::Demo,
            "live" => config.data_mode = DataMode::Live,
            other => warn!(mode = %other, "Unknown HYPERHUB_DATA_MODE — keeping configured mode"),
        }
    }
    if let Ok(coin_id) = std::env::var("HYPERHUB_COIN_ID") {
        if !coin_id.trim().is_empty() {
            config.coin_id = coin_id.trim().to_lowercase();
        }
    }

    info!(
        data_mode = %config.data_mode,
        coin_id = %config.coin_id,
        refresh_interval_secs = config.refresh_interval_secs,
        feeds = config.news_feeds.len(),
        "Configured"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let state = Arc::new(AppState::new(config));

    // ── 3. Build collaborators ───────────────────────────────────────────
    let sources = SourceSet::new(&state.runtime_config.read().clone());
    let price_tracker = PriceTracker::new();

    // ── 4. Start the API server ──────────────────────────────────────────
    let api_state = state.clone();
    let bind_addr = std::env::var("HYPERHUB_BIND_ADDR")
        .unwrap_or_else(|_| state.runtime_config.read().bind_addr.clone());
    let bind_addr_clone = bind_addr.clone();

    tokio::spawn(async move {
        let app = api::rest::router(api_state);
        let listener = tokio::net::TcpListener::bind(&bind_addr_clone)
            .await
            .expect("Failed to bind API server");
        info!(addr = %bind_addr_clone, "API server listening");
        axum::serve(listener, app)
            .await
            .expect("API server failed");
    });

    // ── 5. Refresh loops ─────────────────────────────────────────────────
    tokio::spawn(refresh::run_refresh_loop(state.clone(), sources));
    tokio::spawn(refresh::run_price_loop(state.clone(), price_tracker));

    info!("All subsystems running. Press Ctrl+C to stop.");

    // ── 6. Graceful shutdown ─────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    warn!("Shutdown signal received — stopping gracefully");

    if let Err(e) = state.runtime_config.read().save(CONFIG_PATH) {
        error!(error = %e, "Failed to save runtime config on shutdown");
    }

    info!("HyperHub backend shut down complete.");
    Ok(())
}
