// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`. Read endpoints are public: the
// dashboard polls them without credentials, matching the original panels
// (price, news, sentiment, whales, oi, governance). Control endpoints
// require a valid Bearer token checked via the `AuthBearer` extractor.
//
// CORS is configured permissively for development; tighten
// `allowed_origins` in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::api::auth::AuthBearer;
use crate::app_state::AppState;
use crate::runtime_config::CONFIG_PATH;
use crate::types::DataMode;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ── Public dashboard endpoints ──────────────────────────────
        .route("/api/v1/health", get(health))
        .route("/api/v1/state", get(full_state))
        .route("/api/v1/price", get(price))
        .route("/api/v1/news", get(news))
        .route("/api/v1/sentiment", get(sentiment))
        .route("/api/v1/whales", get(whales))
        .route("/api/v1/oi", get(open_interest))
        .route("/api/v1/governance", get(governance))
        .route("/api/v1/scores", get(scores))
        // ── Control (authenticated) ─────────────────────────────────
        .route("/api/v1/control/data-mode", post(control_data_mode))
        .route("/api/v1/control/refresh", post(control_refresh))
        // ── WebSocket (handled in the ws module, mounted here) ──────
        .route("/api/v1/ws", get(crate::api::ws::ws_handler))
        // ── Middleware & State ──────────────────────────────────────
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    state_version: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        state_version: state.current_state_version(),
        server_time: chrono::Utc::now().timestamp_millis(),
    };
    Json(resp)
}

// =============================================================================
// Full state snapshot
// =============================================================================

async fn full_state(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.build_snapshot();
    Json(snapshot)
}

// =============================================================================
// Dashboard panels
// =============================================================================

async fn price(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    // `null` until the first successful fetch; the panel shows "--".
    Json(state.price.read().clone())
}

async fn news(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let items = state.news.read().clone();
    Json(serde_json::json!({
        "items": items,
        "fetched_at": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn sentiment(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.market_health.read().clone();
    let sample_headlines: Vec<String> = state
        .news
        .read()
        .iter()
        .take(10)
        .map(|n| n.title.clone())
        .collect();

    Json(serde_json::json!({
        "sentiment_score": health.sentiment,
        "pos_count": health.positive_hits,
        "neg_count": health.negative_hits,
        "sample_headlines": sample_headlines,
        "last_update": health.last_update,
    }))
}

async fn whales(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let events = state.whales.read().clone();
    let health = state.market_health.read().clone();

    Json(serde_json::json!({
        "whales": events,
        "total_whale_volume": health.total_whale_volume_usd,
        "whale_score": health.whales,
        "last_update": health.last_update,
    }))
}

async fn open_interest(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let series = state.oi_series.read().clone();
    let latest = series.last().copied();
    let health = state.market_health.read().clone();

    Json(serde_json::json!({
        "series": series,
        "latest": latest,
        "long_short_ratio": health.long_short_ratio,
        "oi_score": health.open_interest,
        "last_update": health.last_update,
    }))
}

async fn governance(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let hips = state.hips.read().clone();
    let tallies: Vec<serde_json::Value> = hips
        .iter()
        .map(|h| {
            serde_json::json!({
                "id": h.id,
                "aye_stake": h.aye_stake(),
                "nay_stake": h.nay_stake(),
            })
        })
        .collect();

    Json(serde_json::json!({ "hips": hips, "tallies": tallies }))
}

async fn scores(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.market_health.read().clone();
    Json(health)
}

// =============================================================================
// Control endpoints (authenticated)
// =============================================================================

#[derive(Deserialize)]
struct DataModeRequest {
    data_mode: String,
    #[serde(default)]
    confirm_live: bool,
}

#[derive(Serialize)]
struct DataModeResponse {
    data_mode: String,
}

async fn control_data_mode(
    _auth: AuthBearer,
    State(state): State<Arc<AppState>>,
    Json(req): Json<DataModeRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let mode = match req.data_mode.to_lowercase().as_str() {
        "demo" => DataMode::Demo,
        "live" => {
            if !req.confirm_live {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({
                        "error": "Switching to Live mode requires confirm_live: true",
                    })),
                ));
            }
            warn!("Switching to LIVE data mode via API");
            DataMode::Live
        }
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": format!("Invalid data mode: '{}'. Use 'demo' or 'live'.", req.data_mode),
                })),
            ));
        }
    };

    let config_clone = {
        let mut config = state.runtime_config.write();
        config.data_mode = mode;
        config.clone()
    };

    // Save to disk (best-effort).
    if let Err(e) = config_clone.save(CONFIG_PATH) {
        warn!(error = %e, "Failed to save data mode to disk");
    }

    state.increment_version();
    // Rescore from the new source immediately rather than waiting out the
    // interval.
    state.refresh_notify.notify_one();
    info!(data_mode = %mode, "Data mode changed via API");

    Ok(Json(DataModeResponse {
        data_mode: mode.to_string(),
    }))
}

async fn control_refresh(
    _auth: AuthBearer,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    state.refresh_notify.notify_one();
    info!("Manual refresh requested via API");

    Json(serde_json::json!({
        "status": "refresh scheduled",
        "server_time": chrono::Utc::now().timestamp_millis(),
    }))
}
