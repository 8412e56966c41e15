// =============================================================================
// API Module
// =============================================================================
//
// REST endpoints (axum), the WebSocket push feed, and bearer-token auth for
// the control surface.

pub mod auth;
pub mod rest;
pub mod ws;
