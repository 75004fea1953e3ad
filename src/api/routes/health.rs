//! Root and health endpoints.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::server::AppState;

/// GET / — service banner.
pub async fn root(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "message": format!("{} API", state.project_name),
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/docs",
    }))
}

/// GET /health — liveness plus cache-backend reachability.
///
/// Never fails: an unreachable Redis is reported as `"disconnected"`,
/// not as an error status.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let redis = if state.cache.ping().await {
        "connected"
    } else {
        "disconnected"
    };
    Json(json!({
        "status": "healthy",
        "redis": redis,
    }))
}
