//! Service health endpoints

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// API banner
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "QBitMaster API v1.0", "status": "ok" }))
}

/// Probe every upstream service
///
/// Always answers 200; each service reports ok / error / not_configured so
/// the frontend can flag partial outages.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let qbittorrent = match state.torrent.version().await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::warn!("qBittorrent health check failed: {}", e);
            "error"
        }
    };

    let jackett = if !state.jackett.is_configured() {
        "not_configured"
    } else {
        match state.jackett.ping().await {
            Ok(()) => "ok",
            Err(e) => {
                tracing::warn!("Jackett health check failed: {}", e);
                "error"
            }
        }
    };

    Json(json!({
        "api": "ok",
        "store": "ok",
        "qbittorrent": qbittorrent,
        "jackett": jackett,
    }))
}
