//! Route assembly for the `/api` surface

mod auth;
mod health;
mod notifications;
mod search;
mod settings;
mod torrents;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Build the full API router (state is attached by the server)
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api", get(health::root))
        .route("/api/health", get(health::health))
        .nest("/api/auth", auth::router())
        .nest("/api/torrents", torrents::router())
        .nest("/api/jackett", search::router())
        .nest("/api/notifications", notifications::router())
        .nest("/api/settings", settings::router())
}
