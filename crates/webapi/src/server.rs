//! HTTP server wiring

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::state::AppState;

/// API server for managing the HTTP surface
#[derive(Clone)]
pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    /// Create a new API server over the assembled application state
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Create the axum router with all routes configured
    pub fn router(&self) -> Router {
        routes::api_router()
            .with_state(self.state.clone())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Start the API server
    ///
    /// # Arguments
    /// * `host` - Host to bind to (e.g., "0.0.0.0")
    /// * `port` - Port to bind to (e.g., 8001)
    pub async fn serve(
        self,
        host: &str,
        port: u16,
    ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        tracing::info!("API server listening on {}", addr);

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}
