//! REST API for the torrent dashboard
//!
//! Exposes the `/api` surface consumed by the web frontend: registration
//! and login, torrent management proxied to qBittorrent, Jackett search,
//! per-user notifications, admin-only signing settings, and service health.

pub mod auth;
mod error;
pub mod models;
mod routes;
mod server;
mod state;

pub use error::ApiError;
pub use server::ApiServer;
pub use state::{AppState, Db};

/// Result type alias for request handlers
pub type Result<T> = std::result::Result<T, ApiError>;
