//! Signed download links
//!
//! This crate issues time-limited download URLs for files under the
//! qBittorrent download directory and documents the matching verification
//! contract for the reverse proxy that actually serves the files. A link
//! carries an expiry timestamp and a SHA-256 signature over
//! `secret_key + file_path + expires`, so any holder of the shared secret
//! can verify it independently of this application.

mod config;
mod error;
mod proxy;
mod settings;
mod sign;
mod verify;

pub use config::{SigningConfig, MAX_EXPIRY_HOURS, MIN_EXPIRY_HOURS, MIN_SECRET_LEN};
pub use error::LinkError;
pub use proxy::render_proxy_config;
pub use settings::{AppliedSettings, SettingsService};
pub use sign::{sign_path, SignedLink};
pub use verify::verify;

/// Result type alias for link operations
pub type Result<T> = std::result::Result<T, LinkError>;
