//! Jackett indexer search client
//!
//! Queries a Jackett instance's aggregate `results` endpoint and lists the
//! configured indexers. Jackett aggregates many torrent indexers behind one
//! API key, so this client is the only search surface the dashboard needs.

mod client;
mod error;

pub use client::{Indexer, JackettApi, SearchResult, MAX_SEARCH_RESULTS};
pub use error::JackettError;

/// Result type alias for Jackett operations
pub type Result<T> = std::result::Result<T, JackettError>;
