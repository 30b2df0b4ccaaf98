//! JSON document store
//!
//! This crate persists application documents (users, torrent records,
//! notifications, service settings) as JSON files under a data directory.
//! Each collection is held in memory and rewritten atomically on mutation,
//! which is plenty for a dashboard whose writes are rare and admin- or
//! user-initiated.

mod collection;
mod error;
mod single;

pub use collection::Collection;
pub use error::StoreError;
pub use single::SingleDoc;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
