//! qBittorrent API client wrapper
//!
//! A thin interface over the qBittorrent Web API via the qbit-rs library:
//! authentication, torrent add/remove/pause/resume, file listings and
//! transfer statistics, plus magnet-link helpers.

pub mod client;
pub mod magnet;

pub use client::TorrentApi;
pub use magnet::{extract_info_hash, find_duplicates};
