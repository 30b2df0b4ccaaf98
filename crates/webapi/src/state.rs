//! Shared application state

use links::SettingsService;
use std::path::Path;
use std::sync::Arc;
use store::Collection;

use crate::models::{Notification, TorrentRecord, User};

/// The document collections behind the dashboard
pub struct Db {
    pub users: Collection<User>,
    pub torrents: Collection<TorrentRecord>,
    pub notifications: Collection<Notification>,
}

impl Db {
    /// Open all collections under the data directory
    pub fn open(dir: &Path) -> store::Result<Self> {
        Ok(Self {
            users: Collection::open(dir, "users")?,
            torrents: Collection::open(dir, "torrents")?,
            notifications: Collection::open(dir, "notifications")?,
        })
    }
}

/// State handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Db>,
    pub torrent: torrent::TorrentApi,
    pub jackett: jackett::JackettApi,
    pub settings: Arc<SettingsService>,
    /// Secret for session tokens; distinct from the link-signing secret
    pub jwt_secret: String,
}

impl AppState {
    /// Assemble the application state
    ///
    /// # Arguments
    /// * `data_dir` - Directory for the document store
    /// * `torrent` - Authenticated qBittorrent client
    /// * `jackett` - Jackett client (possibly unconfigured)
    /// * `jwt_secret` - Secret for signing session tokens
    pub fn new(
        data_dir: &Path,
        torrent: torrent::TorrentApi,
        jackett: jackett::JackettApi,
        jwt_secret: String,
    ) -> crate::Result<Self> {
        let db = Db::open(data_dir)?;
        let settings = SettingsService::open(data_dir)?;

        Ok(Self {
            db: Arc::new(db),
            torrent,
            jackett,
            settings: Arc::new(settings),
            jwt_secret,
        })
    }
}
