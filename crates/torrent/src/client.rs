use qbit_rs::model::{
    AddTorrentArg, Credential, GetTorrentListArg, Torrent, TorrentContent, TorrentFile,
    TorrentSource, TransferInfo,
};
use qbit_rs::{Error, Qbit};
use std::sync::Arc;
use url::Url;

/// Wrapper around the qBittorrent API client
#[derive(Clone)]
pub struct TorrentApi {
    client: Arc<Qbit>,
}

impl TorrentApi {
    /// Create a new client for a qBittorrent endpoint
    ///
    /// # Arguments
    /// * `endpoint` - qBittorrent Web UI address, e.g. `http://localhost:8080`
    /// * `username` / `password` - Web UI credentials
    pub fn new(endpoint: &str, username: &str, password: &str) -> Self {
        let credential = Credential::new(username, password);
        let client = Arc::new(Qbit::new(endpoint, credential));
        TorrentApi { client }
    }

    /// Authenticate with the qBittorrent server
    ///
    /// # Errors
    /// Returns an error if authentication fails
    pub async fn login(&self) -> Result<(), Error> {
        self.client.login(false).await.map_err(|e| {
            tracing::error!("Failed to login to qBittorrent: {}", e);
            e
        })
    }

    /// qBittorrent application version, also used as a liveness probe
    pub async fn version(&self) -> Result<String, Error> {
        self.client.get_version().await
    }

    /// List every torrent known to the client
    pub async fn list(&self) -> Result<Vec<Torrent>, Error> {
        let arg = GetTorrentListArg {
            filter: None,
            category: None,
            tag: None,
            sort: None,
            reverse: None,
            limit: None,
            offset: None,
            hashes: None,
        };

        match self.client.get_torrent_list(arg).await {
            Ok(resp) => Ok(resp),
            Err(err) => {
                tracing::error!("Error querying torrents: {}", err);
                Err(err)
            }
        }
    }

    /// Add torrents from magnet links or web URLs
    pub async fn add_urls(&self, urls: &[String]) -> Result<(), Error> {
        tracing::info!("Adding {} torrent URL(s)", urls.len());
        let parsed: Vec<Url> = urls
            .iter()
            .filter_map(|u| match u.parse::<Url>() {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!("Skipping unparseable torrent URL: {}", e);
                    None
                }
            })
            .collect();

        let arg = AddTorrentArg {
            source: TorrentSource::Urls {
                urls: parsed.into(),
            },
            ..Default::default()
        };
        self.client.add_torrent(arg).await.map_err(|e| {
            tracing::error!("Error adding torrent: {}", e);
            e
        })
    }

    /// Add a torrent from raw `.torrent` file bytes
    pub async fn add_file(&self, filename: &str, data: Vec<u8>) -> Result<(), Error> {
        tracing::info!("Adding torrent file: {}", filename);
        let arg = AddTorrentArg {
            source: TorrentSource::TorrentFiles {
                torrents: vec![TorrentFile {
                    filename: filename.to_string(),
                    data,
                }],
            },
            ..Default::default()
        };
        self.client.add_torrent(arg).await.map_err(|e| {
            tracing::error!("Error adding torrent file: {}", e);
            e
        })
    }

    /// Remove a torrent, deleting its downloaded data as well
    pub async fn delete(&self, hash: &str) -> Result<(), Error> {
        tracing::info!("Deleting torrent {}", hash);
        self.client
            .delete_torrents(vec![hash.to_string()], true)
            .await
    }

    /// Pause a torrent
    pub async fn pause(&self, hash: &str) -> Result<(), Error> {
        self.client.stop_torrents(vec![hash.to_string()]).await
    }

    /// Resume a torrent
    pub async fn resume(&self, hash: &str) -> Result<(), Error> {
        self.client.start_torrents(vec![hash.to_string()]).await
    }

    /// Files belonging to a torrent, with per-file progress
    pub async fn files(&self, hash: &str) -> Result<Vec<TorrentContent>, Error> {
        self.client.get_torrent_contents(hash, None).await
    }

    /// Global transfer statistics (speeds, session totals)
    pub async fn transfer_info(&self) -> Result<TransferInfo, Error> {
        self.client.get_transfer_info().await
    }
}
