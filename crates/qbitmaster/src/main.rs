use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use webapi::{ApiServer, AppState};

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let qbit_host = env_or("QBIT_HOST", "http://localhost:8080");
    let qbit_username = env_or("QBIT_USERNAME", "admin");
    let qbit_password = env_or("QBIT_PASSWORD", "adminadmin");
    let jackett_url = env_or("JACKETT_URL", "http://localhost:9117");
    let jackett_api_key = std::env::var("JACKETT_API_KEY").ok();
    let jwt_secret = env_or("JWT_SECRET", "qbitmaster-secret-key-change-in-production");
    let data_dir = PathBuf::from(env_or("DATA_DIR", "./data"));
    let bind_host = env_or("BIND_HOST", "0.0.0.0");
    let bind_port: u16 = env_or("BIND_PORT", "8001").parse().unwrap_or(8001);

    // Initialize qBittorrent API client
    let torrent = torrent::TorrentApi::new(&qbit_host, &qbit_username, &qbit_password);

    // A dead qBittorrent at startup is not fatal; the health endpoint
    // reports it and requests fail with 503 until it comes back.
    if let Err(e) = torrent.login().await {
        tracing::warn!("could not authenticate with qBittorrent: {}", e);
    } else {
        tracing::info!("qBittorrent client authenticated");
    }

    let jackett = jackett::JackettApi::new(&jackett_url, jackett_api_key);
    if !jackett.is_configured() {
        tracing::warn!("JACKETT_API_KEY not set; indexer search is disabled");
    }

    let state = match AppState::new(&data_dir, torrent, jackett, jwt_secret) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("could not open data directory {}: {}", data_dir.display(), e);
            std::process::exit(1);
        }
    };

    if let Err(e) = ApiServer::new(state).serve(&bind_host, bind_port).await {
        tracing::error!("server error: {}", e);
        std::process::exit(1);
    }
}
