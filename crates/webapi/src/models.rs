//! Persisted documents and wire types

use serde::{Deserialize, Serialize};

/// User role; the first registered account becomes the administrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

/// A dashboard account, as persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: String,
}

/// User as returned by the API (never carries the password hash)
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        UserView {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Ownership record for a torrent added through the dashboard
///
/// Live progress lives in qBittorrent; this document only ties a torrent
/// to the user who added it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TorrentRecord {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub name: String,
    pub magnet: String,
    pub hash: String,
    pub created_at: String,
}

/// Torrent record merged with live qBittorrent state
#[derive(Debug, Clone, Serialize)]
pub struct TorrentView {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub name: String,
    pub magnet: String,
    pub hash: String,
    pub status: String,
    pub progress: f64,
    pub download_speed: i64,
    pub upload_speed: i64,
    pub size: i64,
    pub downloaded: i64,
    pub eta: i64,
    pub created_at: String,
}

/// One file inside a torrent
#[derive(Debug, Clone, Serialize)]
pub struct TorrentFileView {
    pub index: i64,
    /// Path relative to the download directory, as used for signed links
    pub path: String,
    pub size: i64,
    pub progress: f64,
}

/// Completion notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub torrent_id: String,
    pub torrent_name: String,
    pub message: String,
    pub read: bool,
    pub created_at: String,
}

// ---- request/response bodies ----

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserView,
}

#[derive(Debug, Deserialize)]
pub struct AddTorrentRequest {
    pub name: String,
    pub magnet: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_torrents: usize,
    pub active_torrents: usize,
    pub completed_torrents: usize,
    pub total_download_speed: i64,
    pub total_upload_speed: i64,
}

#[derive(Debug, Deserialize)]
pub struct DownloadLinkRequest {
    pub file_path: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<jackett::SearchResult>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub count: usize,
}

/// Signing configuration as shown to the admin; the secret is masked
#[derive(Debug, Serialize)]
pub struct SettingsView {
    pub base_url: String,
    pub secret_key: String,
    pub download_path: String,
    pub link_expiry_hours: i64,
}

impl SettingsView {
    pub fn masked(config: &links::SigningConfig) -> Self {
        SettingsView {
            base_url: config.base_url.clone(),
            secret_key: config.masked_secret(),
            download_path: config.download_path.clone(),
            link_expiry_hours: config.link_expiry_hours,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SettingsStatus {
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<SettingsView>,
}

#[derive(Debug, Deserialize)]
pub struct SettingsUpdateRequest {
    pub base_url: String,
    pub secret_key: String,
    pub download_path: String,
    pub link_expiry_hours: i64,
}

#[derive(Debug, Serialize)]
pub struct SettingsUpdateResponse {
    pub config: SettingsView,
    pub proxy_config: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_view_drops_password_hash() {
        let user = User {
            id: "u1".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "deadbeef".to_string(),
            role: Role::Member,
            created_at: "2024-06-01T00:00:00Z".to_string(),
        };

        let view: UserView = user.into();
        let raw = serde_json::to_string(&view).unwrap();
        assert!(!raw.contains("deadbeef"));
        assert!(raw.contains("alice"));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::Member).unwrap(), "\"member\"");
    }

    #[test]
    fn test_settings_view_masks_secret() {
        let config = links::SigningConfig {
            base_url: "https://files.example.com".to_string(),
            secret_key: "0123456789abcdef".to_string(),
            download_path: "/downloads".to_string(),
            link_expiry_hours: 6,
        };

        let view = SettingsView::masked(&config);
        assert_eq!(view.secret_key, "****cdef");
        let raw = serde_json::to_string(&view).unwrap();
        assert!(!raw.contains("0123456789abcdef"));
    }
}
