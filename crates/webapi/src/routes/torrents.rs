//! Torrent management: qBittorrent proxying plus per-user ownership records

use axum::extract::{Multipart, Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::Utc;
use qbit_rs::model::{State as TorrentState, Torrent};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::{
    AddTorrentRequest, DownloadLinkRequest, MessageResponse, Notification, StatsResponse,
    TorrentFileView, TorrentRecord, TorrentView,
};
use crate::state::{AppState, Db};
use crate::ApiError;
use torrent::{extract_info_hash, find_duplicates};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add", post(add))
        .route("/add-file", post(add_file))
        .route("/my", get(my_torrents))
        .route("/all", get(all_torrents))
        .route("/stats", get(stats))
        .route("/:id", delete(remove))
        .route("/:id/pause", post(pause))
        .route("/:id/resume", post(resume))
        .route("/:id/files", get(files))
        .route("/:id/link", post(download_link))
}

/// qBittorrent state as the frontend expects it (the Web API's own labels)
fn state_label(state: Option<&TorrentState>) -> String {
    let label = match state {
        Some(TorrentState::Downloading) => "downloading",
        Some(TorrentState::Uploading) => "uploading",
        Some(TorrentState::StalledDL) => "stalledDL",
        Some(TorrentState::StalledUP) => "stalledUP",
        Some(TorrentState::PausedDL) => "pausedDL",
        Some(TorrentState::PausedUP) => "pausedUP",
        Some(TorrentState::QueuedDL) => "queuedDL",
        Some(TorrentState::QueuedUP) => "queuedUP",
        Some(TorrentState::CheckingDL) => "checkingDL",
        Some(TorrentState::CheckingUP) => "checkingUP",
        Some(TorrentState::ForcedDL) => "forcedDL",
        Some(TorrentState::ForcedUP) => "forcedUP",
        Some(TorrentState::MetaDL) => "metaDL",
        Some(TorrentState::Allocating) => "allocating",
        Some(TorrentState::CheckingResumeData) => "checkingResumeData",
        Some(TorrentState::Moving) => "moving",
        Some(TorrentState::MissingFiles) => "missingFiles",
        Some(TorrentState::Error) => "error",
        _ => "unknown",
    };
    label.to_string()
}

/// Merge an ownership record with live qBittorrent state
///
/// Torrents qBittorrent no longer knows about (or when qBittorrent is
/// unreachable) come back with zeroed counters rather than failing the
/// whole listing.
fn live_view(record: TorrentRecord, live: Option<&Torrent>) -> TorrentView {
    match live {
        Some(t) => TorrentView {
            status: state_label(t.state.as_ref()),
            progress: t.progress.unwrap_or(0.0) * 100.0,
            download_speed: t.dlspeed.unwrap_or(0),
            upload_speed: t.upspeed.unwrap_or(0),
            size: t.size.unwrap_or(0),
            downloaded: t.downloaded.unwrap_or(0),
            eta: t.eta.unwrap_or(0),
            id: record.id,
            user_id: record.user_id,
            username: record.username,
            name: record.name,
            magnet: record.magnet,
            hash: record.hash,
            created_at: record.created_at,
        },
        None => TorrentView {
            status: "unknown".to_string(),
            progress: 0.0,
            download_speed: 0,
            upload_speed: 0,
            size: 0,
            downloaded: 0,
            eta: 0,
            id: record.id,
            user_id: record.user_id,
            username: record.username,
            name: record.name,
            magnet: record.magnet,
            hash: record.hash,
            created_at: record.created_at,
        },
    }
}

/// Fetch the live torrent list keyed by lowercase hash, degrading to an
/// empty map when qBittorrent is unreachable
async fn live_map(state: &AppState) -> HashMap<String, Torrent> {
    match state.torrent.list().await {
        Ok(torrents) => torrents
            .into_iter()
            .filter_map(|t| t.hash.clone().map(|h| (h.to_lowercase(), t)))
            .collect(),
        Err(e) => {
            tracing::warn!("could not fetch live torrent info: {}", e);
            HashMap::new()
        }
    }
}

/// Create a completion notification once per (user, torrent)
fn notify_completion(db: &Db, record: &TorrentRecord) -> store::Result<bool> {
    let exists = db
        .notifications
        .find_one(|n| n.torrent_id == record.id && n.user_id == record.user_id)
        .is_some();
    if exists {
        return Ok(false);
    }

    let notification = Notification {
        id: Uuid::new_v4().to_string(),
        user_id: record.user_id.clone(),
        torrent_id: record.id.clone(),
        torrent_name: record.name.clone(),
        message: format!("Download of '{}' has finished", record.name),
        read: false,
        created_at: Utc::now().to_rfc3339(),
    };
    db.notifications.insert(&notification.id.clone(), notification)?;
    Ok(true)
}

fn owned_record(state: &AppState, id: &str, user_id: &str) -> crate::Result<TorrentRecord> {
    state
        .db
        .torrents
        .find_one(|t| t.id == id && t.user_id == user_id)
        .ok_or_else(|| ApiError::NotFound("torrent not found".to_string()))
}

fn new_record(user: &crate::models::User, name: &str, magnet: &str, hash: &str) -> TorrentRecord {
    TorrentRecord {
        id: Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        username: user.username.clone(),
        name: name.to_string(),
        magnet: magnet.to_string(),
        hash: hash.to_string(),
        created_at: Utc::now().to_rfc3339(),
    }
}

async fn add(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<AddTorrentRequest>,
) -> crate::Result<Json<MessageResponse>> {
    if req.magnet.trim().is_empty() {
        return Err(ApiError::BadRequest("a magnet link is required".to_string()));
    }

    let existing: HashSet<String> = live_map(&state).await.into_keys().collect();
    let urls = vec![req.magnet.clone()];
    if !find_duplicates(&urls, &existing).is_empty() {
        return Err(ApiError::BadRequest(
            "this torrent is already in the download queue".to_string(),
        ));
    }

    state.torrent.add_urls(&urls).await?;

    let hash = extract_info_hash(&req.magnet).unwrap_or_default();
    let record = new_record(&user, &req.name, &req.magnet, &hash);
    let id = record.id.clone();
    state.db.torrents.insert(&id, record)?;

    Ok(Json(MessageResponse {
        message: "torrent added".to_string(),
        id: Some(id),
    }))
}

async fn add_file(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    mut multipart: Multipart,
) -> crate::Result<Json<MessageResponse>> {
    let mut name: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string());
        match field_name.as_deref() {
            Some("name") => {
                name = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("invalid name field: {}", e))
                })?);
            }
            Some("file") => {
                let filename = field
                    .file_name()
                    .unwrap_or("upload.torrent")
                    .to_string();
                let data = field.bytes().await.map_err(|e| {
                    ApiError::BadRequest(format!("invalid file field: {}", e))
                })?;
                file = Some((filename, data.to_vec()));
            }
            _ => {}
        }
    }

    let name = name.ok_or_else(|| ApiError::BadRequest("missing name field".to_string()))?;
    let (filename, data) =
        file.ok_or_else(|| ApiError::BadRequest("missing file field".to_string()))?;

    state.torrent.add_file(&filename, data).await?;

    // The info hash is unknown until qBittorrent parses the metadata.
    let record = new_record(&user, &name, "", "");
    let id = record.id.clone();
    state.db.torrents.insert(&id, record)?;

    Ok(Json(MessageResponse {
        message: "torrent file added".to_string(),
        id: Some(id),
    }))
}

async fn my_torrents(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> crate::Result<Json<Vec<TorrentView>>> {
    let records = state.db.torrents.find(|t| t.user_id == user.id);
    let live = live_map(&state).await;

    let mut views = Vec::with_capacity(records.len());
    for record in records {
        let live_entry = live.get(&record.hash.to_lowercase());
        if live_entry.and_then(|t| t.progress).unwrap_or(0.0) >= 1.0 {
            if let Err(e) = notify_completion(&state.db, &record) {
                tracing::warn!("could not record completion notification: {}", e);
            }
        }
        views.push(live_view(record, live_entry));
    }

    Ok(Json(views))
}

async fn all_torrents(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> crate::Result<Json<Vec<TorrentView>>> {
    let records = state.db.torrents.find(|_| true);
    let live = live_map(&state).await;

    let views = records
        .into_iter()
        .map(|record| {
            let live_entry = live.get(&record.hash.to_lowercase());
            live_view(record, live_entry)
        })
        .collect();

    Ok(Json(views))
}

async fn remove(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> crate::Result<Json<MessageResponse>> {
    let record = owned_record(&state, &id, &user.id)?;

    if !record.hash.is_empty() {
        if let Err(e) = state.torrent.delete(&record.hash).await {
            tracing::warn!("could not delete torrent from qBittorrent: {}", e);
        }
    }
    state.db.torrents.remove(&record.id)?;

    Ok(Json(MessageResponse {
        message: "torrent deleted".to_string(),
        id: None,
    }))
}

async fn pause(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> crate::Result<Json<MessageResponse>> {
    let record = owned_record(&state, &id, &user.id)?;
    if !record.hash.is_empty() {
        state.torrent.pause(&record.hash).await?;
    }
    Ok(Json(MessageResponse {
        message: "torrent paused".to_string(),
        id: None,
    }))
}

async fn resume(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> crate::Result<Json<MessageResponse>> {
    let record = owned_record(&state, &id, &user.id)?;
    if !record.hash.is_empty() {
        state.torrent.resume(&record.hash).await?;
    }
    Ok(Json(MessageResponse {
        message: "torrent resumed".to_string(),
        id: None,
    }))
}

async fn stats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> crate::Result<Json<StatsResponse>> {
    let mut response = StatsResponse {
        total_torrents: state.db.torrents.count(|t| t.user_id == user.id),
        active_torrents: 0,
        completed_torrents: 0,
        total_download_speed: 0,
        total_upload_speed: 0,
    };

    match state.torrent.transfer_info().await {
        Ok(info) => {
            response.total_download_speed = info.dl_info_speed as i64;
            response.total_upload_speed = info.up_info_speed as i64;
        }
        Err(e) => tracing::warn!("could not fetch transfer info: {}", e),
    }

    match state.torrent.list().await {
        Ok(torrents) => {
            for t in &torrents {
                if t.progress.unwrap_or(0.0) >= 1.0 {
                    response.completed_torrents += 1;
                } else if matches!(
                    t.state,
                    Some(TorrentState::Downloading)
                        | Some(TorrentState::Uploading)
                        | Some(TorrentState::StalledDL)
                        | Some(TorrentState::StalledUP)
                ) {
                    response.active_torrents += 1;
                }
            }
        }
        Err(e) => tracing::warn!("could not fetch torrent list for stats: {}", e),
    }

    Ok(Json(response))
}

async fn files(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> crate::Result<Json<Vec<TorrentFileView>>> {
    let record = owned_record(&state, &id, &user.id)?;
    if record.hash.is_empty() {
        return Err(ApiError::BadRequest(
            "this torrent has no info hash yet".to_string(),
        ));
    }

    let contents = state.torrent.files(&record.hash).await?;
    let views = contents
        .into_iter()
        .enumerate()
        .map(|(_i, c)| TorrentFileView {
            index: c.index as i64,
            path: c.name,
            size: c.size as i64,
            progress: c.progress,
        })
        .collect();

    Ok(Json(views))
}

async fn download_link(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(req): Json<DownloadLinkRequest>,
) -> crate::Result<Json<links::SignedLink>> {
    // Ownership gate; the path itself is validated by the signer.
    let _record = owned_record(&state, &id, &user.id)?;

    let link = state.settings.sign(&req.file_path, Utc::now())?;
    tracing::info!("issued download link for user {}", user.username);
    Ok(Json(link))
}
