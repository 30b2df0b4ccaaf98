//! Per-user completion notifications

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::auth::AuthUser;
use crate::models::{MessageResponse, Notification, UnreadCountResponse};
use crate::state::AppState;
use crate::ApiError;

/// Cap on notifications returned in one page
const MAX_NOTIFICATIONS: usize = 50;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/unread-count", get(unread_count))
        .route("/:id/read", post(mark_read))
        .route("/read-all", post(mark_all_read))
}

async fn list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> crate::Result<Json<Vec<Notification>>> {
    let mut notifications = state.db.notifications.find(|n| n.user_id == user.id);
    // Newest first; RFC 3339 timestamps sort lexicographically.
    notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    notifications.truncate(MAX_NOTIFICATIONS);
    Ok(Json(notifications))
}

async fn unread_count(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> crate::Result<Json<UnreadCountResponse>> {
    let count = state
        .db
        .notifications
        .count(|n| n.user_id == user.id && !n.read);
    Ok(Json(UnreadCountResponse { count }))
}

async fn mark_read(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> crate::Result<Json<MessageResponse>> {
    let owned = state
        .db
        .notifications
        .find_one(|n| n.id == id && n.user_id == user.id)
        .is_some();
    if !owned {
        return Err(ApiError::NotFound("notification not found".to_string()));
    }

    state.db.notifications.modify(&id, |n| n.read = true)?;
    Ok(Json(MessageResponse {
        message: "notification marked as read".to_string(),
        id: None,
    }))
}

async fn mark_all_read(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> crate::Result<Json<MessageResponse>> {
    let changed = state
        .db
        .notifications
        .modify_all(|n| n.user_id == user.id && !n.read, |n| n.read = true)?;
    tracing::debug!("marked {} notifications as read", changed);

    Ok(Json(MessageResponse {
        message: "all notifications marked as read".to_string(),
        id: None,
    }))
}
