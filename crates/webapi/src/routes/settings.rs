//! Admin-only signing settings
//!
//! The signing secret enters through `PUT /` and only ever leaves through
//! the rendered proxy configuration; every read path masks it.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use links::SigningConfig;

use crate::auth::AdminUser;
use crate::models::{SettingsStatus, SettingsUpdateRequest, SettingsUpdateResponse, SettingsView};
use crate::state::AppState;
use crate::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_settings).put(update_settings))
        .route("/proxy-config", get(proxy_config))
}

async fn get_settings(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> crate::Result<Json<SettingsStatus>> {
    let status = match state.settings.get() {
        Some(config) => SettingsStatus {
            configured: true,
            config: Some(SettingsView::masked(&config)),
        },
        None => SettingsStatus {
            configured: false,
            config: None,
        },
    };
    Ok(Json(status))
}

async fn update_settings(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(req): Json<SettingsUpdateRequest>,
) -> crate::Result<Json<SettingsUpdateResponse>> {
    let candidate = SigningConfig {
        base_url: req.base_url,
        secret_key: req.secret_key,
        download_path: req.download_path,
        link_expiry_hours: req.link_expiry_hours,
    };

    let applied = state.settings.set(candidate)?;
    tracing::info!("signing settings updated by {}", admin.username);

    Ok(Json(SettingsUpdateResponse {
        config: SettingsView::masked(&applied.config),
        proxy_config: applied.proxy_config,
    }))
}

async fn proxy_config(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> crate::Result<String> {
    let config = state.settings.get().ok_or(ApiError::LinksNotConfigured)?;
    Ok(links::render_proxy_config(&config))
}
