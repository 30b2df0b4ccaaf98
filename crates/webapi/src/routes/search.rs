//! Jackett search endpoints

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::models::{SearchQuery, SearchResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search))
        .route("/indexers", get(indexers))
}

async fn search(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Query(q): Query<SearchQuery>,
) -> crate::Result<Json<SearchResponse>> {
    let results = state.jackett.search(&q.query, q.category.as_deref()).await?;
    Ok(Json(SearchResponse {
        total: results.len(),
        results,
    }))
}

#[derive(Serialize)]
struct IndexersResponse {
    indexers: Vec<jackett::Indexer>,
}

async fn indexers(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> crate::Result<Json<IndexersResponse>> {
    let indexers = state.jackett.indexers().await?;
    Ok(Json(IndexersResponse { indexers }))
}
