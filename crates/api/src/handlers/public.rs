//! Unauthenticated status-page reads, addressed by organization slug.
//!
//! An unknown slug is a 404. Nothing here accepts an organization id, so a
//! status page can only ever show the tenant its URL names.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /public/{slug}/summary
pub async fn summary(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let summary = state.engine.public().summary(&slug).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /public/{slug}/services
pub async fn services(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let services = state.engine.public().services(&slug).await?;
    Ok(Json(DataResponse { data: services }))
}

/// GET /public/{slug}/incidents
pub async fn incidents(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let incidents = state.engine.public().incidents(&slug).await?;
    Ok(Json(DataResponse { data: incidents }))
}

/// GET /public/{slug}/maintenances
pub async fn maintenances(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let maintenances = state.engine.public().maintenances(&slug).await?;
    Ok(Json(DataResponse { data: maintenances }))
}
