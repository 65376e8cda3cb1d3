//! Handlers for the `/incidents` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use statuspage_core::incident::IncidentStatus;
use statuspage_core::types::DbId;
use statuspage_engine::NewIncident;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub service_ids: Vec<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct AppendUpdateRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SetIncidentStatusRequest {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /incidents
///
/// Newest first, each with its update timeline.
pub async fn list_incidents(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> AppResult<impl IntoResponse> {
    let incidents = state.engine.incidents().list_incidents(&principal).await?;
    Ok(Json(DataResponse { data: incidents }))
}

/// POST /incidents
pub async fn create_incident(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(body): Json<CreateIncidentRequest>,
) -> AppResult<impl IntoResponse> {
    let input = NewIncident {
        title: body.title,
        description: body.description,
        service_ids: body.service_ids,
    };
    let incident = state
        .engine
        .incidents()
        .create_incident(&principal, principal.organization_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: incident })))
}

/// GET /incidents/{id}
pub async fn get_incident(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let incident = state.engine.incidents().get_incident(&principal, id).await?;
    Ok(Json(DataResponse { data: incident }))
}

/// PUT /incidents/{id}/status
pub async fn set_incident_status(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<DbId>,
    Json(body): Json<SetIncidentStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let status = IncidentStatus::parse(&body.status)?;
    let incident = state
        .engine
        .incidents()
        .set_incident_status(&principal, id, status)
        .await?;
    Ok(Json(DataResponse { data: incident }))
}

/// POST /incidents/{id}/updates
pub async fn append_update(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<DbId>,
    Json(body): Json<AppendUpdateRequest>,
) -> AppResult<impl IntoResponse> {
    let incident = state
        .engine
        .incidents()
        .append_update(&principal, id, &body.message)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: incident })))
}

/// POST /incidents/{id}/resolve
pub async fn resolve_incident(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let incident = state.engine.incidents().resolve(&principal, id).await?;
    Ok(Json(DataResponse { data: incident }))
}
