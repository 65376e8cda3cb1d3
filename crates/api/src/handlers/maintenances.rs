//! Handlers for the `/maintenances` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use statuspage_core::maintenance::MaintenanceStatus;
use statuspage_core::types::{DbId, Timestamp};
use statuspage_engine::NewMaintenance;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenanceRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub service_ids: Vec<DbId>,
    /// RFC 3339 timestamp.
    pub scheduled_start: Timestamp,
    pub scheduled_end: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct SetMaintenanceStatusRequest {
    pub status: String,
}

/// GET /maintenances
pub async fn list_maintenances(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> AppResult<impl IntoResponse> {
    let maintenances = state
        .engine
        .incidents()
        .list_maintenances(&principal)
        .await?;
    Ok(Json(DataResponse { data: maintenances }))
}

/// POST /maintenances
pub async fn create_maintenance(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(body): Json<CreateMaintenanceRequest>,
) -> AppResult<impl IntoResponse> {
    let input = NewMaintenance {
        title: body.title,
        description: body.description,
        service_ids: body.service_ids,
        scheduled_start: body.scheduled_start,
        scheduled_end: body.scheduled_end,
    };
    let maintenance = state
        .engine
        .incidents()
        .create_maintenance(&principal, principal.organization_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: maintenance })))
}

/// PUT /maintenances/{id}/status
pub async fn set_maintenance_status(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<DbId>,
    Json(body): Json<SetMaintenanceStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let status = MaintenanceStatus::parse(&body.status)?;
    let maintenance = state
        .engine
        .incidents()
        .set_maintenance_status(&principal, id, status)
        .await?;
    Ok(Json(DataResponse { data: maintenance }))
}
