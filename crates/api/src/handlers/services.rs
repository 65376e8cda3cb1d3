//! Handlers for the `/services` resource.
//!
//! Every handler runs as the authenticated principal; the engine performs
//! the tenant and role check. Status strings are parsed here so a bad value
//! never reaches the engine.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use statuspage_core::service_status::ServiceStatus;
use statuspage_core::types::DbId;
use statuspage_engine::ServicePatch;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStatusResponse {
    pub overall_status: ServiceStatus,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /services
pub async fn list_services(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> AppResult<impl IntoResponse> {
    let services = state.engine.services().list_services(&principal).await?;
    Ok(Json(DataResponse { data: services }))
}

/// POST /services
///
/// Creates the service in the caller's organization, status `operational`.
pub async fn create_service(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(body): Json<CreateServiceRequest>,
) -> AppResult<impl IntoResponse> {
    let service = state
        .engine
        .services()
        .create_service(&principal, principal.organization_id, &body.name)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: service })))
}

/// GET /services/overall
pub async fn overall_status(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> AppResult<impl IntoResponse> {
    let overall_status = state.engine.services().overall_status(&principal).await?;
    Ok(Json(DataResponse {
        data: OverallStatusResponse { overall_status },
    }))
}

/// GET /services/{id}
pub async fn get_service(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let service = state.engine.services().get_service(&principal, id).await?;
    Ok(Json(DataResponse { data: service }))
}

/// PATCH /services/{id}
pub async fn update_service(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateServiceRequest>,
) -> AppResult<impl IntoResponse> {
    let patch = ServicePatch {
        name: body.name,
        status: body.status.as_deref().map(ServiceStatus::parse).transpose()?,
    };
    let service = state
        .engine
        .services()
        .update_service_fields(&principal, id, patch)
        .await?;
    Ok(Json(DataResponse { data: service }))
}

/// PUT /services/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<DbId>,
    Json(body): Json<SetStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let status = ServiceStatus::parse(&body.status)?;
    let service = state
        .engine
        .services()
        .set_status(&principal, id, status)
        .await?;
    Ok(Json(DataResponse { data: service }))
}

/// DELETE /services/{id}
///
/// History entries are retained.
pub async fn delete_service(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state
        .engine
        .services()
        .delete_service(&principal, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /services/{id}/history
///
/// Newest entry first.
pub async fn get_history(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let history = state.engine.services().get_history(&principal, id).await?;
    Ok(Json(DataResponse { data: history }))
}
