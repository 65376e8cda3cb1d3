use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::incidents;
use crate::state::AppState;

/// Routes mounted at `/incidents`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(incidents::list_incidents).post(incidents::create_incident),
        )
        .route("/{id}", get(incidents::get_incident))
        .route("/{id}/status", put(incidents::set_incident_status))
        .route("/{id}/updates", post(incidents::append_update))
        .route("/{id}/resolve", post(incidents::resolve_incident))
}
