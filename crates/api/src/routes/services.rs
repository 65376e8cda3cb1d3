use axum::routing::{get, put};
use axum::Router;

use crate::handlers::services;
use crate::state::AppState;

/// Routes mounted at `/services`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(services::list_services).post(services::create_service))
        .route("/overall", get(services::overall_status))
        .route(
            "/{id}",
            get(services::get_service)
                .patch(services::update_service)
                .delete(services::delete_service),
        )
        .route("/{id}/status", put(services::set_status))
        .route("/{id}/history", get(services::get_history))
}
