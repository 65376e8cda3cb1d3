use axum::routing::{get, put};
use axum::Router;

use crate::handlers::maintenances;
use crate::state::AppState;

/// Routes mounted at `/maintenances`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(maintenances::list_maintenances).post(maintenances::create_maintenance),
        )
        .route("/{id}/status", put(maintenances::set_maintenance_status))
}
