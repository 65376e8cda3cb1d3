use axum::routing::get;
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Unauthenticated routes mounted at `/public`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{slug}/summary", get(public::summary))
        .route("/{slug}/services", get(public::services))
        .route("/{slug}/incidents", get(public::incidents))
        .route("/{slug}/maintenances", get(public::maintenances))
}
