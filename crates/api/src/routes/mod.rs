pub mod health;
pub mod incidents;
pub mod maintenances;
pub mod public;
pub mod services;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Unauthenticated status-page routes, mounted under `/api/v1`.
///
/// ```text
/// /ws/public/{slug}                                public subscriber (status page)
/// /public/{slug}/summary                           header: org, overall status, services
/// /public/{slug}/services                          services by name
/// /public/{slug}/incidents                         incidents, newest first
/// /public/{slug}/maintenances                      maintenances by start
/// ```
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/ws/public/{slug}", get(ws::public_ws_handler))
        .nest("/public", public::router())
}

/// Authenticated dashboard routes, mounted under `/api/v1`.
///
/// ```text
/// /ws?token=<jwt>                                  internal subscriber (dashboard)
///
/// /services                                        list, create
/// /services/overall                                aggregate status
/// /services/{id}                                   get, patch, delete
/// /services/{id}/status                            set status (PUT)
/// /services/{id}/history                           status history, newest first
///
/// /incidents                                       list, create
/// /incidents/{id}                                  get
/// /incidents/{id}/status                           set status (PUT)
/// /incidents/{id}/updates                          append update (POST)
/// /incidents/{id}/resolve                          resolve (POST)
///
/// /maintenances                                    list, create
/// /maintenances/{id}/status                        set status (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::internal_ws_handler))
        .nest("/services", services::router())
        .nest("/incidents", incidents::router())
        .nest("/maintenances", maintenances::router())
}
