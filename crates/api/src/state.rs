use std::sync::Arc;

use statuspage_db::DbPool;
use statuspage_engine::StatusEngine;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Engines, tenant registry, public reader and the change bus.
    pub engine: StatusEngine,
    /// Server configuration (JWT settings, timeouts, etc.).
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager.
    pub ws_manager: Arc<WsManager>,
    /// PostgreSQL pool when the server runs against a database; used by
    /// the health check only.
    pub pool: Option<DbPool>,
}
