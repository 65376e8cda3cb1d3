use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use statuspage_core::store::RecordStore;
use statuspage_db::{MemoryStore, PgStore};
use statuspage_engine::StatusEngine;
use statuspage_events::ChangeBus;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use statuspage_api::config::ServerConfig;
use statuspage_api::router::build_app_router;
use statuspage_api::state::AppState;
use statuspage_api::ws;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "statuspage_api=debug,statuspage_engine=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Storage ---
    let (store, pool) = match &config.database_url {
        Some(database_url) => {
            let pool = statuspage_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            statuspage_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            statuspage_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            let store: Arc<dyn RecordStore> = Arc::new(PgStore::new(pool.clone()));
            (store, Some(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
            (store, None)
        }
    };

    if config.seed_demo_data {
        let summary = statuspage_db::seed_demo_data(store.as_ref())
            .await
            .expect("Failed to seed demo data");
        tracing::info!(
            organizations = summary.organizations.len(),
            services = summary.services_created,
            "Demo data seeded",
        );
    }

    // --- Change bus + engines ---
    let bus = ChangeBus::new(config.bus.clone());
    let engine = StatusEngine::new(store, bus.clone(), config.engine.clone());
    tracing::info!(
        queue_capacity = config.bus.queue_capacity,
        resolved_updates = config.engine.resolved_updates.as_str(),
        "Engines started",
    );

    // --- WebSocket manager + heartbeat ---
    let ws_manager = Arc::new(ws::WsManager::new());
    let heartbeat_handle = ws::start_heartbeat(
        Arc::clone(&ws_manager),
        Duration::from_secs(config.heartbeat_interval_secs),
    );

    // --- App state + router ---
    let state = AppState {
        engine,
        config: Arc::new(config.clone()),
        ws_manager: Arc::clone(&ws_manager),
        pool,
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    let cleanup = async {
        let ws_count = ws_manager.connection_count().await;
        tracing::info!(ws_count, "Closing remaining WebSocket connections");
        ws_manager.shutdown_all().await;
        bus.shutdown();
    };
    if tokio::time::timeout(Duration::from_secs(config.shutdown_timeout_secs), cleanup)
        .await
        .is_err()
    {
        tracing::warn!("Shutdown cleanup timed out");
    }

    heartbeat_handle.abort();
    tracing::info!("Heartbeat task stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM (on Unix) to start graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
