#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use statuspage_api::auth::jwt::{generate_access_token, JwtConfig};
use statuspage_api::config::ServerConfig;
use statuspage_api::router::build_app_router;
use statuspage_api::state::AppState;
use statuspage_api::ws::WsManager;
use statuspage_core::principal::Principal;
use statuspage_core::roles::Role;
use statuspage_core::types::{new_id, DbId};
use statuspage_db::{seed_demo_data, MemoryStore};
use statuspage_engine::{EngineConfig, StatusEngine};
use statuspage_events::{BusConfig, ChangeBus};
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        heartbeat_interval_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 15,
        },
        database_url: None,
        seed_demo_data: true,
        bus: BusConfig::default(),
        engine: EngineConfig::default(),
    }
}

/// Router plus handles tests need to reach behind it.
pub struct TestApp {
    pub app: Router,
    pub engine: StatusEngine,
    pub ws_manager: Arc<WsManager>,
    pub config: ServerConfig,
    pub acme: DbId,
    pub techstart: DbId,
}

impl TestApp {
    /// Bearer token for a fresh principal of `role` in `organization_id`.
    pub fn token(&self, organization_id: DbId, role: Role) -> String {
        let principal = Principal::new(new_id(), organization_id, role);
        generate_access_token(&principal, &self.config.jwt).unwrap()
    }

    pub fn acme_admin(&self) -> String {
        self.token(self.acme, Role::Admin)
    }

    pub fn techstart_admin(&self) -> String {
        self.token(self.techstart, Role::Admin)
    }

    /// Id of the seeded service `name` in `organization_id`.
    /// Principal matching [`acme_admin`](Self::acme_admin) for direct
    /// engine calls.
    pub fn principal(&self, organization_id: DbId, role: Role) -> Principal {
        Principal::new(new_id(), organization_id, role)
    }

    pub async fn service_id(&self, organization_id: DbId, name: &str) -> DbId {
        let principal = Principal::new(new_id(), organization_id, Role::Member);
        self.engine
            .services()
            .list_services(&principal)
            .await
            .unwrap()
            .into_iter()
            .find(|s| s.name == name)
            .unwrap()
            .id
    }
}

/// Build the application over an in-memory store seeded with the demo
/// tenants, using the same router and middleware stack as the binary.
pub async fn build_test_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let seeded = seed_demo_data(store.as_ref()).await.unwrap();

    let bus = ChangeBus::new(config.bus.clone());
    let engine = StatusEngine::new(store, bus, config.engine.clone());
    let ws_manager = Arc::new(WsManager::new());
    let state = AppState {
        engine: engine.clone(),
        config: Arc::new(config.clone()),
        ws_manager: Arc::clone(&ws_manager),
        pool: None,
    };

    TestApp {
        app: build_app_router(state, &config),
        engine,
        ws_manager,
        acme: seeded.organization_id("acme").unwrap(),
        techstart: seeded.organization_id("techstart").unwrap(),
        config,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json_auth(app: &Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: &Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(app: &Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
