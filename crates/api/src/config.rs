use statuspage_engine::{EngineConfig, ResolvedUpdatePolicy};
use statuspage_events::bus::DEFAULT_QUEUE_CAPACITY;
use statuspage_events::{BusConfig, VisibilityPolicy};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on post-shutdown cleanup in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Seconds between WebSocket pings (default: `30`).
    pub heartbeat_interval_secs: u64,
    /// JWT validation settings.
    pub jwt: JwtConfig,
    /// PostgreSQL URL. `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Provision the demo tenants at startup.
    pub seed_demo_data: bool,
    pub bus: BusConfig,
    pub engine: EngineConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                    |
    /// |-----------------------------|----------------------------|
    /// | `HOST`                      | `0.0.0.0`                  |
    /// | `PORT`                      | `3000`                     |
    /// | `CORS_ORIGINS`              | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`     | `30`                       |
    /// | `WS_HEARTBEAT_SECS`         | `30`                       |
    /// | `DATABASE_URL`              | unset (in-memory store)    |
    /// | `SEED_DEMO_DATA`            | `false`                    |
    /// | `SUBSCRIBER_QUEUE_CAPACITY` | `256`                      |
    /// | `PUBLIC_EVENT_KINDS`        | unset (mirror internal)    |
    /// | `RESOLVED_INCIDENT_UPDATES` | `allow`                    |
    ///
    /// # Panics
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let heartbeat_interval_secs: u64 = std::env::var("WS_HEARTBEAT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("WS_HEARTBEAT_SECS must be a valid u64");
        assert!(heartbeat_interval_secs > 0, "WS_HEARTBEAT_SECS must be positive");

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let seed_demo_data = std::env::var("SEED_DEMO_DATA")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let queue_capacity: usize = std::env::var("SUBSCRIBER_QUEUE_CAPACITY")
            .unwrap_or_else(|_| DEFAULT_QUEUE_CAPACITY.to_string())
            .parse()
            .expect("SUBSCRIBER_QUEUE_CAPACITY must be a valid usize");

        let policy = match std::env::var("PUBLIC_EVENT_KINDS") {
            Ok(list) => VisibilityPolicy::from_public_kinds(&list)
                .unwrap_or_else(|e| panic!("Invalid PUBLIC_EVENT_KINDS: {e}")),
            Err(_) => VisibilityPolicy::Mirror,
        };

        let resolved_updates = match std::env::var("RESOLVED_INCIDENT_UPDATES") {
            Ok(v) => ResolvedUpdatePolicy::parse(&v)
                .unwrap_or_else(|e| panic!("Invalid RESOLVED_INCIDENT_UPDATES: {e}")),
            Err(_) => ResolvedUpdatePolicy::default(),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            heartbeat_interval_secs,
            jwt: JwtConfig::from_env(),
            database_url,
            seed_demo_data,
            bus: BusConfig {
                queue_capacity,
                policy,
            },
            engine: EngineConfig { resolved_updates },
        }
    }
}
