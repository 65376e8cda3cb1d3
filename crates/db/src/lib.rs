//! Storage backends for the status page platform.
//!
//! - [`MemoryStore`] keeps every table in process memory. It is the default
//!   backend when no `DATABASE_URL` is configured and the one the engine and
//!   API tests run against.
//! - [`PgStore`] persists to PostgreSQL through the repositories in
//!   [`repositories`].
//!
//! Both implement [`statuspage_core::store::RecordStore`].

use sqlx::postgres::PgPoolOptions;

pub mod memory;
pub mod models;
pub mod pg_store;
pub mod repositories;
pub mod seed;

pub use memory::MemoryStore;
pub use pg_store::PgStore;
pub use seed::{seed_demo_data, SeedSummary};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the pool can reach the database.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}

/// Apply all pending migrations embedded from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
