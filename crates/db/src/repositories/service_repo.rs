//! Repository for the `services` and `status_history` tables.
//!
//! Writes that change a service's status always run in one transaction with
//! the matching `status_history` insert.

use sqlx::{PgConnection, PgPool};
use statuspage_core::models::{Service, StatusHistoryEntry};
use statuspage_core::types::DbId;

use crate::models::service::{ServiceRow, StatusHistoryRow};

/// Column list for `services` queries.
const SERVICE_COLUMNS: &str = "id, organization_id, name, status, created_at, updated_at";

/// Column list for `status_history` queries.
const HISTORY_COLUMNS: &str = "id, service_id, status, updated_by, timestamp";

/// Provides data access for services and their status history.
pub struct ServiceRepo;

impl ServiceRepo {
    /// Insert a service and its initial history entry in one transaction.
    pub async fn insert_with_history(
        pool: &PgPool,
        service: &Service,
        initial: &StatusHistoryEntry,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO services (id, organization_id, name, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(service.id)
        .bind(service.organization_id)
        .bind(&service.name)
        .bind(service.status.as_str())
        .bind(service.created_at)
        .bind(service.updated_at)
        .execute(&mut *tx)
        .await?;

        Self::append_history(&mut tx, initial).await?;

        tx.commit().await
    }

    /// Overwrite name/status/updated_at and optionally append history, in
    /// one transaction. Returns `false` (and rolls back) if no row matched.
    pub async fn update_with_history(
        pool: &PgPool,
        service: &Service,
        history: Option<&StatusHistoryEntry>,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE services SET name = $2, status = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(service.id)
        .bind(&service.name)
        .bind(service.status.as_str())
        .bind(service.updated_at)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        if let Some(entry) = history {
            Self::append_history(&mut tx, entry).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn append_history(
        conn: &mut PgConnection,
        entry: &StatusHistoryEntry,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO status_history (id, service_id, status, updated_by, timestamp) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(entry.id)
        .bind(entry.service_id)
        .bind(entry.status.as_str())
        .bind(entry.updated_by)
        .bind(entry.timestamp)
        .execute(conn)
        .await?;
        Ok(())
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ServiceRow>, sqlx::Error> {
        let query = format!("SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1");
        sqlx::query_as::<_, ServiceRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_organization(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<ServiceRow>, sqlx::Error> {
        let query = format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE organization_id = $1 ORDER BY name, id"
        );
        sqlx::query_as::<_, ServiceRow>(&query)
            .bind(organization_id)
            .fetch_all(pool)
            .await
    }

    /// Hard-delete a service. `status_history` rows are left in place.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// History for one service, newest first. `seq` breaks timestamp ties
    /// in insertion order.
    pub async fn list_history(
        pool: &PgPool,
        service_id: DbId,
    ) -> Result<Vec<StatusHistoryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {HISTORY_COLUMNS} FROM status_history WHERE service_id = $1 \
             ORDER BY timestamp DESC, seq DESC"
        );
        sqlx::query_as::<_, StatusHistoryRow>(&query)
            .bind(service_id)
            .fetch_all(pool)
            .await
    }
}
