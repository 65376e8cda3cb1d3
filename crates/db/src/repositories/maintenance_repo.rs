//! Repository for the `maintenances` table.

use sqlx::PgPool;
use statuspage_core::models::Maintenance;
use statuspage_core::types::DbId;

use crate::models::maintenance::MaintenanceRow;

/// Column list for `maintenances` queries.
const COLUMNS: &str = "\
    id, organization_id, title, description, service_ids, status, \
    scheduled_start, scheduled_end, created_by, created_at";

/// Provides data access for scheduled maintenances.
pub struct MaintenanceRepo;

impl MaintenanceRepo {
    pub async fn insert(pool: &PgPool, maintenance: &Maintenance) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO maintenances \
                (id, organization_id, title, description, service_ids, status, \
                 scheduled_start, scheduled_end, created_by, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(maintenance.id)
        .bind(maintenance.organization_id)
        .bind(&maintenance.title)
        .bind(&maintenance.description)
        .bind(&maintenance.service_ids)
        .bind(maintenance.status.as_str())
        .bind(maintenance.scheduled_start)
        .bind(maintenance.scheduled_end)
        .bind(maintenance.created_by)
        .bind(maintenance.created_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MaintenanceRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM maintenances WHERE id = $1");
        sqlx::query_as::<_, MaintenanceRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Maintenances of one organization ordered by scheduled start.
    pub async fn list_by_organization(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<MaintenanceRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM maintenances WHERE organization_id = $1 \
             ORDER BY scheduled_start, id"
        );
        sqlx::query_as::<_, MaintenanceRow>(&query)
            .bind(organization_id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite the mutable maintenance fields. Returns `false` if no row matched.
    pub async fn update(pool: &PgPool, maintenance: &Maintenance) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE maintenances SET \
                 title = $2, description = $3, service_ids = $4, status = $5, \
                 scheduled_start = $6, scheduled_end = $7 \
             WHERE id = $1",
        )
        .bind(maintenance.id)
        .bind(&maintenance.title)
        .bind(&maintenance.description)
        .bind(&maintenance.service_ids)
        .bind(maintenance.status.as_str())
        .bind(maintenance.scheduled_start)
        .bind(maintenance.scheduled_end)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
