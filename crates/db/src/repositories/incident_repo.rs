//! Repository for the `incidents` and `incident_updates` tables.

use sqlx::PgPool;
use statuspage_core::models::{Incident, IncidentUpdate};
use statuspage_core::types::DbId;

use crate::models::incident::{IncidentRow, IncidentUpdateRow};

/// Column list for `incidents` queries.
const INCIDENT_COLUMNS: &str = "\
    id, organization_id, title, description, status, service_ids, \
    created_by, created_at, resolved_at";

/// Column list for `incident_updates` queries.
const UPDATE_COLUMNS: &str = "id, incident_id, message, updated_by, timestamp";

/// Provides data access for incidents and their update timelines.
pub struct IncidentRepo;

impl IncidentRepo {
    pub async fn insert(pool: &PgPool, incident: &Incident) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO incidents \
                (id, organization_id, title, description, status, service_ids, \
                 created_by, created_at, resolved_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(incident.id)
        .bind(incident.organization_id)
        .bind(&incident.title)
        .bind(&incident.description)
        .bind(incident.status.as_str())
        .bind(&incident.service_ids)
        .bind(incident.created_by)
        .bind(incident.created_at)
        .bind(incident.resolved_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<IncidentRow>, sqlx::Error> {
        let query = format!("SELECT {INCIDENT_COLUMNS} FROM incidents WHERE id = $1");
        sqlx::query_as::<_, IncidentRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Incidents of one organization, newest first.
    pub async fn list_by_organization(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<IncidentRow>, sqlx::Error> {
        let query = format!(
            "SELECT {INCIDENT_COLUMNS} FROM incidents WHERE organization_id = $1 \
             ORDER BY created_at DESC, id"
        );
        sqlx::query_as::<_, IncidentRow>(&query)
            .bind(organization_id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite the mutable incident fields. Returns `false` if no row matched.
    pub async fn update(pool: &PgPool, incident: &Incident) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE incidents SET \
                 title = $2, description = $3, status = $4, service_ids = $5, resolved_at = $6 \
             WHERE id = $1",
        )
        .bind(incident.id)
        .bind(&incident.title)
        .bind(&incident.description)
        .bind(incident.status.as_str())
        .bind(&incident.service_ids)
        .bind(incident.resolved_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Append to an incident's timeline. Returns `false` if the incident
    /// does not exist.
    pub async fn insert_update(pool: &PgPool, update: &IncidentUpdate) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO incident_updates (id, incident_id, message, updated_by, timestamp) \
             SELECT $1, $2, $3, $4, $5 WHERE EXISTS (SELECT 1 FROM incidents WHERE id = $2)",
        )
        .bind(update.id)
        .bind(update.incident_id)
        .bind(&update.message)
        .bind(update.updated_by)
        .bind(update.timestamp)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Timeline for one incident, oldest first.
    pub async fn list_updates(
        pool: &PgPool,
        incident_id: DbId,
    ) -> Result<Vec<IncidentUpdateRow>, sqlx::Error> {
        let query = format!(
            "SELECT {UPDATE_COLUMNS} FROM incident_updates WHERE incident_id = $1 \
             ORDER BY timestamp, seq"
        );
        sqlx::query_as::<_, IncidentUpdateRow>(&query)
            .bind(incident_id)
            .fetch_all(pool)
            .await
    }
}
