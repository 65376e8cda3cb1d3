//! Incident and incident-update row models.

use sqlx::FromRow;
use statuspage_core::incident::IncidentStatus;
use statuspage_core::models::{Incident, IncidentUpdate};
use statuspage_core::store::StoreError;
use statuspage_core::types::{DbId, Timestamp};

use super::corrupt_row;

/// A row from the `incidents` table.
#[derive(Debug, Clone, FromRow)]
pub struct IncidentRow {
    pub id: DbId,
    pub organization_id: DbId,
    pub title: String,
    pub description: String,
    pub status: String,
    pub service_ids: Vec<DbId>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
}

impl TryFrom<IncidentRow> for Incident {
    type Error = StoreError;

    fn try_from(row: IncidentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            organization_id: row.organization_id,
            title: row.title,
            description: row.description,
            status: IncidentStatus::parse(&row.status).map_err(|e| corrupt_row("incidents", e))?,
            service_ids: row.service_ids,
            created_by: row.created_by,
            created_at: row.created_at,
            resolved_at: row.resolved_at,
        })
    }
}

/// A row from the `incident_updates` table.
#[derive(Debug, Clone, FromRow)]
pub struct IncidentUpdateRow {
    pub id: DbId,
    pub incident_id: DbId,
    pub message: String,
    pub updated_by: DbId,
    pub timestamp: Timestamp,
}

impl From<IncidentUpdateRow> for IncidentUpdate {
    fn from(row: IncidentUpdateRow) -> Self {
        Self {
            id: row.id,
            incident_id: row.incident_id,
            message: row.message,
            updated_by: row.updated_by,
            timestamp: row.timestamp,
        }
    }
}
