//! Service and status-history row models.

use sqlx::FromRow;
use statuspage_core::models::{Service, StatusHistoryEntry};
use statuspage_core::service_status::ServiceStatus;
use statuspage_core::store::StoreError;
use statuspage_core::types::{DbId, Timestamp};

use super::corrupt_row;

/// A row from the `services` table.
#[derive(Debug, Clone, FromRow)]
pub struct ServiceRow {
    pub id: DbId,
    pub organization_id: DbId,
    pub name: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<ServiceRow> for Service {
    type Error = StoreError;

    fn try_from(row: ServiceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            organization_id: row.organization_id,
            name: row.name,
            status: ServiceStatus::parse(&row.status).map_err(|e| corrupt_row("services", e))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A row from the `status_history` table.
#[derive(Debug, Clone, FromRow)]
pub struct StatusHistoryRow {
    pub id: DbId,
    pub service_id: DbId,
    pub status: String,
    pub updated_by: DbId,
    pub timestamp: Timestamp,
}

impl TryFrom<StatusHistoryRow> for StatusHistoryEntry {
    type Error = StoreError;

    fn try_from(row: StatusHistoryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            service_id: row.service_id,
            status: ServiceStatus::parse(&row.status)
                .map_err(|e| corrupt_row("status_history", e))?,
            updated_by: row.updated_by,
            timestamp: row.timestamp,
        })
    }
}
