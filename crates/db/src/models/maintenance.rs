//! Maintenance row model.

use sqlx::FromRow;
use statuspage_core::maintenance::MaintenanceStatus;
use statuspage_core::models::Maintenance;
use statuspage_core::store::StoreError;
use statuspage_core::types::{DbId, Timestamp};

use super::corrupt_row;

/// A row from the `maintenances` table.
#[derive(Debug, Clone, FromRow)]
pub struct MaintenanceRow {
    pub id: DbId,
    pub organization_id: DbId,
    pub title: String,
    pub description: String,
    pub service_ids: Vec<DbId>,
    pub status: String,
    pub scheduled_start: Timestamp,
    pub scheduled_end: Timestamp,
    pub created_by: DbId,
    pub created_at: Timestamp,
}

impl TryFrom<MaintenanceRow> for Maintenance {
    type Error = StoreError;

    fn try_from(row: MaintenanceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            organization_id: row.organization_id,
            title: row.title,
            description: row.description,
            service_ids: row.service_ids,
            status: MaintenanceStatus::parse(&row.status)
                .map_err(|e| corrupt_row("maintenances", e))?,
            scheduled_start: row.scheduled_start,
            scheduled_end: row.scheduled_end,
            created_by: row.created_by,
            created_at: row.created_at,
        })
    }
}
