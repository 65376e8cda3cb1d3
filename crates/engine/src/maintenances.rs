//! Scheduled maintenance windows, handled by the incident engine.

use chrono::Utc;
use statuspage_core::error::{CoreError, CoreResult};
use statuspage_core::maintenance::{validate_schedule, MaintenanceStatus};
use statuspage_core::models::Maintenance;
use statuspage_core::principal::{authorize, Principal};
use statuspage_core::roles::{MANAGE_ROLES, READ_ROLES};
use statuspage_core::types::{new_id, DbId, Timestamp};
use statuspage_core::validation::{optional_text, require_text, MAX_NAME_LEN, MAX_TEXT_LEN};
use statuspage_events::{ChangeEvent, ChangeKind};

use crate::incidents::{dedup, IncidentEngine};

/// Input for [`IncidentEngine::create_maintenance`].
#[derive(Debug, Clone)]
pub struct NewMaintenance {
    pub title: String,
    pub description: String,
    pub service_ids: Vec<DbId>,
    pub scheduled_start: Timestamp,
    pub scheduled_end: Timestamp,
}

impl IncidentEngine {
    /// Schedule a window. Requires `scheduled_start < scheduled_end`.
    pub async fn create_maintenance(
        &self,
        principal: &Principal,
        organization_id: DbId,
        input: NewMaintenance,
    ) -> CoreResult<Maintenance> {
        authorize(principal, organization_id, MANAGE_ROLES)?;
        let title = require_text("title", &input.title, MAX_NAME_LEN)?;
        let description = optional_text("description", &input.description, MAX_TEXT_LEN)?;
        validate_schedule(input.scheduled_start, input.scheduled_end)?;
        if self.store.find_organization(organization_id).await?.is_none() {
            return Err(CoreError::not_found("Organization", organization_id));
        }

        let id = new_id();
        let _guard = self.locks.lock(id).await;
        let maintenance = Maintenance {
            id,
            organization_id,
            title,
            description,
            service_ids: dedup(input.service_ids),
            status: MaintenanceStatus::Scheduled,
            scheduled_start: input.scheduled_start,
            scheduled_end: input.scheduled_end,
            created_by: principal.id,
            created_at: Utc::now(),
        };
        self.store.insert_maintenance(&maintenance).await?;

        tracing::info!(
            maintenance_id = %maintenance.id,
            org_id = %organization_id,
            start = %maintenance.scheduled_start,
            end = %maintenance.scheduled_end,
            "Maintenance scheduled",
        );
        self.bus.publish(ChangeEvent::from_record(
            ChangeKind::MaintenanceCreated,
            organization_id,
            &maintenance,
        ));
        Ok(maintenance)
    }

    /// Maintenances of the principal's organization by scheduled start.
    pub async fn list_maintenances(&self, principal: &Principal) -> CoreResult<Vec<Maintenance>> {
        authorize(principal, principal.organization_id, READ_ROLES)?;
        Ok(self.store.list_maintenances(principal.organization_id).await?)
    }

    /// Move a window to `status`. Completed and cancelled windows are
    /// final.
    pub async fn set_maintenance_status(
        &self,
        principal: &Principal,
        maintenance_id: DbId,
        status: MaintenanceStatus,
    ) -> CoreResult<Maintenance> {
        let _guard = self.locks.lock(maintenance_id).await;
        let mut maintenance = self
            .store
            .find_maintenance(maintenance_id)
            .await?
            .filter(|m| m.organization_id == principal.organization_id)
            .ok_or_else(|| CoreError::not_found("Maintenance", maintenance_id))?;
        authorize(principal, maintenance.organization_id, MANAGE_ROLES)?;

        if maintenance.status.is_terminal() {
            return Err(CoreError::Conflict(format!(
                "Maintenance {maintenance_id} is {} and can no longer change",
                maintenance.status
            )));
        }

        maintenance.status = status;
        if !self.store.update_maintenance(&maintenance).await? {
            return Err(CoreError::not_found("Maintenance", maintenance_id));
        }

        tracing::info!(
            maintenance_id = %maintenance_id,
            status = %status,
            user_id = %principal.id,
            "Maintenance status changed",
        );
        self.bus.publish(ChangeEvent::from_record(
            ChangeKind::MaintenanceUpdated,
            maintenance.organization_id,
            &maintenance,
        ));
        Ok(maintenance)
    }
}
