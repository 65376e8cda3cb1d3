//! Service status engine.
//!
//! Owns service lifecycle and status transitions. Every committed status
//! (including the initial one at creation) produces exactly one history
//! entry, written in the same store call as the service itself.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use statuspage_core::error::{CoreError, CoreResult};
use statuspage_core::models::{Service, StatusHistoryEntry};
use statuspage_core::principal::{authorize, Principal};
use statuspage_core::roles::{Role, MANAGE_ROLES, READ_ROLES};
use statuspage_core::service_status::{overall_status, ServiceStatus};
use statuspage_core::store::RecordStore;
use statuspage_core::types::{new_id, DbId};
use statuspage_core::validation::{require_text, MAX_NAME_LEN};
use statuspage_events::{ChangeBus, ChangeEvent, ChangeKind};

use crate::locks::EntityLocks;

/// Partial update of a service. `status`, when present, is recorded exactly
/// like [`ServiceEngine::set_status`].
#[derive(Debug, Clone, Default)]
pub struct ServicePatch {
    pub name: Option<String>,
    pub status: Option<ServiceStatus>,
}

impl ServicePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.status.is_none()
    }
}

/// `statusUpdated` payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusChange<'a> {
    service_id: DbId,
    status: ServiceStatus,
    service: &'a Service,
}

/// `serviceDeleted` payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceRemoved {
    service_id: DbId,
}

#[derive(Clone)]
pub struct ServiceEngine {
    store: Arc<dyn RecordStore>,
    bus: ChangeBus,
    locks: EntityLocks,
}

impl ServiceEngine {
    pub fn new(store: Arc<dyn RecordStore>, bus: ChangeBus, locks: EntityLocks) -> Self {
        Self { store, bus, locks }
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Create a service in `operational` state.
    pub async fn create_service(
        &self,
        principal: &Principal,
        organization_id: DbId,
        name: &str,
    ) -> CoreResult<Service> {
        authorize(principal, organization_id, MANAGE_ROLES)?;
        let name = require_text("name", name, MAX_NAME_LEN)?;
        if self.store.find_organization(organization_id).await?.is_none() {
            return Err(CoreError::not_found("Organization", organization_id));
        }

        let id = new_id();
        let _guard = self.locks.lock(id).await;
        let now = Utc::now();
        let service = Service {
            id,
            organization_id,
            name,
            status: ServiceStatus::Operational,
            created_at: now,
            updated_at: now,
        };
        let initial = StatusHistoryEntry::for_service(&service, principal.id);
        self.store.insert_service(&service, &initial).await?;

        tracing::info!(
            service_id = %service.id,
            org_id = %organization_id,
            user_id = %principal.id,
            "Service created",
        );
        self.bus.publish(ChangeEvent::from_record(
            ChangeKind::ServiceCreated,
            organization_id,
            &service,
        ));
        Ok(service)
    }

    /// Apply `patch`. With a status it emits `statusUpdated`, otherwise
    /// `serviceUpdated`.
    pub async fn update_service_fields(
        &self,
        principal: &Principal,
        service_id: DbId,
        patch: ServicePatch,
    ) -> CoreResult<Service> {
        if patch.is_empty() {
            return Err(CoreError::Validation(
                "At least one of name or status must be provided".into(),
            ));
        }
        let name = patch
            .name
            .as_deref()
            .map(|n| require_text("name", n, MAX_NAME_LEN))
            .transpose()?;

        let _guard = self.locks.lock(service_id).await;
        let mut service = self.load(principal, service_id, MANAGE_ROLES).await?;

        if let Some(name) = name {
            service.name = name;
        }
        match patch.status {
            Some(status) => self.commit_status(principal, service, status).await,
            None => {
                service.updated_at = Utc::now().max(service.updated_at);
                self.commit(&service, None).await?;
                tracing::info!(service_id = %service.id, user_id = %principal.id, "Service updated");
                self.bus.publish(ChangeEvent::from_record(
                    ChangeKind::ServiceUpdated,
                    service.organization_id,
                    &service,
                ));
                Ok(service)
            }
        }
    }

    /// Record a new status and its history entry atomically.
    pub async fn set_status(
        &self,
        principal: &Principal,
        service_id: DbId,
        status: ServiceStatus,
    ) -> CoreResult<Service> {
        let _guard = self.locks.lock(service_id).await;
        let service = self.load(principal, service_id, MANAGE_ROLES).await?;
        self.commit_status(principal, service, status).await
    }

    /// Hard delete. History entries are kept.
    pub async fn delete_service(&self, principal: &Principal, service_id: DbId) -> CoreResult<()> {
        let _guard = self.locks.lock(service_id).await;
        let service = self.load(principal, service_id, MANAGE_ROLES).await?;

        if !self.store.delete_service(service_id).await? {
            return Err(CoreError::not_found("Service", service_id));
        }

        tracing::info!(service_id = %service_id, user_id = %principal.id, "Service deleted");
        self.bus.publish(ChangeEvent::from_record(
            ChangeKind::ServiceDeleted,
            service.organization_id,
            &ServiceRemoved { service_id },
        ));
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn get_service(&self, principal: &Principal, service_id: DbId) -> CoreResult<Service> {
        self.load(principal, service_id, READ_ROLES).await
    }

    pub async fn list_services(&self, principal: &Principal) -> CoreResult<Vec<Service>> {
        authorize(principal, principal.organization_id, READ_ROLES)?;
        Ok(self.store.list_services(principal.organization_id).await?)
    }

    /// Status history, most recent first.
    pub async fn get_history(
        &self,
        principal: &Principal,
        service_id: DbId,
    ) -> CoreResult<Vec<StatusHistoryEntry>> {
        self.load(principal, service_id, READ_ROLES).await?;
        Ok(self.store.list_status_history(service_id).await?)
    }

    /// Worst status across the principal's organization.
    pub async fn overall_status(&self, principal: &Principal) -> CoreResult<ServiceStatus> {
        let services = self.list_services(principal).await?;
        Ok(overall_status(services.iter().map(|s| s.status)))
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Fetch a service and check the principal may act on it.
    async fn load(
        &self,
        principal: &Principal,
        service_id: DbId,
        roles: &[Role],
    ) -> CoreResult<Service> {
        let service = self
            .store
            .find_service(service_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Service", service_id))?;
        authorize(principal, service.organization_id, roles)?;
        Ok(service)
    }

    /// Caller must hold the service's entity lock.
    async fn commit_status(
        &self,
        principal: &Principal,
        mut service: Service,
        status: ServiceStatus,
    ) -> CoreResult<Service> {
        let previous = service.status;
        service.status = status;
        // History is ordered by timestamp; never let it run backwards.
        service.updated_at = Utc::now().max(service.updated_at);
        let entry = StatusHistoryEntry::for_service(&service, principal.id);
        self.commit(&service, Some(&entry)).await?;

        tracing::info!(
            service_id = %service.id,
            from = %previous,
            to = %status,
            user_id = %principal.id,
            "Service status changed",
        );
        self.bus.publish(ChangeEvent::from_record(
            ChangeKind::StatusUpdated,
            service.organization_id,
            &StatusChange {
                service_id: service.id,
                status,
                service: &service,
            },
        ));
        Ok(service)
    }

    async fn commit(&self, service: &Service, entry: Option<&StatusHistoryEntry>) -> CoreResult<()> {
        if self.store.update_service(service, entry).await? {
            Ok(())
        } else {
            Err(CoreError::not_found("Service", service.id))
        }
    }
}
