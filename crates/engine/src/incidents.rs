//! Incident lifecycle engine.
//!
//! Incidents start in `investigating`, move through statuses set by
//! dashboard users, and end in `resolved`. `resolvedAt` is set exactly when
//! the status is `resolved`. Events carry the incident with its full
//! update timeline.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use statuspage_core::error::{CoreError, CoreResult};
use statuspage_core::incident::IncidentStatus;
use statuspage_core::models::{Incident, IncidentUpdate, IncidentWithUpdates};
use statuspage_core::principal::{authorize, Principal};
use statuspage_core::roles::{Role, MANAGE_ROLES, READ_ROLES};
use statuspage_core::store::RecordStore;
use statuspage_core::types::{new_id, DbId};
use statuspage_core::validation::{optional_text, require_text, MAX_NAME_LEN, MAX_TEXT_LEN};
use statuspage_events::{ChangeBus, ChangeEvent, ChangeKind};

use crate::config::{EngineConfig, ResolvedUpdatePolicy};
use crate::locks::EntityLocks;

/// Input for [`IncidentEngine::create_incident`].
#[derive(Debug, Clone, Default)]
pub struct NewIncident {
    pub title: String,
    pub description: String,
    /// Affected services. Not checked against the service catalog.
    pub service_ids: Vec<DbId>,
}

#[derive(Clone)]
pub struct IncidentEngine {
    pub(crate) store: Arc<dyn RecordStore>,
    pub(crate) bus: ChangeBus,
    pub(crate) locks: EntityLocks,
    config: EngineConfig,
}

impl IncidentEngine {
    pub fn new(
        store: Arc<dyn RecordStore>,
        bus: ChangeBus,
        locks: EntityLocks,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            bus,
            locks,
            config,
        }
    }

    pub fn resolved_update_policy(&self) -> ResolvedUpdatePolicy {
        self.config.resolved_updates
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    pub async fn create_incident(
        &self,
        principal: &Principal,
        organization_id: DbId,
        input: NewIncident,
    ) -> CoreResult<IncidentWithUpdates> {
        authorize(principal, organization_id, MANAGE_ROLES)?;
        let title = require_text("title", &input.title, MAX_NAME_LEN)?;
        let description = optional_text("description", &input.description, MAX_TEXT_LEN)?;
        if self.store.find_organization(organization_id).await?.is_none() {
            return Err(CoreError::not_found("Organization", organization_id));
        }

        let id = new_id();
        let _guard = self.locks.lock(id).await;
        let incident = Incident {
            id,
            organization_id,
            title,
            description,
            status: IncidentStatus::Investigating,
            service_ids: dedup(input.service_ids),
            created_by: principal.id,
            created_at: Utc::now(),
            resolved_at: None,
        };
        self.store.insert_incident(&incident).await?;

        tracing::info!(
            incident_id = %incident.id,
            org_id = %organization_id,
            user_id = %principal.id,
            "Incident created",
        );
        let view = IncidentWithUpdates {
            incident,
            updates: Vec::new(),
        };
        self.publish(ChangeKind::IncidentCreated, &view);
        Ok(view)
    }

    /// Append a timeline message. On a resolved incident this follows the
    /// configured [`ResolvedUpdatePolicy`].
    pub async fn append_update(
        &self,
        principal: &Principal,
        incident_id: DbId,
        message: &str,
    ) -> CoreResult<IncidentWithUpdates> {
        let message = require_text("message", message, MAX_TEXT_LEN)?;

        let _guard = self.locks.lock(incident_id).await;
        let incident = self.load(principal, incident_id, MANAGE_ROLES).await?;
        let mut view = self.with_updates(incident).await?;

        if view.incident.status.is_terminal()
            && self.config.resolved_updates == ResolvedUpdatePolicy::Reject
        {
            return Err(CoreError::Conflict(format!(
                "Incident {incident_id} is resolved and no longer accepts updates"
            )));
        }

        let update = IncidentUpdate {
            id: new_id(),
            incident_id,
            message,
            updated_by: principal.id,
            timestamp: Utc::now(),
        };
        if !self.store.insert_incident_update(&update).await? {
            return Err(CoreError::not_found("Incident", incident_id));
        }

        tracing::info!(
            incident_id = %incident_id,
            update_id = %update.id,
            user_id = %principal.id,
            "Incident update appended",
        );
        view.updates.push(update);
        self.publish(ChangeKind::IncidentUpdated, &view);
        Ok(view)
    }

    /// Mark resolved. Repeating the call re-emits `incidentUpdated` and
    /// keeps the original `resolvedAt`.
    pub async fn resolve(
        &self,
        principal: &Principal,
        incident_id: DbId,
    ) -> CoreResult<IncidentWithUpdates> {
        let _guard = self.locks.lock(incident_id).await;
        let incident = self.load(principal, incident_id, MANAGE_ROLES).await?;
        let mut view = self.with_updates(incident).await?;

        if view.incident.status.is_terminal() {
            tracing::debug!(incident_id = %incident_id, "Incident already resolved");
        } else {
            view.incident.status = IncidentStatus::Resolved;
            view.incident.resolved_at = Some(Utc::now());
            self.commit(&view.incident).await?;
            tracing::info!(incident_id = %incident_id, user_id = %principal.id, "Incident resolved");
        }

        self.publish(ChangeKind::IncidentUpdated, &view);
        Ok(view)
    }

    /// Direct status edit. `resolved` goes through [`resolve`](Self::resolve);
    /// a resolved incident rejects further edits with `Conflict`.
    pub async fn set_incident_status(
        &self,
        principal: &Principal,
        incident_id: DbId,
        status: IncidentStatus,
    ) -> CoreResult<IncidentWithUpdates> {
        if status == IncidentStatus::Resolved {
            return self.resolve(principal, incident_id).await;
        }

        let _guard = self.locks.lock(incident_id).await;
        let incident = self.load(principal, incident_id, MANAGE_ROLES).await?;

        if incident.status.is_terminal() {
            return Err(CoreError::Conflict(format!(
                "Incident {incident_id} is resolved; its status can no longer change"
            )));
        }

        let mut view = self.with_updates(incident).await?;
        let previous = view.incident.status;
        view.incident.status = status;
        self.commit(&view.incident).await?;

        tracing::info!(
            incident_id = %incident_id,
            from = %previous,
            to = %status,
            user_id = %principal.id,
            "Incident status changed",
        );
        self.publish(ChangeKind::IncidentUpdated, &view);
        Ok(view)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn get_incident(
        &self,
        principal: &Principal,
        incident_id: DbId,
    ) -> CoreResult<IncidentWithUpdates> {
        let incident = self.load(principal, incident_id, READ_ROLES).await?;
        self.with_updates(incident).await
    }

    /// Incidents of the principal's organization, newest first.
    pub async fn list_incidents(&self, principal: &Principal) -> CoreResult<Vec<IncidentWithUpdates>> {
        authorize(principal, principal.organization_id, READ_ROLES)?;
        list_with_updates(self.store.as_ref(), principal.organization_id).await
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Absent and foreign incidents are both reported as `NotFound`.
    async fn load(
        &self,
        principal: &Principal,
        incident_id: DbId,
        roles: &[Role],
    ) -> CoreResult<Incident> {
        let incident = self
            .store
            .find_incident(incident_id)
            .await?
            .filter(|i| i.organization_id == principal.organization_id)
            .ok_or_else(|| CoreError::not_found("Incident", incident_id))?;
        authorize(principal, incident.organization_id, roles)?;
        Ok(incident)
    }

    async fn commit(&self, incident: &Incident) -> CoreResult<()> {
        if self.store.update_incident(incident).await? {
            Ok(())
        } else {
            Err(CoreError::not_found("Incident", incident.id))
        }
    }

    /// Mutations call this before committing, so nothing fallible runs
    /// between the commit and the publish.
    async fn with_updates(&self, incident: Incident) -> CoreResult<IncidentWithUpdates> {
        let updates = self.store.list_incident_updates(incident.id).await?;
        Ok(IncidentWithUpdates { incident, updates })
    }

    fn publish(&self, kind: ChangeKind, view: &IncidentWithUpdates) {
        self.bus.publish(ChangeEvent::from_record(
            kind,
            view.incident.organization_id,
            view,
        ));
    }
}

/// All incidents of one organization with their timelines, newest first.
pub(crate) async fn list_with_updates(
    store: &dyn RecordStore,
    organization_id: DbId,
) -> CoreResult<Vec<IncidentWithUpdates>> {
    let incidents = store.list_incidents(organization_id).await?;
    let mut views = Vec::with_capacity(incidents.len());
    for incident in incidents {
        let updates = store.list_incident_updates(incident.id).await?;
        views.push(IncidentWithUpdates { incident, updates });
    }
    Ok(views)
}

/// Keep the first occurrence of each id, preserving order.
pub(crate) fn dedup(ids: Vec<DbId>) -> Vec<DbId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
