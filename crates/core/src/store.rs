//! The record store abstraction the engines are written against.
//!
//! Backends live in `statuspage-db`. The engines hold an
//! `Arc<dyn RecordStore>` handed to them at construction time and never
//! know which backend is behind it.
//!
//! Every method that touches more than one record (service + history entry)
//! is a single atomic unit: either all writes become visible or none do.

use async_trait::async_trait;

use crate::models::{
    Incident, IncidentUpdate, Maintenance, Organization, Service, StatusHistoryEntry,
};
use crate::types::DbId;

/// Failure reported by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated (e.g. organization slug).
    #[error("Duplicate {entity}: {detail}")]
    Duplicate {
        entity: &'static str,
        detail: String,
    },

    /// The backend failed (connection loss, I/O, corrupt row, ...).
    #[error("Storage backend failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait RecordStore: Send + Sync {
    // -----------------------------------------------------------------------
    // Organizations
    // -----------------------------------------------------------------------

    /// Fails with [`StoreError::Duplicate`] when the id or slug is taken.
    async fn insert_organization(&self, organization: &Organization) -> StoreResult<()>;

    async fn find_organization(&self, id: DbId) -> StoreResult<Option<Organization>>;

    async fn find_organization_by_slug(&self, slug: &str) -> StoreResult<Option<Organization>>;

    /// All organizations ordered by slug.
    async fn list_organizations(&self) -> StoreResult<Vec<Organization>>;

    // -----------------------------------------------------------------------
    // Services and status history
    // -----------------------------------------------------------------------

    /// Insert a service together with its initial history entry.
    async fn insert_service(
        &self,
        service: &Service,
        initial: &StatusHistoryEntry,
    ) -> StoreResult<()>;

    async fn find_service(&self, id: DbId) -> StoreResult<Option<Service>>;

    /// Services of one organization ordered by name.
    async fn list_services(&self, organization_id: DbId) -> StoreResult<Vec<Service>>;

    /// Overwrite a stored service and, when `history` is given, append it in
    /// the same atomic unit. Returns `false` if the service does not exist
    /// (nothing is written in that case).
    async fn update_service(
        &self,
        service: &Service,
        history: Option<&StatusHistoryEntry>,
    ) -> StoreResult<bool>;

    /// Hard-delete a service. History entries are retained.
    async fn delete_service(&self, id: DbId) -> StoreResult<bool>;

    /// History of one service, most recent first.
    async fn list_status_history(&self, service_id: DbId) -> StoreResult<Vec<StatusHistoryEntry>>;

    // -----------------------------------------------------------------------
    // Incidents and update timelines
    // -----------------------------------------------------------------------

    async fn insert_incident(&self, incident: &Incident) -> StoreResult<()>;

    async fn find_incident(&self, id: DbId) -> StoreResult<Option<Incident>>;

    /// Incidents of one organization, most recently created first.
    async fn list_incidents(&self, organization_id: DbId) -> StoreResult<Vec<Incident>>;

    /// Returns `false` if the incident does not exist.
    async fn update_incident(&self, incident: &Incident) -> StoreResult<bool>;

    /// Append to an incident's timeline. Returns `false` if the incident
    /// does not exist.
    async fn insert_incident_update(&self, update: &IncidentUpdate) -> StoreResult<bool>;

    /// Timeline of one incident, oldest first.
    async fn list_incident_updates(&self, incident_id: DbId) -> StoreResult<Vec<IncidentUpdate>>;

    // -----------------------------------------------------------------------
    // Maintenances
    // -----------------------------------------------------------------------

    async fn insert_maintenance(&self, maintenance: &Maintenance) -> StoreResult<()>;

    async fn find_maintenance(&self, id: DbId) -> StoreResult<Option<Maintenance>>;

    /// Maintenances of one organization ordered by scheduled start.
    async fn list_maintenances(&self, organization_id: DbId) -> StoreResult<Vec<Maintenance>>;

    /// Returns `false` if the maintenance does not exist.
    async fn update_maintenance(&self, maintenance: &Maintenance) -> StoreResult<bool>;
}
