//! [`RecordStore`] backed by PostgreSQL.

use async_trait::async_trait;
use statuspage_core::models::{
    Incident, IncidentUpdate, Maintenance, Organization, Service, StatusHistoryEntry,
};
use statuspage_core::store::{RecordStore, StoreError, StoreResult};
use statuspage_core::types::DbId;

use crate::repositories::{IncidentRepo, MaintenanceRepo, OrganizationRepo, ServiceRepo};
use crate::DbPool;

/// PostgreSQL backend. Cheap to clone (the pool is reference-counted).
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Classify a sqlx error into a [`StoreError`].
///
/// Unique violations on constraints named `uq_*` (PostgreSQL code 23505)
/// become [`StoreError::Duplicate`]; everything else is a backend failure.
fn store_error(entity: &'static str, err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return StoreError::Duplicate {
                    entity,
                    detail: format!("violates unique constraint {constraint}"),
                };
            }
        }
    }
    tracing::error!(entity, error = %err, "Database error");
    StoreError::Backend(err.to_string())
}

fn collect<R, T>(rows: Vec<R>) -> StoreResult<Vec<T>>
where
    T: TryFrom<R, Error = StoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}

#[async_trait]
impl RecordStore for PgStore {
    async fn insert_organization(&self, organization: &Organization) -> StoreResult<()> {
        OrganizationRepo::insert(&self.pool, organization)
            .await
            .map_err(|e| store_error("Organization", e))
    }

    async fn find_organization(&self, id: DbId) -> StoreResult<Option<Organization>> {
        let row = OrganizationRepo::find_by_id(&self.pool, id)
            .await
            .map_err(|e| store_error("Organization", e))?;
        Ok(row.map(Organization::from))
    }

    async fn find_organization_by_slug(&self, slug: &str) -> StoreResult<Option<Organization>> {
        let row = OrganizationRepo::find_by_slug(&self.pool, slug)
            .await
            .map_err(|e| store_error("Organization", e))?;
        Ok(row.map(Organization::from))
    }

    async fn list_organizations(&self) -> StoreResult<Vec<Organization>> {
        let rows = OrganizationRepo::list(&self.pool)
            .await
            .map_err(|e| store_error("Organization", e))?;
        Ok(rows.into_iter().map(Organization::from).collect())
    }

    async fn insert_service(
        &self,
        service: &Service,
        initial: &StatusHistoryEntry,
    ) -> StoreResult<()> {
        ServiceRepo::insert_with_history(&self.pool, service, initial)
            .await
            .map_err(|e| store_error("Service", e))
    }

    async fn find_service(&self, id: DbId) -> StoreResult<Option<Service>> {
        ServiceRepo::find_by_id(&self.pool, id)
            .await
            .map_err(|e| store_error("Service", e))?
            .map(Service::try_from)
            .transpose()
    }

    async fn list_services(&self, organization_id: DbId) -> StoreResult<Vec<Service>> {
        let rows = ServiceRepo::list_by_organization(&self.pool, organization_id)
            .await
            .map_err(|e| store_error("Service", e))?;
        collect(rows)
    }

    async fn update_service(
        &self,
        service: &Service,
        history: Option<&StatusHistoryEntry>,
    ) -> StoreResult<bool> {
        ServiceRepo::update_with_history(&self.pool, service, history)
            .await
            .map_err(|e| store_error("Service", e))
    }

    async fn delete_service(&self, id: DbId) -> StoreResult<bool> {
        ServiceRepo::delete(&self.pool, id)
            .await
            .map_err(|e| store_error("Service", e))
    }

    async fn list_status_history(&self, service_id: DbId) -> StoreResult<Vec<StatusHistoryEntry>> {
        let rows = ServiceRepo::list_history(&self.pool, service_id)
            .await
            .map_err(|e| store_error("StatusHistoryEntry", e))?;
        collect(rows)
    }

    async fn insert_incident(&self, incident: &Incident) -> StoreResult<()> {
        IncidentRepo::insert(&self.pool, incident)
            .await
            .map_err(|e| store_error("Incident", e))
    }

    async fn find_incident(&self, id: DbId) -> StoreResult<Option<Incident>> {
        IncidentRepo::find_by_id(&self.pool, id)
            .await
            .map_err(|e| store_error("Incident", e))?
            .map(Incident::try_from)
            .transpose()
    }

    async fn list_incidents(&self, organization_id: DbId) -> StoreResult<Vec<Incident>> {
        let rows = IncidentRepo::list_by_organization(&self.pool, organization_id)
            .await
            .map_err(|e| store_error("Incident", e))?;
        collect(rows)
    }

    async fn update_incident(&self, incident: &Incident) -> StoreResult<bool> {
        IncidentRepo::update(&self.pool, incident)
            .await
            .map_err(|e| store_error("Incident", e))
    }

    async fn insert_incident_update(&self, update: &IncidentUpdate) -> StoreResult<bool> {
        IncidentRepo::insert_update(&self.pool, update)
            .await
            .map_err(|e| store_error("IncidentUpdate", e))
    }

    async fn list_incident_updates(&self, incident_id: DbId) -> StoreResult<Vec<IncidentUpdate>> {
        let rows = IncidentRepo::list_updates(&self.pool, incident_id)
            .await
            .map_err(|e| store_error("IncidentUpdate", e))?;
        Ok(rows.into_iter().map(IncidentUpdate::from).collect())
    }

    async fn insert_maintenance(&self, maintenance: &Maintenance) -> StoreResult<()> {
        MaintenanceRepo::insert(&self.pool, maintenance)
            .await
            .map_err(|e| store_error("Maintenance", e))
    }

    async fn find_maintenance(&self, id: DbId) -> StoreResult<Option<Maintenance>> {
        MaintenanceRepo::find_by_id(&self.pool, id)
            .await
            .map_err(|e| store_error("Maintenance", e))?
            .map(Maintenance::try_from)
            .transpose()
    }

    async fn list_maintenances(&self, organization_id: DbId) -> StoreResult<Vec<Maintenance>> {
        let rows = MaintenanceRepo::list_by_organization(&self.pool, organization_id)
            .await
            .map_err(|e| store_error("Maintenance", e))?;
        collect(rows)
    }

    async fn update_maintenance(&self, maintenance: &Maintenance) -> StoreResult<bool> {
        MaintenanceRepo::update(&self.pool, maintenance)
            .await
            .map_err(|e| store_error("Maintenance", e))
    }
}
