#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use statuspage_core::models::{
    Incident, IncidentUpdate, Maintenance, Organization, Service, StatusHistoryEntry,
};
use statuspage_core::principal::Principal;
use statuspage_core::roles::Role;
use statuspage_core::store::{RecordStore, StoreError, StoreResult};
use statuspage_core::types::{new_id, DbId};
use statuspage_db::MemoryStore;
use statuspage_engine::{EngineConfig, StatusEngine};
use statuspage_events::{ChangeBus, ChangeEvent, Subscription};

/// Engine over a fresh in-memory store and bus.
pub fn engine_with(config: EngineConfig) -> StatusEngine {
    StatusEngine::new(Arc::new(MemoryStore::new()), ChangeBus::default(), config)
}

pub fn engine() -> StatusEngine {
    engine_with(EngineConfig::default())
}

/// Engine over a [`FailingStore`], returned alongside the store so tests
/// can switch failures on after setup.
pub fn failing_engine() -> (StatusEngine, Arc<FailingStore>) {
    let store = Arc::new(FailingStore::default());
    let engine = StatusEngine::new(
        Arc::clone(&store) as Arc<dyn RecordStore>,
        ChangeBus::default(),
        EngineConfig::default(),
    );
    (engine, store)
}

/// Register `slug` and return it with an admin principal.
pub async fn tenant(engine: &StatusEngine, slug: &str) -> (Organization, Principal) {
    let org = engine
        .tenants()
        .register(&slug.to_uppercase(), slug)
        .await
        .unwrap();
    let admin = Principal::new(new_id(), org.id, Role::Admin);
    (org, admin)
}

pub fn principal(org: &Organization, role: Role) -> Principal {
    Principal::new(new_id(), org.id, role)
}

/// Everything currently queued on `sub`.
pub fn drain(sub: &mut Subscription) -> Vec<ChangeEvent> {
    std::iter::from_fn(|| sub.try_recv()).collect()
}

// ---------------------------------------------------------------------------
// Store with injectable backend failures
// ---------------------------------------------------------------------------

/// Store operations [`FailingStore`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    InsertService,
    UpdateService,
    InsertIncident,
    UpdateIncident,
    InsertIncidentUpdate,
    ListIncidentUpdates,
}

/// [`MemoryStore`] whose selected operations return
/// [`StoreError::Backend`] without touching the data.
#[derive(Default)]
pub struct FailingStore {
    inner: MemoryStore,
    failing: Mutex<HashSet<StoreOp>>,
}

impl FailingStore {
    pub fn fail(&self, op: StoreOp) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    fn check(&self, op: StoreOp) -> StoreResult<()> {
        if self.failing.lock().unwrap().contains(&op) {
            return Err(StoreError::Backend(format!("{op:?}: connection reset")));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FailingStore {
    async fn insert_organization(&self, organization: &Organization) -> StoreResult<()> {
        self.inner.insert_organization(organization).await
    }

    async fn find_organization(&self, id: DbId) -> StoreResult<Option<Organization>> {
        self.inner.find_organization(id).await
    }

    async fn find_organization_by_slug(&self, slug: &str) -> StoreResult<Option<Organization>> {
        self.inner.find_organization_by_slug(slug).await
    }

    async fn list_organizations(&self) -> StoreResult<Vec<Organization>> {
        self.inner.list_organizations().await
    }

    async fn insert_service(
        &self,
        service: &Service,
        initial: &StatusHistoryEntry,
    ) -> StoreResult<()> {
        self.check(StoreOp::InsertService)?;
        self.inner.insert_service(service, initial).await
    }

    async fn find_service(&self, id: DbId) -> StoreResult<Option<Service>> {
        self.inner.find_service(id).await
    }

    async fn list_services(&self, organization_id: DbId) -> StoreResult<Vec<Service>> {
        self.inner.list_services(organization_id).await
    }

    async fn update_service(
        &self,
        service: &Service,
        history: Option<&StatusHistoryEntry>,
    ) -> StoreResult<bool> {
        self.check(StoreOp::UpdateService)?;
        self.inner.update_service(service, history).await
    }

    async fn delete_service(&self, id: DbId) -> StoreResult<bool> {
        self.inner.delete_service(id).await
    }

    async fn list_status_history(&self, service_id: DbId) -> StoreResult<Vec<StatusHistoryEntry>> {
        self.inner.list_status_history(service_id).await
    }

    async fn insert_incident(&self, incident: &Incident) -> StoreResult<()> {
        self.check(StoreOp::InsertIncident)?;
        self.inner.insert_incident(incident).await
    }

    async fn find_incident(&self, id: DbId) -> StoreResult<Option<Incident>> {
        self.inner.find_incident(id).await
    }

    async fn list_incidents(&self, organization_id: DbId) -> StoreResult<Vec<Incident>> {
        self.inner.list_incidents(organization_id).await
    }

    async fn update_incident(&self, incident: &Incident) -> StoreResult<bool> {
        self.check(StoreOp::UpdateIncident)?;
        self.inner.update_incident(incident).await
    }

    async fn insert_incident_update(&self, update: &IncidentUpdate) -> StoreResult<bool> {
        self.check(StoreOp::InsertIncidentUpdate)?;
        self.inner.insert_incident_update(update).await
    }

    async fn list_incident_updates(&self, incident_id: DbId) -> StoreResult<Vec<IncidentUpdate>> {
        self.check(StoreOp::ListIncidentUpdates)?;
        self.inner.list_incident_updates(incident_id).await
    }

    async fn insert_maintenance(&self, maintenance: &Maintenance) -> StoreResult<()> {
        self.inner.insert_maintenance(maintenance).await
    }

    async fn find_maintenance(&self, id: DbId) -> StoreResult<Option<Maintenance>> {
        self.inner.find_maintenance(id).await
    }

    async fn list_maintenances(&self, organization_id: DbId) -> StoreResult<Vec<Maintenance>> {
        self.inner.list_maintenances(organization_id).await
    }

    async fn update_maintenance(&self, maintenance: &Maintenance) -> StoreResult<bool> {
        self.inner.update_maintenance(maintenance).await
    }
}
