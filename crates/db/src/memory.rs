//! In-process [`RecordStore`].
//!
//! All tables sit behind a single `RwLock`; every trait method holds the
//! lock for its whole body, so compound writes (service + history entry)
//! are observed all-or-nothing by concurrent readers.

use std::collections::HashMap;

use async_trait::async_trait;
use statuspage_core::models::{
    Incident, IncidentUpdate, Maintenance, Organization, Service, StatusHistoryEntry,
};
use statuspage_core::store::{RecordStore, StoreError, StoreResult};
use statuspage_core::types::DbId;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    organizations: HashMap<DbId, Organization>,
    services: HashMap<DbId, Service>,
    /// Insertion-ordered per service; kept after the service is deleted.
    status_history: HashMap<DbId, Vec<StatusHistoryEntry>>,
    incidents: HashMap<DbId, Incident>,
    /// Insertion-ordered per incident.
    incident_updates: HashMap<DbId, Vec<IncidentUpdate>>,
    maintenances: HashMap<DbId, Maintenance>,
}

/// Memory-resident backend. Construct once and share through an `Arc`.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_organization(&self, organization: &Organization) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.organizations.contains_key(&organization.id) {
            return Err(StoreError::Duplicate {
                entity: "Organization",
                detail: format!("id {}", organization.id),
            });
        }
        if tables
            .organizations
            .values()
            .any(|o| o.slug == organization.slug)
        {
            return Err(StoreError::Duplicate {
                entity: "Organization",
                detail: format!("slug '{}'", organization.slug),
            });
        }
        tables
            .organizations
            .insert(organization.id, organization.clone());
        Ok(())
    }

    async fn find_organization(&self, id: DbId) -> StoreResult<Option<Organization>> {
        Ok(self.tables.read().await.organizations.get(&id).cloned())
    }

    async fn find_organization_by_slug(&self, slug: &str) -> StoreResult<Option<Organization>> {
        Ok(self
            .tables
            .read()
            .await
            .organizations
            .values()
            .find(|o| o.slug == slug)
            .cloned())
    }

    async fn list_organizations(&self) -> StoreResult<Vec<Organization>> {
        let mut orgs: Vec<Organization> = self
            .tables
            .read()
            .await
            .organizations
            .values()
            .cloned()
            .collect();
        orgs.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(orgs)
    }

    async fn insert_service(
        &self,
        service: &Service,
        initial: &StatusHistoryEntry,
    ) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.services.contains_key(&service.id) {
            return Err(StoreError::Duplicate {
                entity: "Service",
                detail: format!("id {}", service.id),
            });
        }
        tables.services.insert(service.id, service.clone());
        tables
            .status_history
            .entry(initial.service_id)
            .or_default()
            .push(initial.clone());
        Ok(())
    }

    async fn find_service(&self, id: DbId) -> StoreResult<Option<Service>> {
        Ok(self.tables.read().await.services.get(&id).cloned())
    }

    async fn list_services(&self, organization_id: DbId) -> StoreResult<Vec<Service>> {
        let mut services: Vec<Service> = self
            .tables
            .read()
            .await
            .services
            .values()
            .filter(|s| s.organization_id == organization_id)
            .cloned()
            .collect();
        services.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(services)
    }

    async fn update_service(
        &self,
        service: &Service,
        history: Option<&StatusHistoryEntry>,
    ) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables.services.get_mut(&service.id) else {
            return Ok(false);
        };
        stored.name = service.name.clone();
        stored.status = service.status;
        stored.updated_at = service.updated_at;
        if let Some(entry) = history {
            tables
                .status_history
                .entry(entry.service_id)
                .or_default()
                .push(entry.clone());
        }
        Ok(true)
    }

    async fn delete_service(&self, id: DbId) -> StoreResult<bool> {
        Ok(self.tables.write().await.services.remove(&id).is_some())
    }

    async fn list_status_history(&self, service_id: DbId) -> StoreResult<Vec<StatusHistoryEntry>> {
        let mut entries: Vec<StatusHistoryEntry> = self
            .tables
            .read()
            .await
            .status_history
            .get(&service_id)
            .map(|entries| entries.iter().rev().cloned().collect())
            .unwrap_or_default();
        // Stable: equal timestamps keep newest-inserted first.
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }

    async fn insert_incident(&self, incident: &Incident) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.incidents.contains_key(&incident.id) {
            return Err(StoreError::Duplicate {
                entity: "Incident",
                detail: format!("id {}", incident.id),
            });
        }
        tables.incidents.insert(incident.id, incident.clone());
        Ok(())
    }

    async fn find_incident(&self, id: DbId) -> StoreResult<Option<Incident>> {
        Ok(self.tables.read().await.incidents.get(&id).cloned())
    }

    async fn list_incidents(&self, organization_id: DbId) -> StoreResult<Vec<Incident>> {
        let mut incidents: Vec<Incident> = self
            .tables
            .read()
            .await
            .incidents
            .values()
            .filter(|i| i.organization_id == organization_id)
            .cloned()
            .collect();
        incidents.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(incidents)
    }

    async fn update_incident(&self, incident: &Incident) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.incidents.get_mut(&incident.id) {
            Some(stored) => {
                *stored = incident.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert_incident_update(&self, update: &IncidentUpdate) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.incidents.contains_key(&update.incident_id) {
            return Ok(false);
        }
        tables
            .incident_updates
            .entry(update.incident_id)
            .or_default()
            .push(update.clone());
        Ok(true)
    }

    async fn list_incident_updates(&self, incident_id: DbId) -> StoreResult<Vec<IncidentUpdate>> {
        let mut updates = self
            .tables
            .read()
            .await
            .incident_updates
            .get(&incident_id)
            .cloned()
            .unwrap_or_default();
        updates.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(updates)
    }

    async fn insert_maintenance(&self, maintenance: &Maintenance) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if tables.maintenances.contains_key(&maintenance.id) {
            return Err(StoreError::Duplicate {
                entity: "Maintenance",
                detail: format!("id {}", maintenance.id),
            });
        }
        tables
            .maintenances
            .insert(maintenance.id, maintenance.clone());
        Ok(())
    }

    async fn find_maintenance(&self, id: DbId) -> StoreResult<Option<Maintenance>> {
        Ok(self.tables.read().await.maintenances.get(&id).cloned())
    }

    async fn list_maintenances(&self, organization_id: DbId) -> StoreResult<Vec<Maintenance>> {
        let mut maintenances: Vec<Maintenance> = self
            .tables
            .read()
            .await
            .maintenances
            .values()
            .filter(|m| m.organization_id == organization_id)
            .cloned()
            .collect();
        maintenances.sort_by(|a, b| {
            a.scheduled_start
                .cmp(&b.scheduled_start)
                .then(a.id.cmp(&b.id))
        });
        Ok(maintenances)
    }

    async fn update_maintenance(&self, maintenance: &Maintenance) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.maintenances.get_mut(&maintenance.id) {
            Some(stored) => {
                *stored = maintenance.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};
    use statuspage_core::service_status::ServiceStatus;
    use statuspage_core::types::new_id;

    use super::*;

    fn org(slug: &str) -> Organization {
        Organization {
            id: new_id(),
            slug: slug.to_string(),
            name: slug.to_uppercase(),
            created_at: Utc::now(),
        }
    }

    fn service(organization_id: DbId, name: &str) -> Service {
        let now = Utc::now();
        Service {
            id: new_id(),
            organization_id,
            name: name.to_string(),
            status: ServiceStatus::Operational,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn duplicate_slug_is_rejected() {
        let store = MemoryStore::new();
        store.insert_organization(&org("acme")).await.unwrap();

        let err = store.insert_organization(&org("acme")).await.unwrap_err();
        assert_matches!(err, StoreError::Duplicate { entity: "Organization", .. });
    }

    #[tokio::test]
    async fn update_of_missing_service_writes_nothing() {
        let store = MemoryStore::new();
        let ghost = service(new_id(), "Ghost");
        let entry = StatusHistoryEntry::for_service(&ghost, new_id());

        let updated = store.update_service(&ghost, Some(&entry)).await.unwrap();

        assert!(!updated);
        assert!(store.list_status_history(ghost.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn history_survives_service_delete_and_is_newest_first() {
        let store = MemoryStore::new();
        let actor = new_id();
        let mut svc = service(new_id(), "API");
        store
            .insert_service(&svc, &StatusHistoryEntry::for_service(&svc, actor))
            .await
            .unwrap();

        svc.status = ServiceStatus::MajorOutage;
        svc.updated_at = svc.updated_at + Duration::seconds(5);
        let entry = StatusHistoryEntry::for_service(&svc, actor);
        assert!(store.update_service(&svc, Some(&entry)).await.unwrap());

        assert!(store.delete_service(svc.id).await.unwrap());
        assert!(store.find_service(svc.id).await.unwrap().is_none());

        let history = store.list_status_history(svc.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].status, ServiceStatus::MajorOutage);
        assert_eq!(history[1].status, ServiceStatus::Operational);
    }

    #[tokio::test]
    async fn equal_timestamps_keep_insertion_order_newest_first() {
        let store = MemoryStore::new();
        let actor = new_id();
        let mut svc = service(new_id(), "API");
        store
            .insert_service(&svc, &StatusHistoryEntry::for_service(&svc, actor))
            .await
            .unwrap();

        // Same updated_at as creation.
        svc.status = ServiceStatus::PartialOutage;
        let entry = StatusHistoryEntry::for_service(&svc, actor);
        store.update_service(&svc, Some(&entry)).await.unwrap();

        let history = store.list_status_history(svc.id).await.unwrap();
        assert_eq!(history[0].status, ServiceStatus::PartialOutage);
    }

    #[tokio::test]
    async fn history_is_kept_per_service() {
        let store = MemoryStore::new();
        let actor = new_id();
        let org_id = new_id();
        let mut api = service(org_id, "API");
        let web = service(org_id, "Website");
        for svc in [&api, &web] {
            store
                .insert_service(svc, &StatusHistoryEntry::for_service(svc, actor))
                .await
                .unwrap();
        }

        api.status = ServiceStatus::DegradedPerformance;
        api.updated_at = api.updated_at + Duration::seconds(1);
        let entry = StatusHistoryEntry::for_service(&api, actor);
        store.update_service(&api, Some(&entry)).await.unwrap();

        let api_history = store.list_status_history(api.id).await.unwrap();
        assert_eq!(api_history.len(), 2);
        assert!(api_history.iter().all(|e| e.service_id == api.id));

        let web_history = store.list_status_history(web.id).await.unwrap();
        assert_eq!(web_history.len(), 1);
        assert_eq!(web_history[0].service_id, web.id);
    }

    #[tokio::test]
    async fn services_are_partitioned_by_organization() {
        let store = MemoryStore::new();
        let (a, b) = (new_id(), new_id());
        for (org_id, name) in [(a, "Website"), (a, "API"), (b, "Analytics")] {
            let svc = service(org_id, name);
            store
                .insert_service(&svc, &StatusHistoryEntry::for_service(&svc, new_id()))
                .await
                .unwrap();
        }

        let names: Vec<String> = store
            .list_services(a)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["API", "Website"]);
        assert_eq!(store.list_services(b).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn incident_update_requires_existing_incident() {
        let store = MemoryStore::new();
        let update = IncidentUpdate {
            id: new_id(),
            incident_id: new_id(),
            message: "hello".into(),
            updated_by: new_id(),
            timestamp: Utc::now(),
        };
        assert!(!store.insert_incident_update(&update).await.unwrap());
    }
}
