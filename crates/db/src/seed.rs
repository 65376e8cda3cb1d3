//! Demo tenants for local development.
//!
//! Writes straight through a [`RecordStore`]; no change events are emitted.
//! Tenants whose slug already exists are left untouched, so seeding a
//! persistent database on every start is harmless.

use chrono::Utc;
use statuspage_core::models::{Organization, Service, StatusHistoryEntry};
use statuspage_core::service_status::ServiceStatus;
use statuspage_core::store::{RecordStore, StoreError};
use statuspage_core::types::{new_id, DbId};

struct DemoTenant {
    slug: &'static str,
    name: &'static str,
    services: &'static [(&'static str, ServiceStatus)],
}

const DEMO_TENANTS: &[DemoTenant] = &[
    DemoTenant {
        slug: "acme",
        name: "Acme Corporation",
        services: &[
            ("Website", ServiceStatus::Operational),
            ("API", ServiceStatus::Operational),
            ("Database", ServiceStatus::DegradedPerformance),
        ],
    },
    DemoTenant {
        slug: "techstart",
        name: "TechStart Inc",
        services: &[
            ("Mobile App", ServiceStatus::Operational),
            ("Payment API", ServiceStatus::Operational),
            ("Analytics", ServiceStatus::Operational),
        ],
    },
];

/// What [`seed_demo_data`] created.
#[derive(Debug, Clone, Default)]
pub struct SeedSummary {
    /// `(slug, id)` of every tenant created by this run.
    pub organizations: Vec<(String, DbId)>,
    pub services_created: usize,
}

impl SeedSummary {
    pub fn organization_id(&self, slug: &str) -> Option<DbId> {
        self.organizations
            .iter()
            .find(|(s, _)| s == slug)
            .map(|(_, id)| *id)
    }
}

/// Provision the "acme" and "techstart" demo tenants.
///
/// History entries for seeded services are attributed to a fresh system
/// actor id.
pub async fn seed_demo_data(store: &dyn RecordStore) -> Result<SeedSummary, StoreError> {
    let system_actor = new_id();
    let mut summary = SeedSummary::default();

    for tenant in DEMO_TENANTS {
        if store.find_organization_by_slug(tenant.slug).await?.is_some() {
            tracing::debug!(slug = tenant.slug, "Demo tenant already present, skipping");
            continue;
        }

        let now = Utc::now();
        let organization = Organization {
            id: new_id(),
            slug: tenant.slug.to_string(),
            name: tenant.name.to_string(),
            created_at: now,
        };
        store.insert_organization(&organization).await?;

        for (name, status) in tenant.services {
            let service = Service {
                id: new_id(),
                organization_id: organization.id,
                name: (*name).to_string(),
                status: *status,
                created_at: now,
                updated_at: now,
            };
            let initial = StatusHistoryEntry::for_service(&service, system_actor);
            store.insert_service(&service, &initial).await?;
            summary.services_created += 1;
        }

        tracing::info!(slug = tenant.slug, org_id = %organization.id, "Seeded demo tenant");
        summary
            .organizations
            .push((organization.slug, organization.id));
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use statuspage_core::service_status::overall_status;

    use super::*;
    use crate::MemoryStore;

    #[tokio::test]
    async fn seeds_both_tenants_with_history() {
        let store = MemoryStore::new();
        let summary = seed_demo_data(&store).await.unwrap();

        assert_eq!(summary.organizations.len(), 2);
        assert_eq!(summary.services_created, 6);

        let acme = summary.organization_id("acme").unwrap();
        let services = store.list_services(acme).await.unwrap();
        assert_eq!(
            overall_status(services.iter().map(|s| s.status)),
            ServiceStatus::DegradedPerformance
        );
        for service in &services {
            let history = store.list_status_history(service.id).await.unwrap();
            assert_eq!(history.len(), 1);
            assert_eq!(history[0].status, service.status);
        }
    }

    #[tokio::test]
    async fn reseeding_is_a_no_op() {
        let store = MemoryStore::new();
        seed_demo_data(&store).await.unwrap();

        let again = seed_demo_data(&store).await.unwrap();

        assert!(again.organizations.is_empty());
        assert_eq!(store.list_organizations().await.unwrap().len(), 2);
    }
}
