//! Anonymous read surface for status pages.
//!
//! Every call resolves the slug first and then reads only that
//! organization's records.

use std::sync::Arc;

use serde::Serialize;
use statuspage_core::error::CoreResult;
use statuspage_core::models::{IncidentWithUpdates, Maintenance, Organization, Service};
use statuspage_core::service_status::{overall_status, ServiceStatus};
use statuspage_core::store::RecordStore;

use crate::incidents::list_with_updates;
use crate::tenants::TenantRegistry;

/// Header data for a public status page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSummary {
    pub organization: Organization,
    pub overall_status: ServiceStatus,
    pub services: Vec<Service>,
}

#[derive(Clone)]
pub struct PublicStatusReader {
    store: Arc<dyn RecordStore>,
    tenants: TenantRegistry,
}

impl PublicStatusReader {
    pub fn new(store: Arc<dyn RecordStore>, tenants: TenantRegistry) -> Self {
        Self { store, tenants }
    }

    pub async fn summary(&self, slug: &str) -> CoreResult<PublicSummary> {
        let organization = self.tenants.resolve_slug(slug).await?;
        let services = self.store.list_services(organization.id).await?;
        Ok(PublicSummary {
            overall_status: overall_status(services.iter().map(|s| s.status)),
            organization,
            services,
        })
    }

    pub async fn services(&self, slug: &str) -> CoreResult<Vec<Service>> {
        let organization = self.tenants.resolve_slug(slug).await?;
        Ok(self.store.list_services(organization.id).await?)
    }

    pub async fn incidents(&self, slug: &str) -> CoreResult<Vec<IncidentWithUpdates>> {
        let organization = self.tenants.resolve_slug(slug).await?;
        list_with_updates(self.store.as_ref(), organization.id).await
    }

    pub async fn maintenances(&self, slug: &str) -> CoreResult<Vec<Maintenance>> {
        let organization = self.tenants.resolve_slug(slug).await?;
        Ok(self.store.list_maintenances(organization.id).await?)
    }
}
