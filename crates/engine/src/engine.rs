use std::sync::Arc;

use statuspage_core::store::RecordStore;
use statuspage_events::ChangeBus;

use crate::config::EngineConfig;
use crate::incidents::IncidentEngine;
use crate::locks::EntityLocks;
use crate::public::PublicStatusReader;
use crate::services::ServiceEngine;
use crate::tenants::TenantRegistry;

/// All engines wired to one store, one bus and one lock table.
///
/// Constructed once at startup; clones share everything.
#[derive(Clone)]
pub struct StatusEngine {
    tenants: TenantRegistry,
    services: ServiceEngine,
    incidents: IncidentEngine,
    public: PublicStatusReader,
    bus: ChangeBus,
}

impl StatusEngine {
    pub fn new(store: Arc<dyn RecordStore>, bus: ChangeBus, config: EngineConfig) -> Self {
        let locks = EntityLocks::new();
        let tenants = TenantRegistry::new(Arc::clone(&store));
        Self {
            services: ServiceEngine::new(Arc::clone(&store), bus.clone(), locks.clone()),
            incidents: IncidentEngine::new(Arc::clone(&store), bus.clone(), locks, config),
            public: PublicStatusReader::new(store, tenants.clone()),
            tenants,
            bus,
        }
    }

    pub fn tenants(&self) -> &TenantRegistry {
        &self.tenants
    }

    pub fn services(&self) -> &ServiceEngine {
        &self.services
    }

    pub fn incidents(&self) -> &IncidentEngine {
        &self.incidents
    }

    pub fn public(&self) -> &PublicStatusReader {
        &self.public
    }

    pub fn bus(&self) -> &ChangeBus {
        &self.bus
    }
}
