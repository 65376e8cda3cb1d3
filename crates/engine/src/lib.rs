//! Status and incident state engines.
//!
//! The engines are storage-agnostic: they receive an
//! `Arc<dyn RecordStore>` and a [`ChangeBus`](statuspage_events::ChangeBus)
//! at construction. Each mutation authorizes the caller, serializes on the
//! entity's lock, commits, and publishes its change event before the lock
//! is released, so subscribers see one entity's events in commit order.

pub mod config;
pub mod engine;
pub mod incidents;
pub mod locks;
pub mod maintenances;
pub mod public;
pub mod services;
pub mod tenants;

pub use config::{EngineConfig, ResolvedUpdatePolicy};
pub use engine::StatusEngine;
pub use incidents::{IncidentEngine, NewIncident};
pub use locks::EntityLocks;
pub use maintenances::NewMaintenance;
pub use public::{PublicStatusReader, PublicSummary};
pub use services::{ServiceEngine, ServicePatch};
pub use tenants::{OrgRef, TenantRegistry};
