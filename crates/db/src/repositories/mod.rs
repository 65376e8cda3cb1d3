//! Repositories for the PostgreSQL tables (one zero-sized struct per table
//! group, all methods take the pool explicitly).

pub mod incident_repo;
pub mod maintenance_repo;
pub mod organization_repo;
pub mod service_repo;

pub use incident_repo::IncidentRepo;
pub use maintenance_repo::MaintenanceRepo;
pub use organization_repo::OrganizationRepo;
pub use service_repo::ServiceRepo;
