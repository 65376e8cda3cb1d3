//! HTTP handlers, one module per resource.

pub mod incidents;
pub mod maintenances;
pub mod public;
pub mod services;
