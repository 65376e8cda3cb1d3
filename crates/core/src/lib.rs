//! Shared domain types for the status page platform.
//!
//! This crate has no internal dependencies so that the storage backends,
//! the change bus, the engines, and the HTTP layer can all build on it.

pub mod error;
pub mod incident;
pub mod maintenance;
pub mod models;
pub mod principal;
pub mod roles;
pub mod service_status;
pub mod store;
pub mod types;
pub mod validation;
