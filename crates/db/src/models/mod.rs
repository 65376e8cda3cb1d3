//! Row types for the PostgreSQL tables.
//!
//! Statuses are stored as `TEXT`, so each row converts into its domain
//! record through `TryFrom`, rejecting values the domain enums do not know.

pub mod incident;
pub mod maintenance;
pub mod organization;
pub mod service;

use statuspage_core::error::CoreError;
use statuspage_core::store::StoreError;

/// Map a status parse failure on a stored row to a backend error.
pub(crate) fn corrupt_row(table: &str, err: CoreError) -> StoreError {
    StoreError::Backend(format!("Corrupt row in {table}: {err}"))
}
