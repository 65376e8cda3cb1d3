//! Organization row model.

use sqlx::FromRow;
use statuspage_core::models::Organization;
use statuspage_core::types::{DbId, Timestamp};

/// A row from the `organizations` table.
#[derive(Debug, Clone, FromRow)]
pub struct OrganizationRow {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub created_at: Timestamp,
}

impl From<OrganizationRow> for Organization {
    fn from(row: OrganizationRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            name: row.name,
            created_at: row.created_at,
        }
    }
}
