//! Repository for the `organizations` table.

use sqlx::PgPool;
use statuspage_core::models::Organization;
use statuspage_core::types::DbId;

use crate::models::organization::OrganizationRow;

/// Column list for `organizations` queries.
const COLUMNS: &str = "id, slug, name, created_at";

/// Provides data access for organizations.
pub struct OrganizationRepo;

impl OrganizationRepo {
    /// Insert a new organization. Slug collisions surface as a unique
    /// violation on `uq_organizations_slug`.
    pub async fn insert(pool: &PgPool, org: &Organization) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO organizations (id, slug, name, created_at) VALUES ($1, $2, $3, $4)")
            .bind(org.id)
            .bind(&org.slug)
            .bind(&org.name)
            .bind(org.created_at)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<OrganizationRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM organizations WHERE id = $1");
        sqlx::query_as::<_, OrganizationRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<OrganizationRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM organizations WHERE slug = $1");
        sqlx::query_as::<_, OrganizationRow>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<OrganizationRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM organizations ORDER BY slug");
        sqlx::query_as::<_, OrganizationRow>(&query)
            .fetch_all(pool)
            .await
    }
}
