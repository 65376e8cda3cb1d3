//! Tenant registry: organization provisioning and lookup.
//!
//! Slugs are resolved to ids here, once, at the edge. Everything past this
//! module works with organization ids only.

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use statuspage_core::error::{CoreError, CoreResult};
use statuspage_core::models::Organization;
use statuspage_core::store::RecordStore;
use statuspage_core::types::{new_id, DbId};
use statuspage_core::validation::{require_text, validate_slug, MAX_NAME_LEN};

/// An organization identifier as it arrives from outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrgRef {
    Id(DbId),
    Slug(String),
}

impl FromStr for OrgRef {
    type Err = std::convert::Infallible;

    /// A UUID parses as an id; anything else is treated as a slug.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match uuid::Uuid::parse_str(s) {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Slug(s.to_string()),
        })
    }
}

impl From<DbId> for OrgRef {
    fn from(id: DbId) -> Self {
        Self::Id(id)
    }
}

#[derive(Clone)]
pub struct TenantRegistry {
    store: Arc<dyn RecordStore>,
}

impl TenantRegistry {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Provision a new organization. Duplicate slugs fail with `Conflict`.
    pub async fn register(&self, name: &str, slug: &str) -> CoreResult<Organization> {
        let name = require_text("name", name, MAX_NAME_LEN)?;
        validate_slug(slug)?;

        let organization = Organization {
            id: new_id(),
            slug: slug.to_string(),
            name,
            created_at: Utc::now(),
        };
        self.store.insert_organization(&organization).await?;

        tracing::info!(org_id = %organization.id, slug, "Organization registered");
        Ok(organization)
    }

    pub async fn resolve(&self, org: &OrgRef) -> CoreResult<Organization> {
        let found = match org {
            OrgRef::Id(id) => self.store.find_organization(*id).await?,
            OrgRef::Slug(slug) => self.store.find_organization_by_slug(slug).await?,
        };
        found.ok_or_else(|| match org {
            OrgRef::Id(id) => CoreError::not_found("Organization", id),
            OrgRef::Slug(slug) => CoreError::not_found("Organization", slug),
        })
    }

    pub async fn resolve_slug(&self, slug: &str) -> CoreResult<Organization> {
        self.resolve(&OrgRef::Slug(slug.to_string())).await
    }

    /// Fail with `NotFound` unless `organization_id` exists.
    pub async fn require(&self, organization_id: DbId) -> CoreResult<Organization> {
        self.resolve(&OrgRef::Id(organization_id)).await
    }

    pub async fn list(&self) -> CoreResult<Vec<Organization>> {
        Ok(self.store.list_organizations().await?)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use statuspage_db::MemoryStore;

    use super::*;

    fn registry() -> TenantRegistry {
        TenantRegistry::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn org_ref_parses_uuid_as_id() {
        let id = new_id();
        assert_eq!(id.to_string().parse::<OrgRef>().unwrap(), OrgRef::Id(id));
        assert_eq!(
            "acme".parse::<OrgRef>().unwrap(),
            OrgRef::Slug("acme".to_string())
        );
    }

    #[tokio::test]
    async fn register_then_resolve_by_slug_and_id() {
        let tenants = registry();
        let acme = tenants.register("Acme", "acme").await.unwrap();

        assert_eq!(tenants.resolve(&"acme".parse().unwrap()).await.unwrap(), acme);
        assert_eq!(tenants.resolve(&OrgRef::Id(acme.id)).await.unwrap(), acme);
    }

    #[tokio::test]
    async fn duplicate_slug_is_a_conflict() {
        let tenants = registry();
        tenants.register("Acme", "acme").await.unwrap();

        let err = tenants.register("Other Acme", "acme").await.unwrap_err();
        assert_matches!(err, CoreError::Conflict(_));
    }

    #[tokio::test]
    async fn invalid_slug_and_empty_name_are_rejected() {
        let tenants = registry();
        assert_matches!(
            tenants.register("Acme", "Acme Corp").await,
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            tenants.register("  ", "acme").await,
            Err(CoreError::Validation(_))
        );
    }

    #[tokio::test]
    async fn unknown_organization_is_not_found() {
        let tenants = registry();
        assert_matches!(
            tenants.resolve_slug("nobody").await,
            Err(CoreError::NotFound { entity: "Organization", .. })
        );
        assert_matches!(
            tenants.require(new_id()).await,
            Err(CoreError::NotFound { .. })
        );
    }
}
