//! Authenticated principals and the single authorization check.
//!
//! Credential handling lives outside this crate; callers hand in an
//! already-authenticated [`Principal`] and every engine operation calls
//! [`authorize`] exactly once with the role set it declares.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// Message returned for every authorization failure.
///
/// Deliberately identical for tenant mismatch and insufficient role so a
/// caller cannot probe which organization owns a record.
pub const FORBIDDEN_MESSAGE: &str = "Access denied";

/// An authenticated caller acting within one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: DbId,
    pub organization_id: DbId,
    pub role: Role,
}

impl Principal {
    pub fn new(id: DbId, organization_id: DbId, role: Role) -> Self {
        Self {
            id,
            organization_id,
            role,
        }
    }
}

/// Check that `principal` may act on records owned by `organization_id`
/// with one of the `required` roles.
pub fn authorize(
    principal: &Principal,
    organization_id: DbId,
    required: &[Role],
) -> Result<(), CoreError> {
    if principal.organization_id != organization_id || !required.contains(&principal.role) {
        return Err(CoreError::Forbidden(FORBIDDEN_MESSAGE.into()));
    }
    Ok(())
}
