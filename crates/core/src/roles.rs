//! Well-known role names and the role sets operations declare.
//!
//! Role strings must match the `role` claim carried by access tokens.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_MEMBER: &str = "member";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER, ROLE_MEMBER];

/// Role of a principal within its own organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Member,
}

impl Role {
    /// Return the wire string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::Manager => ROLE_MANAGER,
            Self::Member => ROLE_MEMBER,
        }
    }

    /// Parse from a string, returning an error for unknown roles.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            ROLE_ADMIN => Ok(Self::Admin),
            ROLE_MANAGER => Ok(Self::Manager),
            ROLE_MEMBER => Ok(Self::Member),
            other => Err(CoreError::Validation(format!(
                "Unknown role: '{other}'. Valid roles: {}",
                VALID_ROLES.join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roles allowed to mutate services, incidents, and maintenances.
pub const MANAGE_ROLES: &[Role] = &[Role::Admin, Role::Manager];

/// Roles allowed to read tenant data through the authenticated surface.
pub const READ_ROLES: &[Role] = &[Role::Admin, Role::Manager, Role::Member];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_role() {
        for name in VALID_ROLES {
            assert_eq!(Role::parse(name).unwrap().as_str(), *name);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(matches!(Role::parse("owner"), Err(CoreError::Validation(_))));
    }

    #[test]
    fn members_cannot_manage() {
        assert!(!MANAGE_ROLES.contains(&Role::Member));
        assert!(READ_ROLES.contains(&Role::Member));
    }
}
