//! Incident status values.
//!
//! Transitions are driven externally by dashboard users. The forward order
//! investigating → identified → monitoring → resolved is conventional, not
//! enforced; the only hard rule is that `resolved` is terminal.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const INCIDENT_INVESTIGATING: &str = "investigating";
pub const INCIDENT_IDENTIFIED: &str = "identified";
pub const INCIDENT_MONITORING: &str = "monitoring";
pub const INCIDENT_RESOLVED: &str = "resolved";

/// All valid incident statuses in their conventional order.
pub const VALID_INCIDENT_STATUSES: &[&str] = &[
    INCIDENT_INVESTIGATING,
    INCIDENT_IDENTIFIED,
    INCIDENT_MONITORING,
    INCIDENT_RESOLVED,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Investigating,
    Identified,
    Monitoring,
    Resolved,
}

impl IncidentStatus {
    /// Return the wire string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Investigating => INCIDENT_INVESTIGATING,
            Self::Identified => INCIDENT_IDENTIFIED,
            Self::Monitoring => INCIDENT_MONITORING,
            Self::Resolved => INCIDENT_RESOLVED,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            INCIDENT_INVESTIGATING => Ok(Self::Investigating),
            INCIDENT_IDENTIFIED => Ok(Self::Identified),
            INCIDENT_MONITORING => Ok(Self::Monitoring),
            INCIDENT_RESOLVED => Ok(Self::Resolved),
            other => Err(CoreError::Validation(format!(
                "Unknown incident status: '{other}'. Valid statuses: {}",
                VALID_INCIDENT_STATUSES.join(", ")
            ))),
        }
    }

    /// Whether no further status edits are accepted.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved)
    }
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
