//! Scheduled maintenance status values and schedule validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

pub const MAINTENANCE_SCHEDULED: &str = "scheduled";
pub const MAINTENANCE_IN_PROGRESS: &str = "in-progress";
pub const MAINTENANCE_COMPLETED: &str = "completed";
pub const MAINTENANCE_CANCELLED: &str = "cancelled";

/// All valid maintenance statuses.
pub const VALID_MAINTENANCE_STATUSES: &[&str] = &[
    MAINTENANCE_SCHEDULED,
    MAINTENANCE_IN_PROGRESS,
    MAINTENANCE_COMPLETED,
    MAINTENANCE_CANCELLED,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaintenanceStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl MaintenanceStatus {
    /// Return the wire string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => MAINTENANCE_SCHEDULED,
            Self::InProgress => MAINTENANCE_IN_PROGRESS,
            Self::Completed => MAINTENANCE_COMPLETED,
            Self::Cancelled => MAINTENANCE_CANCELLED,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            MAINTENANCE_SCHEDULED => Ok(Self::Scheduled),
            MAINTENANCE_IN_PROGRESS => Ok(Self::InProgress),
            MAINTENANCE_COMPLETED => Ok(Self::Completed),
            MAINTENANCE_CANCELLED => Ok(Self::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Unknown maintenance status: '{other}'. Valid statuses: {}",
                VALID_MAINTENANCE_STATUSES.join(", ")
            ))),
        }
    }

    /// Completed and cancelled windows accept no further status edits.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate that a maintenance window has a strictly positive duration.
pub fn validate_schedule(start: Timestamp, end: Timestamp) -> Result<(), CoreError> {
    if start >= end {
        return Err(CoreError::Validation(format!(
            "scheduledStart ({start}) must be before scheduledEnd ({end})"
        )));
    }
    Ok(())
}
