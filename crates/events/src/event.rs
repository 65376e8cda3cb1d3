//! Change event envelope and visibility rules.

use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use statuspage_core::error::CoreError;
use statuspage_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// ChangeKind
// ---------------------------------------------------------------------------

pub const EVENT_SERVICE_CREATED: &str = "serviceCreated";
pub const EVENT_SERVICE_UPDATED: &str = "serviceUpdated";
pub const EVENT_SERVICE_DELETED: &str = "serviceDeleted";
pub const EVENT_STATUS_UPDATED: &str = "statusUpdated";
pub const EVENT_INCIDENT_CREATED: &str = "incidentCreated";
pub const EVENT_INCIDENT_UPDATED: &str = "incidentUpdated";
pub const EVENT_MAINTENANCE_CREATED: &str = "maintenanceCreated";
pub const EVENT_MAINTENANCE_UPDATED: &str = "maintenanceUpdated";

/// All event names carried on the wire.
pub const VALID_EVENT_KINDS: &[&str] = &[
    EVENT_SERVICE_CREATED,
    EVENT_SERVICE_UPDATED,
    EVENT_SERVICE_DELETED,
    EVENT_STATUS_UPDATED,
    EVENT_INCIDENT_CREATED,
    EVENT_INCIDENT_UPDATED,
    EVENT_MAINTENANCE_CREATED,
    EVENT_MAINTENANCE_UPDATED,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeKind {
    ServiceCreated,
    ServiceUpdated,
    ServiceDeleted,
    StatusUpdated,
    IncidentCreated,
    IncidentUpdated,
    MaintenanceCreated,
    MaintenanceUpdated,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ServiceCreated => EVENT_SERVICE_CREATED,
            Self::ServiceUpdated => EVENT_SERVICE_UPDATED,
            Self::ServiceDeleted => EVENT_SERVICE_DELETED,
            Self::StatusUpdated => EVENT_STATUS_UPDATED,
            Self::IncidentCreated => EVENT_INCIDENT_CREATED,
            Self::IncidentUpdated => EVENT_INCIDENT_UPDATED,
            Self::MaintenanceCreated => EVENT_MAINTENANCE_CREATED,
            Self::MaintenanceUpdated => EVENT_MAINTENANCE_UPDATED,
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            EVENT_SERVICE_CREATED => Ok(Self::ServiceCreated),
            EVENT_SERVICE_UPDATED => Ok(Self::ServiceUpdated),
            EVENT_SERVICE_DELETED => Ok(Self::ServiceDeleted),
            EVENT_STATUS_UPDATED => Ok(Self::StatusUpdated),
            EVENT_INCIDENT_CREATED => Ok(Self::IncidentCreated),
            EVENT_INCIDENT_UPDATED => Ok(Self::IncidentUpdated),
            EVENT_MAINTENANCE_CREATED => Ok(Self::MaintenanceCreated),
            EVENT_MAINTENANCE_UPDATED => Ok(Self::MaintenanceUpdated),
            other => Err(CoreError::Validation(format!(
                "Unknown event kind: '{other}'. Valid kinds: {}",
                VALID_EVENT_KINDS.join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ChangeEvent
// ---------------------------------------------------------------------------

/// A committed mutation, ready for fan-out.
///
/// Serializes directly as the WebSocket frame:
/// `{"event", "organizationId", "data", "timestamp"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    #[serde(rename = "event")]
    pub kind: ChangeKind,
    pub organization_id: DbId,
    #[serde(rename = "data")]
    pub payload: serde_json::Value,
    pub timestamp: Timestamp,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, organization_id: DbId, payload: serde_json::Value) -> Self {
        Self {
            kind,
            organization_id,
            payload,
            timestamp: Utc::now(),
        }
    }

    /// Build an event whose payload is the serialized `record`.
    ///
    /// Record types serialize infallibly in practice; if one ever does not,
    /// the event still goes out with a `null` payload and the failure is
    /// logged.
    pub fn from_record<T: Serialize>(kind: ChangeKind, organization_id: DbId, record: &T) -> Self {
        let payload = serde_json::to_value(record).unwrap_or_else(|e| {
            tracing::error!(kind = %kind, error = %e, "Failed to serialize event payload");
            serde_json::Value::Null
        });
        Self::new(kind, organization_id, payload)
    }
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

/// Which class of observer a subscription serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Anonymous status-page viewer.
    Public,
    /// Authenticated dashboard user of the organization.
    Internal,
}

/// Decides which event kinds reach public subscribers.
///
/// Internal subscribers always receive every kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VisibilityPolicy {
    /// Public subscribers receive the same stream as internal ones.
    #[default]
    Mirror,
    /// Public subscribers receive only the listed kinds.
    PublicKinds(HashSet<ChangeKind>),
}

impl VisibilityPolicy {
    /// Parse a comma-separated allowlist of event names
    /// (e.g. `"statusUpdated,incidentCreated"`).
    pub fn from_public_kinds(list: &str) -> Result<Self, CoreError> {
        let kinds = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ChangeKind::parse)
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(Self::PublicKinds(kinds))
    }

    pub fn admits(&self, visibility: Visibility, kind: ChangeKind) -> bool {
        match (visibility, self) {
            (Visibility::Internal, _) | (Visibility::Public, Self::Mirror) => true,
            (Visibility::Public, Self::PublicKinds(kinds)) => kinds.contains(&kind),
        }
    }
}
