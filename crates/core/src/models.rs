//! Storage-neutral record types.
//!
//! Every backend behind [`RecordStore`](crate::store::RecordStore) reads and
//! writes these shapes; they are also the JSON payloads carried by change
//! events, hence the camelCase field names.

use serde::{Deserialize, Serialize};

use crate::incident::IncidentStatus;
use crate::maintenance::MaintenanceStatus;
use crate::service_status::ServiceStatus;
use crate::types::{new_id, DbId, Timestamp};

// ---------------------------------------------------------------------------
// Organization
// ---------------------------------------------------------------------------

/// A tenant. `slug` is globally unique and immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Service + status history
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: DbId,
    pub organization_id: DbId,
    pub name: String,
    pub status: ServiceStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Append-only audit record of one committed service status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryEntry {
    pub id: DbId,
    pub service_id: DbId,
    pub status: ServiceStatus,
    pub updated_by: DbId,
    pub timestamp: Timestamp,
}

impl StatusHistoryEntry {
    /// Record `service`'s current status as set by `actor`.
    pub fn for_service(service: &Service, actor: DbId) -> Self {
        Self {
            id: new_id(),
            service_id: service.id,
            status: service.status,
            updated_by: actor,
            timestamp: service.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Incident + update timeline
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: DbId,
    pub organization_id: DbId,
    pub title: String,
    pub description: String,
    pub status: IncidentStatus,
    pub service_ids: Vec<DbId>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentUpdate {
    pub id: DbId,
    pub incident_id: DbId,
    pub message: String,
    pub updated_by: DbId,
    pub timestamp: Timestamp,
}

/// An incident together with its update timeline (oldest first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentWithUpdates {
    #[serde(flatten)]
    pub incident: Incident,
    pub updates: Vec<IncidentUpdate>,
}

// ---------------------------------------------------------------------------
// Maintenance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Maintenance {
    pub id: DbId,
    pub organization_id: DbId,
    pub title: String,
    pub description: String,
    pub service_ids: Vec<DbId>,
    pub status: MaintenanceStatus,
    pub scheduled_start: Timestamp,
    pub scheduled_end: Timestamp,
    pub created_by: DbId,
    pub created_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn incident_with_updates_flattens_incident_fields() {
        let incident = Incident {
            id: new_id(),
            organization_id: new_id(),
            title: "API slow".into(),
            description: String::new(),
            status: IncidentStatus::Investigating,
            service_ids: vec![],
            created_by: new_id(),
            created_at: Utc::now(),
            resolved_at: None,
        };
        let view = IncidentWithUpdates {
            incident,
            updates: vec![],
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["title"], "API slow");
        assert_eq!(json["status"], "investigating");
        assert!(json["resolvedAt"].is_null());
        assert!(json["updates"].as_array().unwrap().is_empty());
    }

    #[test]
    fn history_entry_copies_service_status() {
        let now = Utc::now();
        let service = Service {
            id: new_id(),
            organization_id: new_id(),
            name: "API".into(),
            status: ServiceStatus::PartialOutage,
            created_at: now,
            updated_at: now,
        };
        let actor = new_id();
        let entry = StatusHistoryEntry::for_service(&service, actor);
        assert_eq!(entry.service_id, service.id);
        assert_eq!(entry.status, ServiceStatus::PartialOutage);
        assert_eq!(entry.updated_by, actor);
        assert_eq!(entry.timestamp, now);
    }
}
