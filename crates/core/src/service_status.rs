//! Service status values and the overall-status reduction.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const STATUS_OPERATIONAL: &str = "operational";
pub const STATUS_DEGRADED_PERFORMANCE: &str = "degraded-performance";
pub const STATUS_PARTIAL_OUTAGE: &str = "partial-outage";
pub const STATUS_MAJOR_OUTAGE: &str = "major-outage";

/// All valid service statuses, least severe first.
pub const VALID_SERVICE_STATUSES: &[&str] = &[
    STATUS_OPERATIONAL,
    STATUS_DEGRADED_PERFORMANCE,
    STATUS_PARTIAL_OUTAGE,
    STATUS_MAJOR_OUTAGE,
];

// ---------------------------------------------------------------------------
// Enum
// ---------------------------------------------------------------------------

/// Operational state of a single service.
///
/// Variants are declared in ascending severity so the derived `Ord` is the
/// severity order used by [`overall_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceStatus {
    Operational,
    DegradedPerformance,
    PartialOutage,
    MajorOutage,
}

impl ServiceStatus {
    /// Return the wire string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Operational => STATUS_OPERATIONAL,
            Self::DegradedPerformance => STATUS_DEGRADED_PERFORMANCE,
            Self::PartialOutage => STATUS_PARTIAL_OUTAGE,
            Self::MajorOutage => STATUS_MAJOR_OUTAGE,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_OPERATIONAL => Ok(Self::Operational),
            STATUS_DEGRADED_PERFORMANCE => Ok(Self::DegradedPerformance),
            STATUS_PARTIAL_OUTAGE => Ok(Self::PartialOutage),
            STATUS_MAJOR_OUTAGE => Ok(Self::MajorOutage),
            other => Err(CoreError::Validation(format!(
                "Unknown service status: '{other}'. Valid statuses: {}",
                VALID_SERVICE_STATUSES.join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Worst status across a tenant's services.
///
/// An empty input yields [`ServiceStatus::Operational`].
pub fn overall_status<I>(statuses: I) -> ServiceStatus
where
    I: IntoIterator<Item = ServiceStatus>,
{
    statuses
        .into_iter()
        .max()
        .unwrap_or(ServiceStatus::Operational)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_every_wire_value() {
        for s in VALID_SERVICE_STATUSES {
            assert_eq!(ServiceStatus::parse(s).unwrap().as_str(), *s);
        }
    }

    #[test]
    fn parse_rejects_free_text() {
        let err = ServiceStatus::parse("kinda-broken").unwrap_err();
        assert!(matches!(err, CoreError::Validation(msg) if msg.contains("kinda-broken")));
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&ServiceStatus::DegradedPerformance).unwrap();
        assert_eq!(json, "\"degraded-performance\"");
    }

    #[test]
    fn empty_set_is_operational() {
        assert_eq!(overall_status(Vec::<ServiceStatus>::new()), ServiceStatus::Operational);
    }

    #[test]
    fn worst_status_wins() {
        let statuses = [
            ServiceStatus::Operational,
            ServiceStatus::Operational,
            ServiceStatus::DegradedPerformance,
        ];
        assert_eq!(overall_status(statuses), ServiceStatus::DegradedPerformance);

        let statuses = [
            ServiceStatus::PartialOutage,
            ServiceStatus::MajorOutage,
            ServiceStatus::DegradedPerformance,
        ];
        assert_eq!(overall_status(statuses), ServiceStatus::MajorOutage);
    }

    #[test]
    fn severity_order_is_fixed() {
        assert!(ServiceStatus::MajorOutage > ServiceStatus::PartialOutage);
        assert!(ServiceStatus::PartialOutage > ServiceStatus::DegradedPerformance);
        assert!(ServiceStatus::DegradedPerformance > ServiceStatus::Operational);
    }
}
