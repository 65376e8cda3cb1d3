use statuspage_core::error::CoreError;

pub const RESOLVED_UPDATES_ALLOW: &str = "allow";
pub const RESOLVED_UPDATES_REJECT: &str = "reject";

/// Whether timeline updates may be appended to a resolved incident.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolvedUpdatePolicy {
    /// Accept them as post-mortem commentary.
    #[default]
    Allow,
    /// Fail with [`CoreError::Conflict`].
    Reject,
}

impl ResolvedUpdatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => RESOLVED_UPDATES_ALLOW,
            Self::Reject => RESOLVED_UPDATES_REJECT,
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s.trim().to_ascii_lowercase().as_str() {
            RESOLVED_UPDATES_ALLOW => Ok(Self::Allow),
            RESOLVED_UPDATES_REJECT => Ok(Self::Reject),
            other => Err(CoreError::Validation(format!(
                "Unknown resolved-incident update policy: '{other}'. \
                 Expected '{RESOLVED_UPDATES_ALLOW}' or '{RESOLVED_UPDATES_REJECT}'"
            ))),
        }
    }
}

/// Engine-level behaviour switches.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub resolved_updates: ResolvedUpdatePolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!(ResolvedUpdatePolicy::parse("Reject").unwrap(), ResolvedUpdatePolicy::Reject);
        assert_eq!(ResolvedUpdatePolicy::parse(" allow ").unwrap(), ResolvedUpdatePolicy::Allow);
        assert!(ResolvedUpdatePolicy::parse("maybe").is_err());
    }

    #[test]
    fn default_allows_post_resolution_updates() {
        assert_eq!(EngineConfig::default().resolved_updates, ResolvedUpdatePolicy::Allow);
    }
}
