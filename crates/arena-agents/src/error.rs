use arena_models::PmRole;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Claude CLI error: {0}")]
    Cli(String),

    #[error("Oracle timed out after {0} seconds")]
    Timeout(u64),

    #[error("Oracle response parse error: {0}")]
    Parse(String),

    #[error("{schema} failed validation: {reason}")]
    Schema { schema: &'static str, reason: String },

    #[error("Expected a {expected} analysis, got {actual}")]
    RoleMismatch { expected: PmRole, actual: PmRole },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input document is empty")]
    EmptyInput,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AgentError {
    /// True when the reasoning service itself could not be reached or run,
    /// as opposed to answering with something unusable.
    pub fn is_service_failure(&self) -> bool {
        matches!(self, AgentError::Cli(_) | AgentError::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failures_are_service_failures() {
        assert!(AgentError::Cli("spawn failed".to_string()).is_service_failure());
        assert!(AgentError::Timeout(45).is_service_failure());
    }

    #[test]
    fn content_failures_are_not_service_failures() {
        assert!(!AgentError::Parse("no JSON".to_string()).is_service_failure());
        assert!(!AgentError::Schema {
            schema: "PMAnalysis",
            reason: "confidence_score 0 outside 1..=100".to_string(),
        }
        .is_service_failure());
        assert!(!AgentError::RoleMismatch {
            expected: PmRole::LongPm,
            actual: PmRole::ShortPm,
        }
        .is_service_failure());
    }

    #[test]
    fn role_mismatch_message_names_both_roles() {
        let err = AgentError::RoleMismatch {
            expected: PmRole::LongPm,
            actual: PmRole::ShortPm,
        };
        assert_eq!(err.to_string(), "Expected a Long PM analysis, got Short PM");
    }
}
