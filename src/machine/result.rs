#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// The outcome of a single executed node, carrying the fully-qualified
/// node identity (`<MachineName>.<step>`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepResult {
    Success {
        node: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        payload: Option<serde_json::Value>,
    },
    Failure {
        node: String,
        message: String,
    },
}

impl StepResult {
    pub fn success(node: impl Into<String>) -> Self {
        Self::Success {
            node: node.into(),
            payload: None,
        }
    }

    pub fn success_with_payload(node: impl Into<String>, payload: serde_json::Value) -> Self {
        Self::Success {
            node: node.into(),
            payload: Some(payload),
        }
    }

    pub fn failure(node: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failure {
            node: node.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    #[must_use]
    pub fn node(&self) -> &str {
        match self {
            Self::Success { node, .. } | Self::Failure { node, .. } => node,
        }
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Failure { message, .. } => Some(message),
            Self::Success { .. } => None,
        }
    }
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { node, .. } => write!(f, "{node} succeeded"),
            Self::Failure { node, message } => write!(f, "{node} failed: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StepResult;

    #[test]
    fn accessors_match_variant_semantics() {
        let success = StepResult::success("Machine.compress");
        assert!(success.is_success());
        assert!(!success.is_failure());
        assert_eq!(success.node(), "Machine.compress");
        assert!(success.message().is_none());

        let failure = StepResult::failure("Machine.compress", "boom");
        assert!(failure.is_failure());
        assert_eq!(failure.node(), "Machine.compress");
        assert_eq!(failure.message(), Some("boom"));
    }

    #[test]
    fn display_reports_node_and_message() {
        let failure = StepResult::failure("Machine.encrypt", "gpg exited 2");
        assert_eq!(failure.to_string(), "Machine.encrypt failed: gpg exited 2");
        assert_eq!(
            StepResult::success("Machine.encrypt").to_string(),
            "Machine.encrypt succeeded"
        );
    }

    #[test]
    fn payload_survives_serialization() {
        let result = StepResult::success_with_payload("Machine.report_results", serde_json::json!([1, 2]));
        let encoded = serde_json::to_string(&result).unwrap();
        let decoded: StepResult = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, result);
    }
}
