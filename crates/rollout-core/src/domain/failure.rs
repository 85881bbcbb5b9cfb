//! Failure records reported by the orchestration API.
//!
//! The deployment never looks inside a failure record: it stores the list it
//! was given and checks it for emptiness. The trait only exists so callers can
//! plug in whatever shape their status API returns.

use serde::{Deserialize, Serialize};

/// Something that identifies a failed instance.
pub trait FailureRecord {
    /// Instance or container reference (e.g. an ARN).
    fn reference(&self) -> &str;

    fn reason(&self) -> Option<&str> {
        None
    }
}

/// A failed task instance as reported by the control plane.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceFailure {
    pub arn: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl InstanceFailure {
    pub fn new(arn: impl Into<String>) -> Self {
        Self {
            arn: arn.into(),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

impl FailureRecord for InstanceFailure {
    fn reference(&self) -> &str {
        &self.arn
    }

    fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_is_optional() {
        let failure = InstanceFailure::new("arn:aws:ecs:container-instance/1");
        assert_eq!(failure.reference(), "arn:aws:ecs:container-instance/1");
        assert_eq!(failure.reason(), None);

        let failure = failure.with_reason("RESOURCE:MEMORY");
        assert_eq!(failure.reason(), Some("RESOURCE:MEMORY"));
    }

    #[test]
    fn missing_reason_is_omitted_from_json() {
        let failure = InstanceFailure::new("arn:1");
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json, serde_json::json!({ "arn": "arn:1" }));
    }
}
