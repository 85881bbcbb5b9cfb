//! Deployment status and health.

use serde::{Deserialize, Serialize};
use std::fmt;

/// DeploymentStatus is the rollout stage.
///
/// State transitions:
/// - Pending -> InProgress -> Completed
/// - Pending -> Completed
/// - InProgress -> InProgress (re-applies the latest inputs)
///
/// Completed is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    /// Created, no rollout work observed yet.
    Pending,

    /// Actively rolling out.
    InProgress,

    /// Finished.
    Completed,
}

impl DeploymentStatus {
    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, DeploymentStatus::Completed)
    }

    pub fn can_transition_to(self, next: DeploymentStatus) -> bool {
        match (self, next) {
            (DeploymentStatus::Completed, _) => false,
            (_, DeploymentStatus::Pending) => false,
            (DeploymentStatus::Pending | DeploymentStatus::InProgress, _) => true,
        }
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeploymentStatus::Pending => "pending",
            DeploymentStatus::InProgress => "inprogress",
            DeploymentStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// DeploymentHealth is derived from the most recently recorded failure list.
///
/// It is not accumulated: every transition recomputes it from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentHealth {
    Healthy,
    Unhealthy,
}

impl DeploymentHealth {
    /// Unhealthy iff `failures` is non-empty.
    pub fn from_failures<F>(failures: &[F]) -> Self {
        if failures.is_empty() {
            DeploymentHealth::Healthy
        } else {
            DeploymentHealth::Unhealthy
        }
    }
}

impl fmt::Display for DeploymentHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentHealth::Healthy => f.write_str("healthy"),
            DeploymentHealth::Unhealthy => f.write_str("unhealthy"),
        }
    }
}
