//! Events - ドメインイベント
//!
//! 遷移が成功したときに 1 件ずつ発生します。拒否された遷移ではイベントは出ません。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::DeploymentId;
use super::state::DeploymentHealth;

/// DeploymentEvent はデプロイメントで発生したイベント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DeploymentEvent {
    Created {
        id: DeploymentId,
        task_definition: String,
        at: DateTime<Utc>,
    },
    InProgress {
        id: DeploymentId,
        desired_task_count: u64,
        health: DeploymentHealth,
        failed_instances: usize,
    },
    Completed {
        id: DeploymentId,
        health: DeploymentHealth,
        failed_instances: usize,
        at: DateTime<Utc>,
    },
}

impl DeploymentEvent {
    pub fn deployment_id(&self) -> DeploymentId {
        match self {
            DeploymentEvent::Created { id, .. }
            | DeploymentEvent::InProgress { id, .. }
            | DeploymentEvent::Completed { id, .. } => *id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DeploymentEvent::Created { .. } => "created",
            DeploymentEvent::InProgress { .. } => "in_progress",
            DeploymentEvent::Completed { .. } => "completed",
        }
    }
}
