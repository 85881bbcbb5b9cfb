//! Status - 読み取り専用のステータスビュー
//!
//! レポートや API レスポンス向けに、デプロイメントをシリアライズ可能な形に変換します。

use serde::{Deserialize, Serialize};

use crate::domain::{Deployment, DeploymentHealth, DeploymentStatus, FailureRecord};

/// Serializable summary of a Deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSummary {
    pub deployment_id: String,
    pub task_definition: String,
    pub status: DeploymentStatus,
    pub health: DeploymentHealth,
    pub desired_task_count: u64,
    pub failed_instances: Vec<String>,
    pub started_at_ms: i64,
    pub ended_at_ms: Option<i64>,
    pub duration_ms: Option<i64>,
}

impl<F: FailureRecord> From<&Deployment<F>> for DeploymentSummary {
    fn from(d: &Deployment<F>) -> Self {
        Self {
            deployment_id: d.id().to_string(),
            task_definition: d.task_definition().to_string(),
            status: d.status(),
            health: d.health(),
            desired_task_count: d.desired_task_count(),
            failed_instances: d.failed_references().map(str::to_string).collect(),
            started_at_ms: d.start_time().timestamp_millis(),
            ended_at_ms: d.end_time().map(|t| t.timestamp_millis()),
            duration_ms: d.duration().map(|d| d.num_milliseconds()),
        }
    }
}
