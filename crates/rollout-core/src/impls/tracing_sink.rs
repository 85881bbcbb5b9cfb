//! TracingEventSink - イベントを tracing に流す

use crate::domain::DeploymentEvent;
use crate::ports::EventSink;

/// TracingEventSink は各イベントを `info` レベルで 1 行ログに出す
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &DeploymentEvent) {
        match event {
            DeploymentEvent::Created {
                id,
                task_definition,
                at,
            } => {
                tracing::info!(deployment_id = %id, %task_definition, %at, "deployment created");
            }
            DeploymentEvent::InProgress {
                id,
                desired_task_count,
                health,
                failed_instances,
            } => {
                tracing::info!(
                    deployment_id = %id,
                    desired_task_count,
                    %health,
                    failed_instances,
                    "deployment in progress"
                );
            }
            DeploymentEvent::Completed {
                id,
                health,
                failed_instances,
                at,
            } => {
                tracing::info!(
                    deployment_id = %id,
                    %health,
                    failed_instances,
                    %at,
                    "deployment completed"
                );
            }
        }
    }
}
