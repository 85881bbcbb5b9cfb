//! DeploymentTracker - ports を束ねてデプロイメントを遷移させる
//!
//! エンティティの操作に委譲し、成功したときだけイベントを EventSink に流します。
//! 同一デプロイメントへの操作の直列化は呼び出し側の責任です（ここではロックしません）。

use crate::domain::{
    Deployment, DeploymentError, DeploymentEvent, FailureRecord, IdempotencyToken,
};
use crate::impls::TracingEventSink;
use crate::ports::{Clock, EventSink, IdGenerator, SystemClock, UlidGenerator};

/// DeploymentTracker は Clock / IdGenerator / EventSink のワイヤリング
///
/// # 使用例
/// ```ignore
/// let tracker = DeploymentTracker::system();
/// let mut d: Deployment = tracker.create("svc:7", "token")?;
/// tracker.start(&mut d, 5, failures)?;
/// tracker.complete(&mut d, Vec::new())?;
/// ```
pub struct DeploymentTracker<C, G, S> {
    clock: C,
    ids: G,
    sink: S,
}

impl DeploymentTracker<SystemClock, UlidGenerator<SystemClock>, TracingEventSink> {
    /// 本番用の組み合わせ（壁時計 + ULID + tracing）
    pub fn system() -> Self {
        Self::new(
            SystemClock,
            UlidGenerator::new(SystemClock),
            TracingEventSink,
        )
    }
}

impl<C: Clock, G: IdGenerator, S: EventSink> DeploymentTracker<C, G, S> {
    pub fn new(clock: C, ids: G, sink: S) -> Self {
        Self { clock, ids, sink }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// 新しいデプロイメントを作成（Pending / Healthy）
    pub fn create<F: FailureRecord>(
        &self,
        task_definition: impl Into<String>,
        token: impl Into<IdempotencyToken>,
    ) -> Result<Deployment<F>, DeploymentError> {
        let deployment = Deployment::new(task_definition, token, &self.ids, &self.clock)?;
        self.sink.emit(&DeploymentEvent::Created {
            id: deployment.id(),
            task_definition: deployment.task_definition().to_string(),
            at: deployment.start_time(),
        });
        Ok(deployment)
    }

    /// InProgress に遷移（Completed なら State エラー、変更なし）
    pub fn start<F: FailureRecord>(
        &self,
        deployment: &mut Deployment<F>,
        desired_task_count: u64,
        failures: Vec<F>,
    ) -> Result<(), DeploymentError> {
        deployment.update_to_in_progress(desired_task_count, failures)?;
        self.sink.emit(&DeploymentEvent::InProgress {
            id: deployment.id(),
            desired_task_count: deployment.desired_task_count(),
            health: deployment.health(),
            failed_instances: deployment.failed_instance_count(),
        });
        Ok(())
    }

    /// Completed に遷移（二度目は State エラー、変更なし）
    pub fn complete<F: FailureRecord>(
        &self,
        deployment: &mut Deployment<F>,
        failures: Vec<F>,
    ) -> Result<(), DeploymentError> {
        let at = deployment.update_to_completed(failures, &self.clock)?;
        self.sink.emit(&DeploymentEvent::Completed {
            id: deployment.id(),
            health: deployment.health(),
            failed_instances: deployment.failed_instance_count(),
            at,
        });
        Ok(())
    }
}
