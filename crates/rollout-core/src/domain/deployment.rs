//! Deployment record: one rollout of a task definition.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DeploymentError;
use super::failure::{FailureRecord, InstanceFailure};
use super::ids::{DeploymentId, IdempotencyToken};
use super::state::{DeploymentHealth, DeploymentStatus};
use crate::ports::{Clock, IdGenerator};

/// A single rollout attempt.
///
/// Design:
/// - State transitions via methods (not direct field access).
/// - `health` and `failed_instances` are replaced wholesale by every
///   transition, never merged with what was there before.
/// - No internal synchronization. Callers serialize operations on one
///   deployment.
/// - Deserialization re-checks the invariants above before building the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "RawDeployment<F>",
    bound(deserialize = "F: Deserialize<'de>")
)]
pub struct Deployment<F = InstanceFailure> {
    id: DeploymentId,
    token: IdempotencyToken,
    task_definition: String,

    /// Zero until the first in-progress transition.
    desired_task_count: u64,

    status: DeploymentStatus,
    health: DeploymentHealth,

    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,

    failed_instances: Vec<F>,
}

/// Wire shape of a [`Deployment`] before its invariants are checked.
#[derive(Deserialize)]
struct RawDeployment<F> {
    id: DeploymentId,
    token: IdempotencyToken,
    task_definition: String,
    desired_task_count: u64,
    status: DeploymentStatus,
    health: DeploymentHealth,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    failed_instances: Vec<F>,
}

impl<F> TryFrom<RawDeployment<F>> for Deployment<F> {
    type Error = DeploymentError;

    fn try_from(raw: RawDeployment<F>) -> Result<Self, Self::Error> {
        if raw.task_definition.is_empty() {
            return Err(DeploymentError::EmptyTaskDefinition);
        }
        if raw.end_time.is_some() != raw.status.is_terminal() {
            return Err(DeploymentError::InconsistentRecord(
                "end_time must be set exactly when completed",
            ));
        }
        if raw.health != DeploymentHealth::from_failures(&raw.failed_instances) {
            return Err(DeploymentError::InconsistentRecord(
                "health does not match failed_instances",
            ));
        }
        if raw.status == DeploymentStatus::Pending
            && (raw.desired_task_count != 0 || !raw.failed_instances.is_empty())
        {
            return Err(DeploymentError::InconsistentRecord(
                "pending deployment cannot carry rollout progress",
            ));
        }

        Ok(Self {
            id: raw.id,
            token: raw.token,
            task_definition: raw.task_definition,
            desired_task_count: raw.desired_task_count,
            status: raw.status,
            health: raw.health,
            start_time: raw.start_time,
            end_time: raw.end_time,
            failed_instances: raw.failed_instances,
        })
    }
}

impl<F: FailureRecord> Deployment<F> {
    /// Create a Pending, Healthy deployment.
    ///
    /// Fails with [`DeploymentError::EmptyTaskDefinition`] when
    /// `task_definition` is empty. The token is not checked for uniqueness.
    pub fn new(
        task_definition: impl Into<String>,
        token: impl Into<IdempotencyToken>,
        ids: &impl IdGenerator,
        clock: &impl Clock,
    ) -> Result<Self, DeploymentError> {
        let task_definition = task_definition.into();
        if task_definition.is_empty() {
            return Err(DeploymentError::EmptyTaskDefinition);
        }

        let token = token.into();
        let id = ids.generate_deployment_id(&token);
        let deployment = Self {
            id,
            token,
            task_definition,
            desired_task_count: 0,
            status: DeploymentStatus::Pending,
            health: DeploymentHealth::Healthy,
            start_time: clock.now(),
            end_time: None,
            failed_instances: Vec::new(),
        };

        tracing::debug!(
            deployment_id = %deployment.id,
            task_definition = %deployment.task_definition,
            "deployment created"
        );
        Ok(deployment)
    }

    /// Mark the rollout as actively in progress.
    ///
    /// May be called repeatedly until completion; each call overwrites the
    /// desired count, the failure list and the health. A Completed deployment
    /// is rejected and left untouched.
    pub fn update_to_in_progress(
        &mut self,
        desired_task_count: u64,
        failures: Vec<F>,
    ) -> Result<(), DeploymentError> {
        self.check_transition(DeploymentStatus::InProgress)?;

        self.status = DeploymentStatus::InProgress;
        self.desired_task_count = desired_task_count;
        self.record_failures(failures);

        tracing::debug!(
            deployment_id = %self.id,
            desired_task_count,
            health = %self.health,
            failed_instances = self.failed_instances.len(),
            "deployment in progress"
        );
        Ok(())
    }

    /// Record the end of the rollout and return the recorded end time.
    ///
    /// An empty `failures` clears whatever the in-progress transition
    /// recorded. Completing twice is rejected so `end_time` is set exactly
    /// once.
    pub fn update_to_completed(
        &mut self,
        failures: Vec<F>,
        clock: &impl Clock,
    ) -> Result<DateTime<Utc>, DeploymentError> {
        self.check_transition(DeploymentStatus::Completed)?;

        let end_time = clock.now();
        self.status = DeploymentStatus::Completed;
        self.end_time = Some(end_time);
        self.record_failures(failures);

        tracing::debug!(
            deployment_id = %self.id,
            health = %self.health,
            failed_instances = self.failed_instances.len(),
            "deployment completed"
        );
        Ok(end_time)
    }

    /// References of the currently recorded failures, in order.
    pub fn failed_references(&self) -> impl Iterator<Item = &str> {
        self.failed_instances.iter().map(FailureRecord::reference)
    }

    fn check_transition(&self, next: DeploymentStatus) -> Result<(), DeploymentError> {
        if self.status.can_transition_to(next) {
            return Ok(());
        }
        tracing::warn!(
            deployment_id = %self.id,
            from = %self.status,
            to = %next,
            "rejected deployment transition"
        );
        Err(DeploymentError::InvalidTransition {
            id: self.id,
            from: self.status,
            to: next,
        })
    }

    fn record_failures(&mut self, failures: Vec<F>) {
        self.health = DeploymentHealth::from_failures(&failures);
        self.failed_instances = failures;
    }
}

impl<F> Deployment<F> {
    pub fn id(&self) -> DeploymentId {
        self.id
    }

    pub fn token(&self) -> &IdempotencyToken {
        &self.token
    }

    pub fn task_definition(&self) -> &str {
        &self.task_definition
    }

    pub fn desired_task_count(&self) -> u64 {
        self.desired_task_count
    }

    pub fn status(&self) -> DeploymentStatus {
        self.status
    }

    pub fn health(&self) -> DeploymentHealth {
        self.health
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn failed_instances(&self) -> &[F] {
        &self.failed_instances
    }

    pub fn failed_instance_count(&self) -> usize {
        self.failed_instances.len()
    }

    pub fn is_healthy(&self) -> bool {
        self.health == DeploymentHealth::Healthy
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_terminal()
    }

    /// Wall time between start and completion. `None` until Completed.
    pub fn duration(&self) -> Option<Duration> {
        self.end_time.map(|end| end - self.start_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedClock, UlidGenerator};
    use chrono::TimeZone;
    use proptest::prelude::*;
    use rstest::{fixture, rstest};

    const TASK_DEFINITION: &str =
        "arn:aws:ecs:us-east-1:12345678912:task-definition/svc:7";
    const INSTANCE_ARN: &str =
        "arn:aws:us-east-1:123456789123:container-instance/4b6d45ea-a4b4-4269-9d04-3af6ddfdc597";
    const DESIRED_TASK_COUNT: u64 = 5;

    /// Clock, generator and a fresh deployment under test.
    struct Harness {
        clock: FixedClock,
        ids: UlidGenerator<crate::ports::SystemClock>,
        deployment: Deployment,
        failures: Vec<InstanceFailure>,
    }

    impl Harness {
        fn create(&self, task_definition: &str, token: &str) -> Result<Deployment, DeploymentError> {
            Deployment::new(task_definition, token, &self.ids, &self.clock)
        }
    }

    fn start_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[fixture]
    fn harness() -> Harness {
        let clock = FixedClock::new(start_time());
        let ids = UlidGenerator::new(crate::ports::SystemClock);
        let deployment = Deployment::new(TASK_DEFINITION, "token", &ids, &clock).unwrap();
        Harness {
            clock,
            ids,
            deployment,
            failures: vec![InstanceFailure::new(INSTANCE_ARN)],
        }
    }

    #[rstest]
    fn new_deployment_with_empty_task_definition_fails(harness: Harness) {
        let err = harness.create("", "token").unwrap_err();
        assert_eq!(err, DeploymentError::EmptyTaskDefinition);
        assert!(err.is_validation());
    }

    #[rstest]
    fn new_deployment_starts_pending_and_healthy(harness: Harness) {
        let d = harness.create(TASK_DEFINITION, "another-token").unwrap();

        assert!(!d.id().to_string().is_empty());
        assert_ne!(d.id(), harness.deployment.id());
        assert_eq!(d.status(), DeploymentStatus::Pending);
        assert_eq!(d.health(), DeploymentHealth::Healthy);
        assert_eq!(d.start_time(), start_time());
        assert_eq!(d.end_time(), None);
        assert_eq!(d.desired_task_count(), 0);
        assert!(d.failed_instances().is_empty());
        assert_eq!(d.task_definition(), TASK_DEFINITION);
        assert_eq!(d.token().as_str(), "another-token");
    }

    #[rstest]
    fn in_progress_on_completed_deployment_fails_without_changes(mut harness: Harness) {
        harness
            .deployment
            .update_to_completed(harness.failures.clone(), &harness.clock)
            .unwrap();
        let before = harness.deployment.clone();

        let err = harness
            .deployment
            .update_to_in_progress(DESIRED_TASK_COUNT, Vec::new())
            .unwrap_err();

        assert!(err.is_state());
        assert_eq!(
            err,
            DeploymentError::InvalidTransition {
                id: before.id(),
                from: DeploymentStatus::Completed,
                to: DeploymentStatus::InProgress,
            }
        );
        assert_eq!(harness.deployment, before);
    }

    #[rstest]
    fn in_progress_with_failures_is_unhealthy(mut harness: Harness) {
        harness
            .deployment
            .update_to_in_progress(DESIRED_TASK_COUNT, harness.failures.clone())
            .unwrap();

        let d = &harness.deployment;
        assert_eq!(d.status(), DeploymentStatus::InProgress);
        assert_eq!(d.health(), DeploymentHealth::Unhealthy);
        assert_eq!(d.desired_task_count(), DESIRED_TASK_COUNT);
        assert_eq!(d.start_time(), start_time());
        assert_eq!(d.end_time(), None);
        assert_eq!(d.task_definition(), TASK_DEFINITION);
        assert_eq!(d.failed_instances(), harness.failures.as_slice());
        assert_eq!(d.failed_references().collect::<Vec<_>>(), vec![INSTANCE_ARN]);
    }

    #[rstest]
    fn in_progress_without_failures_is_healthy(mut harness: Harness) {
        harness
            .deployment
            .update_to_in_progress(DESIRED_TASK_COUNT, Vec::new())
            .unwrap();

        let d = &harness.deployment;
        assert_eq!(d.status(), DeploymentStatus::InProgress);
        assert_eq!(d.health(), DeploymentHealth::Healthy);
        assert_eq!(d.desired_task_count(), DESIRED_TASK_COUNT);
        assert_eq!(d.end_time(), None);
        assert!(d.failed_instances().is_empty());
    }

    #[rstest]
    fn repeated_in_progress_overwrites_previous_inputs(mut harness: Harness) {
        harness
            .deployment
            .update_to_in_progress(DESIRED_TASK_COUNT, harness.failures.clone())
            .unwrap();
        harness.deployment.update_to_in_progress(2, Vec::new()).unwrap();

        assert_eq!(harness.deployment.desired_task_count(), 2);
        assert!(harness.deployment.is_healthy());
        assert!(harness.deployment.failed_instances().is_empty());
    }

    #[rstest]
    fn completed_with_failures_is_unhealthy(mut harness: Harness) {
        harness
            .deployment
            .update_to_in_progress(DESIRED_TASK_COUNT, harness.failures.clone())
            .unwrap();
        harness.clock.advance(Duration::minutes(3));

        harness
            .deployment
            .update_to_completed(harness.failures.clone(), &harness.clock)
            .unwrap();

        let d = &harness.deployment;
        assert_eq!(d.status(), DeploymentStatus::Completed);
        assert_eq!(d.health(), DeploymentHealth::Unhealthy);
        assert_eq!(d.desired_task_count(), DESIRED_TASK_COUNT);
        assert_eq!(d.start_time(), start_time());
        assert_eq!(d.end_time(), Some(start_time() + Duration::minutes(3)));
        assert_eq!(d.duration(), Some(Duration::minutes(3)));
        assert_eq!(d.task_definition(), TASK_DEFINITION);
        assert_eq!(d.failed_instances(), harness.failures.as_slice());
    }

    #[rstest]
    fn completed_without_failures_clears_unhealthy(mut harness: Harness) {
        harness
            .deployment
            .update_to_in_progress(DESIRED_TASK_COUNT, harness.failures.clone())
            .unwrap();

        harness
            .deployment
            .update_to_completed(Vec::new(), &harness.clock)
            .unwrap();

        let d = &harness.deployment;
        assert_eq!(d.status(), DeploymentStatus::Completed);
        assert_eq!(d.health(), DeploymentHealth::Healthy);
        assert_eq!(d.desired_task_count(), DESIRED_TASK_COUNT);
        assert!(d.end_time().is_some());
        assert!(d.failed_instances().is_empty());
    }

    #[rstest]
    fn pending_deployment_can_complete_directly(mut harness: Harness) {
        harness
            .deployment
            .update_to_completed(Vec::new(), &harness.clock)
            .unwrap();

        assert!(harness.deployment.is_completed());
        assert_eq!(harness.deployment.desired_task_count(), 0);
    }

    #[rstest]
    fn completing_twice_is_rejected(mut harness: Harness) {
        harness
            .deployment
            .update_to_completed(Vec::new(), &harness.clock)
            .unwrap();
        let before = harness.deployment.clone();
        harness.clock.advance(Duration::seconds(10));

        let err = harness
            .deployment
            .update_to_completed(harness.failures.clone(), &harness.clock)
            .unwrap_err();

        assert!(err.is_state());
        assert_eq!(harness.deployment, before);
    }

    #[rstest]
    fn end_to_end_rollout(harness: Harness) {
        let mut d = harness.create("svc:7", "e2e").unwrap();

        d.update_to_in_progress(5, vec![InstanceFailure::new(INSTANCE_ARN)])
            .unwrap();
        assert_eq!(d.status(), DeploymentStatus::InProgress);
        assert_eq!(d.health(), DeploymentHealth::Unhealthy);
        assert_eq!(d.desired_task_count(), 5);

        d.update_to_completed(Vec::new(), &harness.clock).unwrap();
        assert_eq!(d.status(), DeploymentStatus::Completed);
        assert_eq!(d.health(), DeploymentHealth::Healthy);
        assert!(d.failed_instances().is_empty());
        assert!(d.end_time().is_some());
    }

    #[rstest]
    fn serialized_deployment_uses_wire_names(mut harness: Harness) {
        harness
            .deployment
            .update_to_in_progress(DESIRED_TASK_COUNT, harness.failures.clone())
            .unwrap();

        let json = serde_json::to_value(&harness.deployment).unwrap();
        assert_eq!(json["status"], "inprogress");
        assert_eq!(json["health"], "unhealthy");
        assert_eq!(json["desired_task_count"], DESIRED_TASK_COUNT);
        assert_eq!(json["end_time"], serde_json::Value::Null);
        assert_eq!(json["failed_instances"][0]["arn"], INSTANCE_ARN);

        let back: Deployment = serde_json::from_value(json).unwrap();
        assert_eq!(back, harness.deployment);
    }

    #[rstest]
    fn completed_deployment_survives_a_json_round_trip(mut harness: Harness) {
        harness
            .deployment
            .update_to_completed(harness.failures.clone(), &harness.clock)
            .unwrap();

        let json = serde_json::to_string(&harness.deployment).unwrap();
        let back: Deployment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, harness.deployment);
    }

    #[rstest]
    #[case::empty_task_definition("task_definition", serde_json::json!(""))]
    #[case::completed_without_end_time("status", serde_json::json!("completed"))]
    #[case::end_time_before_completion("end_time", serde_json::json!("2024-01-01T12:30:00Z"))]
    #[case::healthy_with_failures("health", serde_json::json!("healthy"))]
    #[case::pending_with_failures("status", serde_json::json!("pending"))]
    fn inconsistent_records_do_not_deserialize(
        mut harness: Harness,
        #[case] field: &str,
        #[case] value: serde_json::Value,
    ) {
        harness
            .deployment
            .update_to_in_progress(DESIRED_TASK_COUNT, harness.failures.clone())
            .unwrap();
        let mut json = serde_json::to_value(&harness.deployment).unwrap();
        json[field] = value;

        let result = serde_json::from_value::<Deployment>(json);
        assert!(result.is_err(), "{field} should have been rejected");
    }

    #[test]
    fn completed_healthy_record_with_failures_and_no_end_time_is_rejected() {
        let json = serde_json::json!({
            "id": ulid::Ulid::nil().to_string(),
            "token": "t",
            "task_definition": "",
            "desired_task_count": 0,
            "status": "completed",
            "health": "healthy",
            "start_time": "2024-01-01T12:00:00Z",
            "end_time": null,
            "failed_instances": [{ "arn": "arn:1" }],
        });

        let err = serde_json::from_value::<Deployment>(json).unwrap_err();
        assert!(err.to_string().contains("task definition cannot be empty"));
    }

    #[test]
    fn pending_record_with_desired_count_is_rejected() {
        let json = serde_json::json!({
            "id": ulid::Ulid::nil().to_string(),
            "token": "t",
            "task_definition": "svc:7",
            "desired_task_count": 3,
            "status": "pending",
            "health": "healthy",
            "start_time": "2024-01-01T12:00:00Z",
            "end_time": null,
            "failed_instances": [],
        });

        let err = serde_json::from_value::<Deployment>(json).unwrap_err();
        assert!(err.to_string().contains("pending deployment cannot carry rollout progress"));
    }

    /// Operations applied to a deployment in property tests.
    #[derive(Debug, Clone)]
    enum Op {
        InProgress(u64, Vec<String>),
        Completed(Vec<String>),
    }

    fn op() -> impl Strategy<Value = Op> {
        let arns = prop::collection::vec("[a-z0-9:/-]{1,20}", 0..4);
        prop_oneof![
            (any::<u64>(), arns.clone()).prop_map(|(n, a)| Op::InProgress(n, a)),
            arns.prop_map(Op::Completed),
        ]
    }

    fn failures(arns: &[String]) -> Vec<InstanceFailure> {
        arns.iter().map(InstanceFailure::new).collect()
    }

    proptest! {
        #[test]
        fn empty_task_definition_always_fails(token in ".*") {
            let clock = FixedClock::new(start_time());
            let ids = UlidGenerator::new(&clock);
            let result = Deployment::<InstanceFailure>::new("", token, &ids, &clock);
            prop_assert_eq!(result.unwrap_err(), DeploymentError::EmptyTaskDefinition);
        }

        #[test]
        fn non_empty_task_definition_always_succeeds(task_definition in ".+", token in ".*") {
            let clock = FixedClock::new(start_time());
            let ids = UlidGenerator::new(&clock);
            let d = Deployment::<InstanceFailure>::new(task_definition.clone(), token, &ids, &clock)
                .unwrap();
            prop_assert_eq!(d.status(), DeploymentStatus::Pending);
            prop_assert_eq!(d.health(), DeploymentHealth::Healthy);
            prop_assert_eq!(d.task_definition(), task_definition.as_str());
            prop_assert_eq!(d.end_time(), None);
        }

        #[test]
        fn health_tracks_latest_accepted_failure_list(ops in prop::collection::vec(op(), 1..8)) {
            let clock = FixedClock::new(start_time());
            let ids = UlidGenerator::new(&clock);
            let mut d = Deployment::new(TASK_DEFINITION, "prop", &ids, &clock).unwrap();

            for op in ops {
                let before = d.clone();
                let (result, arns) = match &op {
                    Op::InProgress(n, arns) => (d.update_to_in_progress(*n, failures(arns)), arns),
                    Op::Completed(arns) => {
                        (d.update_to_completed(failures(arns), &clock).map(|_| ()), arns)
                    }
                };

                if before.is_completed() {
                    prop_assert!(result.is_err());
                    prop_assert_eq!(&d, &before);
                } else {
                    let expected = failures(arns);
                    prop_assert!(result.is_ok());
                    prop_assert_eq!(d.failed_instances(), expected.as_slice());
                    prop_assert_eq!(d.is_healthy(), arns.is_empty());
                    prop_assert_eq!(d.start_time(), before.start_time());
                }
                prop_assert_eq!(d.end_time().is_some(), d.is_completed());
            }
        }
    }
}
