//! rollout-core
//!
//! Lifecycle tracking for a single rollout of a task definition.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, deployment, state, failure, errors, events）
//! - **ports**: 抽象化レイヤー（Clock, IdGenerator, EventSink）
//! - **impls**: ports の実装（TracingEventSink, InMemoryEventSink）
//! - **app**: アプリケーション層（DeploymentTracker, DeploymentSummary）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{DeploymentSummary, DeploymentTracker};
pub use domain::{
    Deployment, DeploymentError, DeploymentEvent, DeploymentHealth, DeploymentId,
    DeploymentStatus, ErrorKind, FailureRecord, IdempotencyToken, InstanceFailure,
};
