//! Domain model (IDs, deployment record, state, failures, errors, events).

pub mod deployment;
pub mod errors;
pub mod events;
pub mod failure;
pub mod ids;
pub mod state;

pub use deployment::Deployment;
pub use errors::{DeploymentError, ErrorKind};
pub use events::DeploymentEvent;
pub use failure::{FailureRecord, InstanceFailure};
pub use ids::{DeploymentId, IdempotencyToken};
pub use state::{DeploymentHealth, DeploymentStatus};
