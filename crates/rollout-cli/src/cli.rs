//! Command-line arguments for `rollout`.

use clap::Parser;
use rollout_core::InstanceFailure;

/// Drive one deployment through its lifecycle and print the result.
#[derive(Debug, Parser)]
#[command(name = "rollout")]
#[command(version)]
pub struct Cli {
    /// Task definition being rolled out (e.g. `svc:7`)
    #[arg(long)]
    pub task_definition: String,

    /// Idempotency token correlated with the deployment
    #[arg(long)]
    pub token: String,

    /// Target number of running instances
    #[arg(long, default_value_t = 1)]
    pub desired_count: u64,

    /// Failed instance observed while rolling out, as `ARN[=REASON]`
    #[arg(long = "failed-instance", value_parser = parse_failure)]
    pub failed_instances: Vec<InstanceFailure>,

    /// Failed instance still reported at completion, as `ARN[=REASON]`
    #[arg(long = "completion-failed-instance", value_parser = parse_failure)]
    pub completion_failed_instances: Vec<InstanceFailure>,

    /// Complete directly from pending
    #[arg(long)]
    pub skip_in_progress: bool,

    /// Leave the deployment in progress
    #[arg(long, conflicts_with = "skip_in_progress")]
    pub no_complete: bool,

    /// Print the summary view instead of the full record
    #[arg(long)]
    pub summary: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn parse_failure(raw: &str) -> Result<InstanceFailure, String> {
    let (arn, reason) = match raw.split_once('=') {
        Some((arn, reason)) => (arn, Some(reason)),
        None => (raw, None),
    };
    if arn.is_empty() {
        return Err("instance ARN cannot be empty".to_string());
    }
    let failure = InstanceFailure::new(arn);
    Ok(match reason {
        Some(reason) if !reason.is_empty() => failure.with_reason(reason),
        _ => failure,
    })
}
