//! Entry point for the `rollout` CLI.

mod cli;

use clap::Parser;
use cli::Cli;
use rollout_core::{Deployment, DeploymentError, DeploymentSummary, DeploymentTracker};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Deployment(#[from] DeploymentError),

    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<String, CliError> {
    let tracker = DeploymentTracker::system();
    let mut deployment: Deployment = tracker.create(cli.task_definition, cli.token)?;
    tracing::debug!(deployment_id = %deployment.id(), "created");

    if cli.skip_in_progress {
        tracing::debug!(deployment_id = %deployment.id(), "skipping in-progress step");
    } else {
        tracker.start(&mut deployment, cli.desired_count, cli.failed_instances)?;
        tracing::debug!(
            deployment_id = %deployment.id(),
            health = %deployment.health(),
            "marked in progress"
        );
    }

    if cli.no_complete {
        tracing::debug!(deployment_id = %deployment.id(), "leaving deployment in progress");
    } else {
        tracker.complete(&mut deployment, cli.completion_failed_instances)?;
        tracing::debug!(
            deployment_id = %deployment.id(),
            health = %deployment.health(),
            "marked completed"
        );
    }

    let output = if cli.summary {
        serde_json::to_string_pretty(&DeploymentSummary::from(&deployment))?
    } else {
        serde_json::to_string_pretty(&deployment)?
    };
    Ok(output)
}
