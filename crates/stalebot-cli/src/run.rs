//! Running a trigger against the engine.

use crate::error::Result;
use crate::outcome::RunOutcome;
use stalebot_config::{ConfigError, ValidationReport};
use stalebot_domain::{IssueTracker, Trigger};
use stalebot_engine::{ActivityOutcome, StaleEngine};
use stalebot_github::GitHubClient;

/// Carry out `trigger`.
///
/// Sweeps run one resource type after the other and stop at the first
/// sweep-level failure.
///
/// # Errors
///
/// Returns error if a sweep cannot search or ensure its label, or if the
/// item named by an activity event cannot be fetched.
pub async fn execute<T: IssueTracker>(
    engine: &StaleEngine<T>,
    trigger: &Trigger,
) -> Result<RunOutcome> {
    match trigger {
        Trigger::Sweep { resources } => {
            for resource in resources {
                let report = engine.mark_and_sweep(*resource).await?;
                tracing::info!("\n{}", report.summary());
            }
            tracing::info!("Done with mark and sweep!");
            Ok(RunOutcome::Success)
        }
        Trigger::Activity(event) => {
            let outcome = engine.handle_activity(event).await?;
            match outcome {
                ActivityOutcome::Unmarked(action) => {
                    tracing::info!("#{} unmarked ({:?})", event.item.number, action)
                }
                other => tracing::debug!("#{} left alone: {:?}", event.item.number, other),
            }
            Ok(if outcome.is_neutral() {
                RunOutcome::Neutral
            } else {
                RunOutcome::Success
            })
        }
    }
}

/// Publish a failed check run describing an invalid configuration.
///
/// Best effort: without a commit SHA nothing is sent, and a rejected check
/// run is only logged.
pub async fn report_invalid_config(
    client: &GitHubClient,
    head_sha: Option<&str>,
    path: &str,
    source: &str,
    error: &ConfigError,
) {
    tracing::error!("Invalid config: {}", error);
    let Some(head_sha) = head_sha else {
        tracing::warn!("No commit SHA available, not sending config annotations");
        return;
    };

    let report = ValidationReport::from_error(error, path, source);
    match client.create_check_run(head_sha, &report).await {
        Ok(()) => tracing::info!("Sent annotation for invalid config"),
        Err(e) => tracing::error!("Invalid config. Failed to add annotation: {}", e),
    }
}
