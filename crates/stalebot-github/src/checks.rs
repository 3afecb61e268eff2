//! Check runs for reporting configuration failures

use crate::{GitHubClient, GitHubError};
use reqwest::Method;
use serde::Serialize;
use stalebot_config::{Annotation, ValidationReport};

#[derive(Debug, Serialize)]
struct CheckRunRequest<'a> {
    name: &'a str,
    head_sha: &'a str,
    status: &'static str,
    conclusion: &'static str,
    completed_at: String,
    output: CheckRunOutput<'a>,
}

#[derive(Debug, Serialize)]
struct CheckRunOutput<'a> {
    title: &'a str,
    summary: &'a str,
    annotations: &'a [Annotation],
}

impl GitHubClient {
    /// Publish a failed check run carrying the report's annotations
    ///
    /// # Errors
    ///
    /// Returns error if the API rejects the check run (for instance when the
    /// token lacks `checks: write`).
    pub async fn create_check_run(
        &self,
        head_sha: &str,
        report: &ValidationReport,
    ) -> Result<(), GitHubError> {
        let url = self.repo_endpoint(&["check-runs"])?;
        let body = CheckRunRequest {
            name: &report.name,
            head_sha,
            status: "completed",
            conclusion: "failure",
            completed_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            output: CheckRunOutput {
                title: &report.title,
                summary: &report.summary,
                annotations: &report.annotations,
            },
        };

        self.send(self.request(Method::POST, url).json(&body), "create check run")
            .await?;
        tracing::info!(
            "Published '{}' check run with {} annotation(s)",
            report.name,
            report.annotations.len()
        );
        Ok(())
    }
}
