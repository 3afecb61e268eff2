//! Stalebot - marks and closes inactive issues and pull requests.

use clap::Parser;
use stalebot_cli::{logging, Cli, CliError, EventPayload, RunOutcome};
use stalebot_config::ConfigSource;
use stalebot_domain::Repository;
use stalebot_engine::StaleEngine;
use stalebot_github::GitHubClient;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_format);

    let outcome = match run(cli).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            RunOutcome::Failure
        }
    };
    std::process::exit(outcome.exit_code());
}

async fn run(cli: Cli) -> stalebot_cli::Result<RunOutcome> {
    tracing::info!("Received {}!", cli.event_name);

    let repository = Repository::parse(&cli.repository).map_err(CliError::InvalidInput)?;
    let client = GitHubClient::new(&cli.token, repository)?.with_api_url(&cli.api_url)?;

    tracing::info!("Retrieving config from {}", cli.config);
    let source = ConfigSource::read(cli.config_file())?;
    let config = match source.resolve(&cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            stalebot_cli::report_invalid_config(
                &client,
                cli.sha.as_deref(),
                &cli.config,
                &source.text,
                &e,
            )
            .await;
            return Err(e.into());
        }
    };

    let payload = EventPayload::read(cli.event_path.as_deref())?;
    let trigger = stalebot_cli::trigger(&cli.event_name, payload, cli.resource)?;

    let engine = StaleEngine::new(client, config);
    stalebot_cli::execute(&engine, &trigger).await
}
