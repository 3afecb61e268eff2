//! Command-line arguments and environment.
//!
//! Every process setting can also come from the variables the GitHub Actions
//! runner exports, so the binary runs unchanged as an action step.

use clap::{Parser, ValueEnum};
use stalebot_config::{CliOverrides, DEFAULT_CONFIG_PATH};
use stalebot_domain::ResourceType;
use stalebot_github::DEFAULT_API_URL;
use std::path::PathBuf;

/// Stalebot - Mark and close inactive issues and pull requests.
#[derive(Debug, Parser)]
#[command(name = "stalebot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Resource type to sweep (`issues` or `pulls`); both when omitted
    pub resource: Option<ResourceType>,

    /// API token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Repository as `owner/name`
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: String,

    /// Name of the event that triggered the run
    #[arg(long, env = "GITHUB_EVENT_NAME", default_value = "schedule")]
    pub event_name: String,

    /// JSON file holding the event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// Commit that configuration annotations are attached to
    #[arg(long, env = "GITHUB_SHA")]
    pub sha: Option<String>,

    /// Checkout directory the config path is relative to
    #[arg(long, env = "GITHUB_WORKSPACE", default_value = ".")]
    pub workspace: PathBuf,

    /// API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Configuration file, relative to the workspace (.yml, .toml or .json)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Override `daysUntilStale` from the configuration file
    #[arg(long)]
    pub days_until_stale: Option<u64>,

    /// Override `daysUntilClose` from the configuration file
    #[arg(long)]
    pub days_until_close: Option<u64>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line
    Json,
}

impl Cli {
    /// Location of the configuration file on disk.
    pub fn config_file(&self) -> PathBuf {
        self.workspace.join(&self.config)
    }

    /// Configuration values given on the command line.
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            days_until_stale: self.days_until_stale,
            days_until_close: self.days_until_close,
        }
    }
}
