//! Stalebot Engine
//!
//! Finds inactive issues and pull requests, marks them stale, closes the
//! ones that stay inactive, and unmarks items that see new activity.
//!
//! # Overview
//!
//! A sweep of one resource type runs in two batches:
//! - **Mark**: search for items inactive for `daysUntilStale` that are not
//!   already marked or exempt, then label (and optionally comment on) each
//! - **Close**: search for marked items inactive for `daysUntilClose`, then
//!   close (and optionally comment on) each
//!
//! Both batches share one [`ActionBudget`] of at most 30 actions. Locked
//! items are never touched. With `perform: false` every mutation is logged
//! instead of executed, but still spends budget.
//!
//! ## Lifecycle
//!
//! | From | To | Trigger |
//! |------|----|---------|
//! | untouched | marked | sweep, inactive for `daysUntilStale` |
//! | marked | closed | sweep, inactive for `daysUntilClose` |
//! | marked | untouched | non-bot activity on the item |
//!
//! # Usage
//!
//! ```no_run
//! use stalebot_config::{CliOverrides, ConfigSource};
//! use stalebot_domain::{Repository, ResourceType};
//! use stalebot_engine::StaleEngine;
//! use stalebot_github::GitHubClient;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigSource::read(".github/stale.yml")?.resolve(&CliOverrides::default())?;
//! let client = GitHubClient::new("ghp_example", Repository::parse("octo-org/octo-repo")?)?;
//!
//! let engine = StaleEngine::new(client, config);
//! for resource in ResourceType::ALL {
//!     let report = engine.mark_and_sweep(resource).await?;
//!     println!("{}", report.summary());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod budget;
mod error;
mod lifecycle;
mod metrics;
pub mod query;

pub use budget::ActionBudget;
pub use error::EngineError;
pub use lifecycle::{Action, ActivityOutcome, StaleEngine, STALE_LABEL_COLOR};
pub use metrics::SweepReport;
