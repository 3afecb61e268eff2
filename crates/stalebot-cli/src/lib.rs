//! Stalebot CLI library.
//!
//! Argument parsing, event payload handling and the glue between a trigger
//! and the lifecycle engine. The `stalebot` binary is a thin wrapper.

pub mod cli;
pub mod error;
pub mod event;
pub mod logging;
pub mod outcome;
pub mod run;

pub use cli::{Cli, LogFormat};
pub use error::{CliError, Result};
pub use event::{trigger, EventPayload};
pub use outcome::RunOutcome;
pub use run::{execute, report_invalid_config};
