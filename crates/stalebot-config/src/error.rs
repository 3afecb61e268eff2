//! Configuration error types

use crate::Violation;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// YAML syntax error
    #[error("Failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML syntax error
    #[error("Failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON syntax error
    #[error("Failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Document parsed but failed schema validation
    #[error("Invalid config: {}", summarize(.0))]
    Invalid(Vec<Violation>),
}

impl ConfigError {
    /// Schema violations, if this is a validation failure
    pub fn violations(&self) -> &[Violation] {
        match self {
            ConfigError::Invalid(violations) => violations,
            _ => &[],
        }
    }
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
