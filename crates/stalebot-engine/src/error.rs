//! Error types for lifecycle operations

use thiserror::Error;

/// Errors that can occur while sweeping or handling activity
#[derive(Error, Debug)]
pub enum EngineError {
    /// Stale label could not be looked up or created
    #[error("Label error: {0}")]
    Label(String),

    /// Candidate search failed
    #[error("Search error: {0}")]
    Search(String),

    /// A tracker mutation on one item failed
    #[error("Failed to {operation} #{number}: {message}")]
    Action {
        /// What was being done (`comment on`, `label`, `close`, ...)
        operation: &'static str,
        /// Item number
        number: u64,
        /// Tracker error message
        message: String,
    },

    /// Item named by an activity event could not be fetched
    #[error("Issue not found")]
    ItemNotFound(u64),
}

impl EngineError {
    pub(crate) fn action(operation: &'static str, number: u64, error: impl std::fmt::Display) -> Self {
        EngineError::Action {
            operation,
            number,
            message: error.to_string(),
        }
    }
}
