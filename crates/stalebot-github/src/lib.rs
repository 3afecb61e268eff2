//! Stalebot GitHub Layer
//!
//! Implementations of the `IssueTracker` trait from `stalebot-domain`.
//!
//! # Trackers
//!
//! - `GitHubClient`: GitHub REST API client for one repository
//! - `MockTracker`: in-memory tracker for deterministic testing
//!
//! # Examples
//!
//! ```
//! use stalebot_domain::{IssueTracker, Item, ResourceType};
//! use stalebot_github::MockTracker;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let tracker = MockTracker::new("octo-org/octo-repo");
//! tracker.insert(ResourceType::Issues, Item::open(1, ["bug"]));
//!
//! tracker.create_comment(1, "ping").await.unwrap();
//! assert_eq!(tracker.comments().len(), 1);
//! # }
//! ```

#![warn(missing_docs)]

mod checks;
pub mod client;
pub mod mock;
pub mod wire;

use stalebot_domain::TrackerFailure;
use thiserror::Error;

pub use client::{GitHubClient, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
pub use mock::{FailurePoint, MockError, MockTracker, TrackerCall};

/// Errors that can occur while talking to GitHub
#[derive(Error, Debug)]
pub enum GitHubError {
    /// Network or protocol failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error status
    #[error("GitHub API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the response body
        message: String,
    },

    /// The target resource does not exist (404 or 410)
    #[error("Not found: {0}")]
    NotFound(String),

    /// API base URL cannot be used
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Token cannot be sent as a header
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl TrackerFailure for GitHubError {
    fn is_not_found(&self) -> bool {
        matches!(self, GitHubError::NotFound(_))
    }
}
