//! Trait definitions for external interactions
//!
//! These traits define the boundary between the lifecycle engine and the
//! issue tracker. Infrastructure implementations live in other crates.

use crate::{Item, Repository, SearchRequest};
use async_trait::async_trait;

/// Classification every tracker error must support
///
/// The engine treats "not found" specially in two places: a missing label
/// during removal is benign, and a missing item during refetch ends the run.
pub trait TrackerFailure: std::fmt::Display {
    /// Whether the tracker reported the target as not found
    fn is_not_found(&self) -> bool;
}

/// Operations the lifecycle engine needs from an issue tracker
///
/// Implemented by the infrastructure layer (stalebot-github). All calls are
/// scoped to [`IssueTracker::repository`].
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Error type for tracker operations
    type Error: TrackerFailure + Send;

    /// Repository this tracker operates on
    fn repository(&self) -> &Repository;

    /// Whether a label with this name exists in the repository
    async fn label_exists(&self, name: &str) -> Result<bool, Self::Error>;

    /// Create a repository label
    async fn create_label(&self, name: &str, color: &str) -> Result<(), Self::Error>;

    /// Add labels to an item
    async fn add_labels(&self, number: u64, labels: &[String]) -> Result<(), Self::Error>;

    /// Remove one label from an item
    async fn remove_label(&self, number: u64, name: &str) -> Result<(), Self::Error>;

    /// Search issues and pull requests
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Item>, Self::Error>;

    /// Post a comment on an item
    async fn create_comment(&self, number: u64, body: &str) -> Result<(), Self::Error>;

    /// Close an item
    async fn close(&self, number: u64) -> Result<(), Self::Error>;

    /// Fetch the authoritative representation of an item
    async fn get_item(&self, number: u64) -> Result<Item, Self::Error>;
}
