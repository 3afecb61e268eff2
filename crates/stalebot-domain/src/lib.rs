//! Stalebot Domain Layer
//!
//! Core vocabulary shared by every stalebot crate: the resource types the bot
//! manages, the items it inspects, the events that trigger it, and the trait
//! boundary to the issue tracker.
//!
//! ## Key Concepts
//!
//! - **Resource type**: issues or pull requests, never inferred after the trigger boundary
//! - **Item**: an issue or pull request, owned by the tracker
//! - **Trigger**: a sweep over many items, or activity on one item
//! - **IssueTracker**: the async interface the engine drives
//!
//! ## Architecture
//!
//! This crate holds no infrastructure. The only external dependency is
//! `async-trait`, needed to express the tracker boundary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod event;
pub mod item;
pub mod repository;
pub mod resource;
pub mod search;
pub mod traits;

// Re-exports for convenience
pub use event::{ActivityEvent, Actor, ActorKind, Trigger};
pub use item::{Item, ItemState};
pub use repository::Repository;
pub use resource::ResourceType;
pub use search::{SearchRequest, SearchSort, SortOrder};
pub use traits::{IssueTracker, TrackerFailure};
