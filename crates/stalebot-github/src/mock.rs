//! In-memory issue tracker for deterministic testing
//!
//! `MockTracker` keeps items and repository labels in memory, applies
//! mutations to them, and records every call so tests can count comments,
//! label changes and closes. Failures can be injected per operation.

use async_trait::async_trait;
use stalebot_domain::{
    IssueTracker, Item, ItemState, Repository, ResourceType, SearchRequest, TrackerFailure,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors produced by [`MockTracker`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MockError {
    /// Simulated 404
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other simulated failure
    #[error("Mock failure: {0}")]
    Failed(String),
}

impl TrackerFailure for MockError {
    fn is_not_found(&self) -> bool {
        matches!(self, MockError::NotFound(_))
    }
}

/// A recorded tracker call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCall {
    /// `label_exists(name)`
    LabelExists(String),
    /// `create_label(name, color)`
    CreateLabel(String, String),
    /// `add_labels(number, labels)`
    AddLabels(u64, Vec<String>),
    /// `remove_label(number, name)`
    RemoveLabel(u64, String),
    /// `search(request)`
    Search(SearchRequest),
    /// `create_comment(number, body)`
    CreateComment(u64, String),
    /// `close(number)`
    Close(u64),
    /// `get_item(number)`
    GetItem(u64),
}

impl TrackerCall {
    /// Whether the call changes tracker state
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            TrackerCall::CreateLabel(..)
                | TrackerCall::AddLabels(..)
                | TrackerCall::RemoveLabel(..)
                | TrackerCall::CreateComment(..)
                | TrackerCall::Close(_)
        )
    }
}

/// Where an injected failure fires
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailurePoint {
    /// Any `label_exists` call
    LabelExists,
    /// Any `create_label` call
    CreateLabel,
    /// Any `search` call
    Search,
    /// `add_labels` on this item
    AddLabels(u64),
    /// `remove_label` on this item
    RemoveLabel(u64),
    /// `create_comment` on this item
    CreateComment(u64),
    /// `close` on this item
    Close(u64),
    /// `get_item` for this item
    GetItem(u64),
}

#[derive(Debug, Default)]
struct MockState {
    items: Vec<(ResourceType, Item)>,
    labels: HashSet<String>,
    calls: Vec<TrackerCall>,
    failures: HashMap<FailurePoint, MockError>,
    recently_updated: HashSet<u64>,
}

impl MockState {
    fn item_mut(&mut self, number: u64) -> Result<&mut Item, MockError> {
        self.touch(number);
        self.items
            .iter_mut()
            .map(|(_, item)| item)
            .find(|item| item.number == number)
            .ok_or_else(|| MockError::NotFound(format!("item #{}", number)))
    }

    fn find(&self, number: u64) -> Result<&Item, MockError> {
        self.items
            .iter()
            .map(|(_, item)| item)
            .find(|item| item.number == number)
            .ok_or_else(|| MockError::NotFound(format!("item #{}", number)))
    }

    fn touch(&mut self, number: u64) {
        self.recently_updated.insert(number);
    }

    fn check(&self, point: FailurePoint) -> Result<(), MockError> {
        match self.failures.get(&point) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// In-memory [`IssueTracker`]
///
/// Cloning shares state, so a test can keep a handle while the engine owns
/// another.
///
/// Search semantics: open items of the requested type are taken in insertion
/// order (treated as most-recently-updated first), the first `per_page` form
/// the page, and the page is then narrowed by the query's `label:"…"` and
/// `-label:"…"` qualifiers. When the query has an `updated:<` bound, items
/// mutated since the last [`MockTracker::age_all`] are left out before
/// paging. Other qualifiers are ignored.
#[derive(Debug, Clone)]
pub struct MockTracker {
    repository: Repository,
    state: Arc<Mutex<MockState>>,
}

impl MockTracker {
    /// Create an empty tracker for `owner/name`
    ///
    /// # Panics
    ///
    /// Panics if `full_name` is not `owner/name`.
    pub fn new(full_name: &str) -> Self {
        let repository = match Repository::parse(full_name) {
            Ok(repository) => repository,
            Err(e) => panic!("MockTracker repository: {}", e),
        };
        Self {
            repository,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add an item of the given type
    pub fn insert(&self, resource: ResourceType, item: Item) {
        self.state().items.push((resource, item));
    }

    /// Register a repository label
    pub fn add_repo_label(&self, name: impl Into<String>) {
        self.state().labels.insert(name.into());
    }

    /// Make every call at `point` fail with `error`
    pub fn fail(&self, point: FailurePoint, error: MockError) {
        self.state().failures.insert(point, error);
    }

    /// Current representation of an item
    pub fn item(&self, number: u64) -> Option<Item> {
        self.state()
            .items
            .iter()
            .find(|(_, item)| item.number == number)
            .map(|(_, item)| item.clone())
    }

    /// Whether the repository has the label
    pub fn has_repo_label(&self, name: &str) -> bool {
        self.state().labels.contains(name)
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<TrackerCall> {
        self.state().calls.clone()
    }

    /// Let time pass: no item counts as recently updated any more
    pub fn age_all(&self) {
        self.state().recently_updated.clear();
    }

    /// Forget recorded calls (items and labels are kept)
    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Number of recorded calls that change tracker state
    pub fn mutation_count(&self) -> usize {
        self.state().calls.iter().filter(|c| c.is_mutation()).count()
    }

    /// Search requests issued so far
    pub fn searches(&self) -> Vec<SearchRequest> {
        self.filter_calls(|call| match call {
            TrackerCall::Search(request) => Some(request.clone()),
            _ => None,
        })
    }

    /// `(number, body)` of every comment posted
    pub fn comments(&self) -> Vec<(u64, String)> {
        self.filter_calls(|call| match call {
            TrackerCall::CreateComment(number, body) => Some((*number, body.clone())),
            _ => None,
        })
    }

    /// Numbers of items that had `label` added
    pub fn labeled(&self, label: &str) -> Vec<u64> {
        self.filter_calls(|call| match call {
            TrackerCall::AddLabels(number, labels) if labels.iter().any(|l| l == label) => {
                Some(*number)
            }
            _ => None,
        })
    }

    /// Numbers of items that had `label` removal attempted
    pub fn unlabeled(&self, label: &str) -> Vec<u64> {
        self.filter_calls(|call| match call {
            TrackerCall::RemoveLabel(number, name) if name == label => Some(*number),
            _ => None,
        })
    }

    /// Numbers of items closed
    pub fn closed(&self) -> Vec<u64> {
        self.filter_calls(|call| match call {
            TrackerCall::Close(number) => Some(*number),
            _ => None,
        })
    }

    fn filter_calls<T>(&self, f: impl FnMut(&TrackerCall) -> Option<T>) -> Vec<T> {
        self.state().calls.iter().filter_map(f).collect()
    }
}

/// `(negated, name)` for each `label:"name"` qualifier in a query
fn label_qualifiers(query: &str) -> Vec<(bool, String)> {
    let mut found = Vec::new();
    let mut rest = query;
    while let Some(start) = rest.find("label:\"") {
        let negated = rest[..start].ends_with('-');
        let after = &rest[start + "label:\"".len()..];
        match after.find('"') {
            Some(end) => {
                found.push((negated, after[..end].to_string()));
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    found
}

fn resource_in_query(query: &str) -> Option<ResourceType> {
    let terms: Vec<&str> = query.split_whitespace().collect();
    ResourceType::ALL
        .into_iter()
        .find(|resource| terms.contains(&resource.search_qualifier()))
}

#[async_trait]
impl IssueTracker for MockTracker {
    type Error = MockError;

    fn repository(&self) -> &Repository {
        &self.repository
    }

    async fn label_exists(&self, name: &str) -> Result<bool, Self::Error> {
        let mut state = self.state();
        state.calls.push(TrackerCall::LabelExists(name.to_string()));
        state.check(FailurePoint::LabelExists)?;
        Ok(state.labels.contains(name))
    }

    async fn create_label(&self, name: &str, color: &str) -> Result<(), Self::Error> {
        let mut state = self.state();
        state
            .calls
            .push(TrackerCall::CreateLabel(name.to_string(), color.to_string()));
        state.check(FailurePoint::CreateLabel)?;
        state.labels.insert(name.to_string());
        Ok(())
    }

    async fn add_labels(&self, number: u64, labels: &[String]) -> Result<(), Self::Error> {
        let mut state = self.state();
        state.calls.push(TrackerCall::AddLabels(number, labels.to_vec()));
        state.check(FailurePoint::AddLabels(number))?;
        let item = state.item_mut(number)?;
        let current = item.labels.get_or_insert_with(Vec::new);
        for label in labels {
            if !current.contains(label) {
                current.push(label.clone());
            }
        }
        Ok(())
    }

    async fn remove_label(&self, number: u64, name: &str) -> Result<(), Self::Error> {
        let mut state = self.state();
        state
            .calls
            .push(TrackerCall::RemoveLabel(number, name.to_string()));
        state.check(FailurePoint::RemoveLabel(number))?;
        let item = state.item_mut(number)?;
        let current = item.labels.get_or_insert_with(Vec::new);
        match current.iter().position(|label| label == name) {
            Some(index) => {
                current.remove(index);
                Ok(())
            }
            None => Err(MockError::NotFound(format!("label '{}' on #{}", name, number))),
        }
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<Item>, Self::Error> {
        let mut state = self.state();
        state.calls.push(TrackerCall::Search(request.clone()));
        state.check(FailurePoint::Search)?;

        let resource = resource_in_query(&request.query).ok_or_else(|| {
            MockError::Failed("query should specify pull requests or issues".to_string())
        })?;
        let qualifiers = label_qualifiers(&request.query);
        let bounded = request.query.contains("updated:<");

        Ok(state
            .items
            .iter()
            .filter(|(kind, item)| *kind == resource && item.state == ItemState::Open)
            .filter(|(_, item)| !(bounded && state.recently_updated.contains(&item.number)))
            .take(request.per_page as usize)
            .map(|(_, item)| item)
            .filter(|item| {
                qualifiers
                    .iter()
                    .all(|(negated, name)| item.has_label(name) != *negated)
            })
            .cloned()
            .collect())
    }

    async fn create_comment(&self, number: u64, body: &str) -> Result<(), Self::Error> {
        let mut state = self.state();
        state
            .calls
            .push(TrackerCall::CreateComment(number, body.to_string()));
        state.check(FailurePoint::CreateComment(number))?;
        state.item_mut(number).map(|_| ())
    }

    async fn close(&self, number: u64) -> Result<(), Self::Error> {
        let mut state = self.state();
        state.calls.push(TrackerCall::Close(number));
        state.check(FailurePoint::Close(number))?;
        state.item_mut(number)?.state = ItemState::Closed;
        Ok(())
    }

    async fn get_item(&self, number: u64) -> Result<Item, Self::Error> {
        let mut state = self.state();
        state.calls.push(TrackerCall::GetItem(number));
        state.check(FailurePoint::GetItem(number))?;
        state.find(number).cloned()
    }
}
