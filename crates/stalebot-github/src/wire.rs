//! GitHub REST representations and conversions to domain types

use serde::{Deserialize, Serialize};
use stalebot_domain::{Item, ItemState};

/// A label object as GitHub returns it
#[derive(Debug, Clone, Deserialize)]
pub struct WireLabel {
    /// Label name
    pub name: String,
}

/// An issue or pull request as GitHub returns it
///
/// Issues, pull requests and search results share these fields. Some event
/// payloads omit `labels`, which is kept as `None`. An issue representation of
/// a pull request carries a `pull_request` object.
#[derive(Debug, Clone, Deserialize)]
pub struct WireItem {
    /// Item number
    pub number: u64,

    /// `open` or `closed`
    pub state: String,

    /// Conversation lock
    #[serde(default)]
    pub locked: bool,

    /// Labels, when present in the representation
    #[serde(default)]
    pub labels: Option<Vec<WireLabel>>,

    /// Pull request links, present when the issue is a pull request
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl WireItem {
    /// Whether this issue representation belongs to a pull request
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.as_ref().is_some_and(|value| !value.is_null())
    }
}

impl From<WireItem> for Item {
    fn from(wire: WireItem) -> Self {
        Item {
            number: wire.number,
            // GitHub only reports open/closed; anything else is treated as open
            state: ItemState::parse(&wire.state).unwrap_or(ItemState::Open),
            locked: wire.locked,
            labels: wire
                .labels
                .map(|labels| labels.into_iter().map(|label| label.name).collect()),
        }
    }
}

/// Response body of `GET /search/issues`
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[allow(dead_code)]
    #[serde(default)]
    pub total_count: u64,
    pub items: Vec<WireItem>,
}

/// Error body returned by the GitHub API
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateLabelRequest<'a> {
    pub name: &'a str,
    pub color: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddLabelsRequest<'a> {
    pub labels: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct CommentRequest<'a> {
    pub body: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateStateRequest {
    pub state: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_conversion() {
        let wire: WireItem = serde_json::from_str(
            r#"{"number": 12, "state": "closed", "locked": true,
                "labels": [{"name": "stale", "color": "ffffff"}], "title": "x"}"#,
        )
        .unwrap();
        let item = Item::from(wire);
        assert_eq!(item.number, 12);
        assert!(item.is_closed());
        assert!(item.locked);
        assert!(item.has_label("stale"));
    }

    #[test]
    fn test_missing_labels_stay_unknown() {
        let wire: WireItem = serde_json::from_str(r#"{"number": 3, "state": "open"}"#).unwrap();
        let item = Item::from(wire);
        assert!(!item.locked);
        assert!(!item.has_label_data());
    }

    #[test]
    fn test_pull_request_marker() {
        let issue: WireItem = serde_json::from_str(r#"{"number": 3, "state": "open"}"#).unwrap();
        assert!(!issue.is_pull_request());

        let pull: WireItem = serde_json::from_str(
            r#"{"number": 9, "state": "open",
                "pull_request": {"url": "https://api.github.com/repos/o/r/pulls/9"}}"#,
        )
        .unwrap();
        assert!(pull.is_pull_request());
    }
}
