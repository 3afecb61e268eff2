//! Item module - issues and pull requests as seen by the bot

use std::fmt;

/// Open/closed state of a tracker item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemState {
    /// Item is open
    Open,

    /// Item has been closed
    Closed,
}

impl ItemState {
    /// Get the state name as the tracker spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemState::Open => "open",
            ItemState::Closed => "closed",
        }
    }

    /// Parse a state from the tracker's spelling
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(ItemState::Open),
            "closed" => Some(ItemState::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An issue or pull request
///
/// Owned by the external tracker; the bot only reads it and mutates it
/// through an [`IssueTracker`](crate::traits::IssueTracker).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Number within the repository
    pub number: u64,

    /// Open or closed
    pub state: ItemState,

    /// Whether conversation on the item is locked
    pub locked: bool,

    /// Label names, or `None` when the source representation omitted them
    pub labels: Option<Vec<String>>,
}

impl Item {
    /// Create an open, unlocked item with the given labels
    ///
    /// # Examples
    ///
    /// ```
    /// use stalebot_domain::Item;
    ///
    /// let item = Item::open(7, ["bug"]);
    /// assert!(item.has_label("bug"));
    /// assert!(!item.is_closed());
    /// ```
    pub fn open<I, S>(number: u64, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            number,
            state: ItemState::Open,
            locked: false,
            labels: Some(labels.into_iter().map(Into::into).collect()),
        }
    }

    /// Mark the item as locked
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Mark the item as closed
    pub fn closed(mut self) -> Self {
        self.state = ItemState::Closed;
        self
    }

    /// Forget the label data, as some event payloads do
    pub fn without_labels(mut self) -> Self {
        self.labels = None;
        self
    }

    /// Whether label data is present
    pub fn has_label_data(&self) -> bool {
        self.labels.is_some()
    }

    /// Whether the item carries the named label
    ///
    /// Unknown labels count as absent.
    pub fn has_label(&self, name: &str) -> bool {
        self.labels
            .as_deref()
            .is_some_and(|labels| labels.iter().any(|label| label == name))
    }

    /// Whether the item carries any of the named labels
    pub fn has_any_label(&self, names: &[String]) -> bool {
        names.iter().any(|name| self.has_label(name))
    }

    /// Whether the item has been closed
    pub fn is_closed(&self) -> bool {
        self.state == ItemState::Closed
    }
}
