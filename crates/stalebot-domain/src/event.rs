//! Event module - what triggered a run

use crate::{Item, ResourceType};

/// Whether an actor is a person or an automation account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    /// A human user (or organization)
    User,

    /// An automation account (GitHub App, bot user)
    Bot,
}

impl ActorKind {
    /// Classify the platform's `sender.type` string
    pub fn from_type_name(type_name: &str) -> Self {
        if type_name.eq_ignore_ascii_case("bot") {
            ActorKind::Bot
        } else {
            ActorKind::User
        }
    }
}

/// The account that caused an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Account login
    pub login: String,

    /// Person or automation
    pub kind: ActorKind,
}

impl Actor {
    /// Whether this actor is an automation account
    pub fn is_bot(&self) -> bool {
        self.kind == ActorKind::Bot
    }
}

/// Activity on a single issue or pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEvent {
    /// Which kind of item the event concerns
    pub resource: ResourceType,

    /// The item as represented in the event payload
    pub item: Item,

    /// Who caused the event
    pub sender: Actor,

    /// Event action (e.g. `labeled`, `created`), if the event has one
    pub action: Option<String>,

    /// Label involved in a `labeled`/`unlabeled` action
    pub label: Option<String>,
}

impl ActivityEvent {
    /// Whether this event is the act of adding the named label
    pub fn adds_label(&self, name: &str) -> bool {
        self.action.as_deref() == Some("labeled") && self.label.as_deref() == Some(name)
    }
}

/// Why the bot was invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Scan and act on many items of the listed resource types
    Sweep {
        /// Resource types to sweep, in order
        resources: Vec<ResourceType>,
    },

    /// React to activity on one item
    Activity(ActivityEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(action: Option<&str>, label: Option<&str>) -> ActivityEvent {
        ActivityEvent {
            resource: ResourceType::Issues,
            item: Item::open(1, ["stale"]),
            sender: Actor {
                login: "octocat".to_string(),
                kind: ActorKind::User,
            },
            action: action.map(str::to_string),
            label: label.map(str::to_string),
        }
    }

    #[test]
    fn test_adds_label_requires_labeled_action() {
        assert!(event(Some("labeled"), Some("stale")).adds_label("stale"));
        assert!(!event(Some("labeled"), Some("bug")).adds_label("stale"));
        assert!(!event(Some("unlabeled"), Some("stale")).adds_label("stale"));
        assert!(!event(None, None).adds_label("stale"));
    }

    #[test]
    fn test_actor_kind_classification() {
        assert_eq!(ActorKind::from_type_name("Bot"), ActorKind::Bot);
        assert_eq!(ActorKind::from_type_name("User"), ActorKind::User);
        assert_eq!(ActorKind::from_type_name("Organization"), ActorKind::User);
    }
}
