//! Event payloads and trigger selection.

use crate::error::{CliError, Result};
use serde::Deserialize;
use stalebot_domain::{ActivityEvent, Actor, ActorKind, Item, ResourceType, Trigger};
use stalebot_github::wire::{WireItem, WireLabel};
use std::path::Path;

/// Events that start a sweep.
pub const SWEEP_EVENTS: &[&str] = &["schedule", "workflow_dispatch", "repository_dispatch"];

/// Events that carry activity on a single item.
pub const ACTIVITY_EVENTS: &[&str] = &[
    "issues",
    "issue_comment",
    "pull_request",
    "pull_request_review",
    "pull_request_review_comment",
];

/// The parts of a webhook payload the bot reads.
#[derive(Debug, Default, Deserialize)]
pub struct EventPayload {
    /// Event action (`labeled`, `created`, ...)
    #[serde(default)]
    pub action: Option<String>,

    /// Issue the event concerns
    #[serde(default)]
    pub issue: Option<WireItem>,

    /// Pull request the event concerns
    #[serde(default)]
    pub pull_request: Option<WireItem>,

    /// Account that caused the event
    #[serde(default)]
    pub sender: Option<Sender>,

    /// Label added or removed
    #[serde(default)]
    pub label: Option<WireLabel>,
}

/// `sender` object of a payload.
#[derive(Debug, Deserialize)]
pub struct Sender {
    /// Account login
    #[serde(default)]
    pub login: String,

    /// `User`, `Bot` or `Organization`
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl EventPayload {
    /// Read a payload file; no file means an empty payload.
    pub fn read(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                Self::parse(&text)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse a payload from JSON text.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Decide what to do for `event_name`.
///
/// Sweeps cover `resource` when given, else the type named by the payload's
/// `action`, else both types. Activity events target the payload's issue,
/// falling back to its pull request. An issue that is a pull request (as in
/// `issue_comment` on a pull request) is treated as one.
pub fn trigger(
    event_name: &str,
    payload: EventPayload,
    resource: Option<ResourceType>,
) -> Result<Trigger> {
    if SWEEP_EVENTS.contains(&event_name) {
        let resources = match resource.or_else(|| {
            payload
                .action
                .as_deref()
                .and_then(ResourceType::parse)
        }) {
            Some(resource) => vec![resource],
            None => ResourceType::ALL.to_vec(),
        };
        return Ok(Trigger::Sweep { resources });
    }

    if !ACTIVITY_EVENTS.contains(&event_name) {
        return Err(CliError::UnsupportedEvent(event_name.to_string()));
    }

    let (resource, wire) = match (payload.issue, payload.pull_request) {
        (Some(issue), _) if issue.is_pull_request() => (ResourceType::Pulls, issue),
        (Some(issue), _) => (ResourceType::Issues, issue),
        (None, Some(pull)) => (ResourceType::Pulls, pull),
        (None, None) => {
            return Err(CliError::InvalidPayload(format!(
                "'{}' payload has neither issue nor pull_request",
                event_name
            )))
        }
    };
    let sender = payload
        .sender
        .map(|sender| Actor {
            kind: ActorKind::from_type_name(&sender.kind),
            login: sender.login,
        })
        .ok_or_else(|| CliError::InvalidPayload("payload has no sender".to_string()))?;

    Ok(Trigger::Activity(ActivityEvent {
        resource,
        item: Item::from(wire),
        sender,
        action: payload.action,
        label: payload.label.map(|label| label.name),
    }))
}
