//! Schema validation for raw configuration documents

use crate::settings::{AssigneeExemption, CloseAfter, Overrides, Settings, StaleConfig};
use crate::ConfigError;
use serde_json::{Map, Value};
use stalebot_domain::ResourceType;
use std::fmt;

/// Keys accepted both globally and inside `issues:` / `pulls:` blocks
pub const SETTING_KEYS: [&str; 12] = [
    "daysUntilStale",
    "daysUntilClose",
    "staleLabel",
    "exemptLabels",
    "exemptAssignees",
    "exemptProjects",
    "exemptMilestones",
    "markComment",
    "unmarkComment",
    "closeComment",
    "limitPerRun",
    "perform",
];

/// Why a field was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Field has the wrong type
    WrongType {
        /// Dotted path of the field (e.g. `pulls.daysUntilClose`)
        field: String,
        /// What the schema expects
        expected: &'static str,
    },

    /// Field has the right type but an unacceptable value
    InvalidValue {
        /// Dotted path of the field
        field: String,
        /// Description of the issue
        issue: String,
    },
}

impl Violation {
    fn wrong_type(field: &str, expected: &'static str) -> Self {
        Violation::WrongType {
            field: field.to_string(),
            expected,
        }
    }

    fn invalid(field: &str, issue: impl Into<String>) -> Self {
        Violation::InvalidValue {
            field: field.to_string(),
            issue: issue.into(),
        }
    }

    /// Dotted path of the offending field
    pub fn field(&self) -> &str {
        match self {
            Violation::WrongType { field, .. } | Violation::InvalidValue { field, .. } => field,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::WrongType { field, expected } => {
                write!(f, "\"{}\" must be {}", field, expected)
            }
            Violation::InvalidValue { field, issue } => write!(f, "\"{}\" {}", field, issue),
        }
    }
}

/// Validates raw configuration documents and produces typed configuration
///
/// All violations in a document are collected; a document with any violation
/// never yields a [`StaleConfig`].
#[derive(Debug, Clone, Default)]
pub struct ConfigValidator {
    defaults: Settings,
}

impl ConfigValidator {
    /// Create a validator that fills unset fields from `defaults`
    pub fn new(defaults: Settings) -> Self {
        Self { defaults }
    }

    /// Validate a document and resolve it against the defaults
    ///
    /// An empty document (`null`) is valid and yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] listing every violation found.
    pub fn validate(&self, document: &Value) -> Result<StaleConfig, ConfigError> {
        let empty = Map::new();
        let root = match document {
            Value::Null => &empty,
            Value::Object(map) => map,
            _ => {
                return Err(ConfigError::Invalid(vec![Violation::wrong_type(
                    "(root)",
                    "a mapping",
                )]))
            }
        };

        let mut violations = Vec::new();

        let global = parse_overrides(root, "", &mut violations);
        let issues = parse_block(root, ResourceType::Issues, &mut violations);
        let pulls = parse_block(root, ResourceType::Pulls, &mut violations);
        let only = parse_only(root.get("only"), &mut violations);

        warn_unknown_keys(root, "", true);

        if !violations.is_empty() {
            return Err(ConfigError::Invalid(violations));
        }

        Ok(StaleConfig {
            global: self.defaults.overridden_by(&global),
            issues,
            pulls,
            only,
        })
    }
}

fn path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn warn_unknown_keys(map: &Map<String, Value>, prefix: &str, top_level: bool) {
    for key in map.keys() {
        let known = SETTING_KEYS.contains(&key.as_str())
            || (top_level && matches!(key.as_str(), "only" | "issues" | "pulls"));
        if !known {
            tracing::warn!("Ignoring unknown configuration key '{}'", path(prefix, key));
        }
    }
}

fn parse_block(
    root: &Map<String, Value>,
    resource: ResourceType,
    violations: &mut Vec<Violation>,
) -> Overrides {
    let key = resource.as_str();
    match root.get(key) {
        None | Some(Value::Null) => Overrides::default(),
        Some(Value::Object(block)) => {
            warn_unknown_keys(block, key, false);
            parse_overrides(block, key, violations)
        }
        Some(_) => {
            violations.push(Violation::wrong_type(key, "a mapping"));
            Overrides::default()
        }
    }
}

fn parse_overrides(
    map: &Map<String, Value>,
    prefix: &str,
    violations: &mut Vec<Violation>,
) -> Overrides {
    let mut overrides = Overrides::default();

    for (key, value) in map {
        let field = path(prefix, key);
        let result = match key.as_str() {
            "daysUntilStale" => days(value, &field).map(|v| overrides.days_until_stale = Some(v)),
            "daysUntilClose" => {
                close_after(value, &field).map(|v| overrides.days_until_close = Some(v))
            }
            "staleLabel" => label(value, &field).map(|v| overrides.stale_label = Some(v)),
            "exemptLabels" => {
                string_list(value, &field).map(|v| overrides.exempt_labels = Some(v))
            }
            "exemptAssignees" => {
                assignees(value, &field).map(|v| overrides.exempt_assignees = Some(v))
            }
            "exemptProjects" => flag(value, &field).map(|v| overrides.exempt_projects = Some(v)),
            "exemptMilestones" => {
                flag(value, &field).map(|v| overrides.exempt_milestones = Some(v))
            }
            "markComment" => comment(value, &field).map(|v| overrides.mark_comment = Some(v)),
            "unmarkComment" => comment(value, &field).map(|v| overrides.unmark_comment = Some(v)),
            "closeComment" => comment(value, &field).map(|v| overrides.close_comment = Some(v)),
            "limitPerRun" => limit(value, &field).map(|v| overrides.limit_per_run = Some(v)),
            "perform" => flag(value, &field).map(|v| overrides.perform = Some(v)),
            _ => Ok(()),
        };

        if let Err(violation) = result {
            violations.push(violation);
        }
    }

    overrides
}

fn parse_only(value: Option<&Value>, violations: &mut Vec<Violation>) -> Option<ResourceType> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => match ResourceType::parse(s) {
            Some(resource) => Some(resource),
            None => {
                violations.push(Violation::invalid("only", "must be one of [issues, pulls]"));
                None
            }
        },
        Some(_) => {
            violations.push(Violation::wrong_type("only", "a string"));
            None
        }
    }
}

fn days(value: &Value, field: &str) -> Result<u64, Violation> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| Violation::invalid(field, "must be a non-negative integer")),
        _ => Err(Violation::wrong_type(field, "a number")),
    }
}

fn close_after(value: &Value, field: &str) -> Result<CloseAfter, Violation> {
    match value {
        Value::Bool(false) | Value::Null => Ok(CloseAfter::Never),
        Value::Number(_) => days(value, field).map(CloseAfter::Days),
        _ => Err(Violation::wrong_type(field, "a number or false")),
    }
}

fn limit(value: &Value, field: &str) -> Result<u32, Violation> {
    let n = days(value, field)?;
    if n == 0 {
        return Err(Violation::invalid(field, "must be larger than or equal to 1"));
    }
    Ok(u32::try_from(n).unwrap_or(u32::MAX))
}

fn flag(value: &Value, field: &str) -> Result<bool, Violation> {
    value
        .as_bool()
        .ok_or_else(|| Violation::wrong_type(field, "a boolean"))
}

fn label(value: &Value, field: &str) -> Result<String, Violation> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Ok(s.clone()),
        Value::String(_) => Err(Violation::invalid(field, "is not allowed to be empty")),
        _ => Err(Violation::wrong_type(field, "a string")),
    }
}

fn comment(value: &Value, field: &str) -> Result<Option<String>, Violation> {
    match value {
        Value::Bool(false) | Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(Violation::wrong_type(field, "a string or false")),
    }
}

/// Accepts `null`, a single string, or a list of strings
fn string_list(value: &Value, field: &str) -> Result<Vec<String>, Violation> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| Violation::wrong_type(field, "a list of strings"))
            })
            .collect(),
        _ => Err(Violation::wrong_type(field, "a list of strings")),
    }
}

fn assignees(value: &Value, field: &str) -> Result<AssigneeExemption, Violation> {
    match value {
        Value::Bool(true) => Ok(AssigneeExemption::AnyAssignee),
        Value::Bool(false) => Ok(AssigneeExemption::Off),
        _ => {
            let logins = string_list(value, field)
                .map_err(|_| Violation::wrong_type(field, "a boolean or a list of strings"))?;
            if logins.is_empty() {
                Ok(AssigneeExemption::Off)
            } else {
                Ok(AssigneeExemption::Logins(logins))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validate(document: Value) -> Result<StaleConfig, ConfigError> {
        ConfigValidator::default().validate(&document)
    }

    fn violations(document: Value) -> Vec<Violation> {
        match validate(document) {
            Err(ConfigError::Invalid(violations)) => violations,
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = validate(Value::Null).unwrap();
        assert_eq!(config.global, Settings::default());
        assert!(config.issues.is_empty());
        assert!(config.pulls.is_empty());
        assert_eq!(config.only, None);
    }

    #[test]
    fn test_full_document() {
        let config = validate(json!({
            "daysUntilStale": 30,
            "daysUntilClose": false,
            "staleLabel": "stale",
            "exemptLabels": ["keep"],
            "exemptAssignees": true,
            "exemptProjects": true,
            "exemptMilestones": true,
            "markComment": "marking",
            "unmarkComment": "unmarking",
            "closeComment": false,
            "limitPerRun": 5,
            "perform": false,
            "only": "issues",
            "pulls": { "daysUntilClose": 3, "staleLabel": "stale-pr" }
        }))
        .unwrap();

        assert_eq!(config.global.days_until_stale, 30);
        assert_eq!(config.global.days_until_close, CloseAfter::Never);
        assert_eq!(config.global.exempt_labels, vec!["keep"]);
        assert_eq!(config.global.exempt_assignees, AssigneeExemption::AnyAssignee);
        assert_eq!(config.global.unmark_comment.as_deref(), Some("unmarking"));
        assert_eq!(config.global.close_comment, None);
        assert_eq!(config.global.limit_per_run, 5);
        assert!(!config.global.perform);
        assert_eq!(config.only, Some(ResourceType::Issues));

        let pulls = config.resolve(ResourceType::Pulls);
        assert_eq!(pulls.days_until_close, CloseAfter::Days(3));
        assert_eq!(pulls.stale_label, "stale-pr");
        assert_eq!(pulls.days_until_stale, 30);
    }

    #[test]
    fn test_days_until_stale_must_be_a_number() {
        let found = violations(json!({ "daysUntilStale": "sixty" }));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].field(), "daysUntilStale");
        assert_eq!(found[0].to_string(), "\"daysUntilStale\" must be a number");
    }

    #[test]
    fn test_all_violations_are_reported() {
        let found = violations(json!({
            "daysUntilStale": -1,
            "perform": "yes",
            "only": "discussions",
            "issues": { "daysUntilClose": true }
        }));
        let fields: Vec<&str> = found.iter().map(Violation::field).collect();
        assert_eq!(found.len(), 4);
        assert!(fields.contains(&"daysUntilStale"));
        assert!(fields.contains(&"perform"));
        assert!(fields.contains(&"only"));
        assert!(fields.contains(&"issues.daysUntilClose"));
    }

    #[test]
    fn test_limit_per_run_must_be_positive() {
        let found = violations(json!({ "limitPerRun": 0 }));
        assert_eq!(found[0].field(), "limitPerRun");

        let config = validate(json!({ "limitPerRun": 100 })).unwrap();
        assert_eq!(config.global.run_limit(), 30);
    }

    #[test]
    fn test_exempt_labels_accepts_single_string() {
        let config = validate(json!({ "exemptLabels": "pinned" })).unwrap();
        assert_eq!(config.global.exempt_labels, vec!["pinned"]);

        let config = validate(json!({ "exemptLabels": null })).unwrap();
        assert!(config.global.exempt_labels.is_empty());
    }

    #[test]
    fn test_exempt_assignees_forms() {
        let config = validate(json!({ "exemptAssignees": ["octocat"] })).unwrap();
        assert_eq!(
            config.global.exempt_assignees,
            AssigneeExemption::Logins(vec!["octocat".to_string()])
        );

        let config = validate(json!({ "exemptAssignees": [] })).unwrap();
        assert_eq!(config.global.exempt_assignees, AssigneeExemption::Off);

        let found = violations(json!({ "exemptAssignees": 3 }));
        assert_eq!(found[0].field(), "exemptAssignees");
    }

    #[test]
    fn test_comment_false_disables_default() {
        let config = validate(json!({ "markComment": false })).unwrap();
        assert_eq!(config.global.mark_comment, None);
    }

    #[test]
    fn test_non_mapping_root_rejected() {
        let found = violations(json!(["daysUntilStale"]));
        assert_eq!(found[0].field(), "(root)");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let config = validate(json!({ "onlyLabels": ["x"], "pulls": { "days": 3 } })).unwrap();
        assert!(config.pulls.is_empty());
    }
}
