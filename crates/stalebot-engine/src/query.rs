//! Search queries for stale and closable items
//!
//! Both queries are pure functions of the resource type, its resolved
//! settings, the repository and the current time.

use chrono::{DateTime, Utc};
use stalebot_config::{AssigneeExemption, Settings};
use stalebot_domain::{Repository, ResourceType, SearchRequest};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// `updated:<` timestamps: UTC, whole seconds, no zone suffix
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// The instant `days` days before `now`, clamped to the Unix epoch
///
/// The search API rejects dates before 1970, so any lookback reaching past
/// the epoch (or overflowing) yields the epoch itself.
///
/// # Examples
///
/// ```
/// use chrono::{DateTime, Utc};
/// use stalebot_engine::query::since;
///
/// let now = DateTime::parse_from_rfc3339("2020-01-31T12:00:00Z").unwrap().with_timezone(&Utc);
/// assert_eq!(since(30, now).to_rfc3339(), "2020-01-01T12:00:00+00:00");
/// assert_eq!(since(100_000, now).timestamp(), 0);
/// ```
pub fn since(days: u64, now: DateTime<Utc>) -> DateTime<Utc> {
    i64::try_from(days)
        .ok()
        .and_then(|days| days.checked_mul(SECONDS_PER_DAY))
        .and_then(|lookback| now.timestamp().checked_sub(lookback))
        .filter(|secs| *secs >= 0)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or_default()
}

/// Format an instant for an `updated:<` qualifier
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}

fn search(
    repository: &Repository,
    days: u64,
    now: DateTime<Utc>,
    qualifiers: &[String],
    per_page: u32,
) -> SearchRequest {
    let mut query = format!(
        "repo:{} is:open updated:<{}",
        repository,
        format_timestamp(since(days, now))
    );
    for qualifier in qualifiers {
        query.push(' ');
        query.push_str(qualifier);
    }
    tracing::debug!("Search query: {}", query);
    SearchRequest::recently_updated(query, per_page)
}

/// Items inactive for `daysUntilStale` that are not yet marked or exempt
///
/// # Examples
///
/// ```
/// use chrono::{DateTime, Utc};
/// use stalebot_config::Settings;
/// use stalebot_domain::{Repository, ResourceType};
/// use stalebot_engine::query::stale_query;
///
/// let now = DateTime::parse_from_rfc3339("2020-03-01T00:00:00Z").unwrap().with_timezone(&Utc);
/// let repo = Repository::parse("octo-org/octo-repo").unwrap();
/// let request = stale_query(ResourceType::Issues, &Settings::default(), &repo, now);
///
/// assert_eq!(
///     request.query,
///     r#"repo:octo-org/octo-repo is:open updated:<2020-01-01T00:00:00 -label:"wontfix" -label:"pinned" -label:"security" is:issue"#
/// );
/// assert_eq!(request.per_page, 30);
/// ```
pub fn stale_query(
    resource: ResourceType,
    settings: &Settings,
    repository: &Repository,
    now: DateTime<Utc>,
) -> SearchRequest {
    let mut qualifiers: Vec<String> = std::iter::once(&settings.stale_label)
        .chain(&settings.exempt_labels)
        .map(|label| format!("-label:\"{}\"", label))
        .collect();
    qualifiers.push(resource.search_qualifier().to_string());

    if settings.exempt_projects {
        qualifiers.push("no:project".to_string());
    }
    if settings.exempt_milestones {
        qualifiers.push("no:milestone".to_string());
    }
    match &settings.exempt_assignees {
        AssigneeExemption::Off => {}
        AssigneeExemption::AnyAssignee => qualifiers.push("no:assignee".to_string()),
        AssigneeExemption::Logins(logins) => qualifiers.extend(
            logins
                .iter()
                .map(|login| format!("-assignee:{}", login)),
        ),
    }

    search(
        repository,
        settings.days_until_stale,
        now,
        &qualifiers,
        settings.run_limit(),
    )
}

/// Marked items inactive for `daysUntilClose`
///
/// Returns `None` when closing is disabled for the resource type, in which
/// case no closable search is issued at all.
pub fn closable_query(
    resource: ResourceType,
    settings: &Settings,
    repository: &Repository,
    now: DateTime<Utc>,
) -> Option<SearchRequest> {
    let days = settings.days_until_close.days()?;
    let qualifiers = [
        format!("label:\"{}\"", settings.stale_label),
        resource.search_qualifier().to_string(),
    ];
    Some(search(
        repository,
        days,
        now,
        &qualifiers,
        settings.run_limit(),
    ))
}
