//! Typed stale-bot settings and per-type resolution

use stalebot_domain::ResourceType;

/// Hard cap on mutating actions per sweep
pub const MAX_ACTIONS_PER_RUN: u32 = 30;

/// Default comment posted when an item is marked stale
pub const DEFAULT_MARK_COMMENT: &str = "Is this still relevant? If so, what is blocking it? \
Is there anything you can do to help move it forward?\n\n\
This issue has been automatically marked as stale because it has not had recent activity. \
It will be closed if no further activity occurs.";

/// When stale items get closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAfter {
    /// Closing is disabled (`daysUntilClose: false`)
    Never,

    /// Close after this many further days of inactivity
    Days(u64),
}

impl CloseAfter {
    /// Lookback in days, or `None` when closing is disabled
    ///
    /// Zero days disables closing as well.
    pub fn days(&self) -> Option<u64> {
        match self {
            CloseAfter::Never | CloseAfter::Days(0) => None,
            CloseAfter::Days(days) => Some(*days),
        }
    }

    /// Whether stale items are closed at all
    pub fn is_enabled(&self) -> bool {
        self.days().is_some()
    }
}

/// Which assigned items are exempt from marking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssigneeExemption {
    /// Assigned items are marked like any other (`false`, `[]`)
    Off,

    /// Every assigned item is exempt (`true`)
    AnyAssignee,

    /// Items assigned to one of these logins are exempt
    Logins(Vec<String>),
}

/// Effective settings for one resource type
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Days of inactivity before an item is marked stale
    pub days_until_stale: u64,

    /// Days of inactivity after marking before an item is closed
    pub days_until_close: CloseAfter,

    /// Label applied to stale items
    pub stale_label: String,

    /// Labels that exempt an item from marking
    pub exempt_labels: Vec<String>,

    /// Assignee exemption
    pub exempt_assignees: AssigneeExemption,

    /// Exempt items that belong to a project
    pub exempt_projects: bool,

    /// Exempt items that have a milestone
    pub exempt_milestones: bool,

    /// Comment posted when marking
    pub mark_comment: Option<String>,

    /// Comment posted when unmarking
    pub unmark_comment: Option<String>,

    /// Comment posted when closing
    pub close_comment: Option<String>,

    /// Configured per-run action limit (before the hard cap)
    pub limit_per_run: u32,

    /// Perform mutations; `false` logs intent only
    pub perform: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            days_until_stale: 60,
            days_until_close: CloseAfter::Days(7),
            stale_label: "wontfix".to_string(),
            exempt_labels: vec!["pinned".to_string(), "security".to_string()],
            exempt_assignees: AssigneeExemption::Off,
            exempt_projects: false,
            exempt_milestones: false,
            mark_comment: Some(DEFAULT_MARK_COMMENT.to_string()),
            unmark_comment: None,
            close_comment: None,
            limit_per_run: MAX_ACTIONS_PER_RUN,
            perform: true,
        }
    }
}

impl Settings {
    /// Action budget for one sweep: the configured limit, capped at 30
    ///
    /// # Examples
    ///
    /// ```
    /// use stalebot_config::Settings;
    ///
    /// let settings = Settings { limit_per_run: 100, ..Default::default() };
    /// assert_eq!(settings.run_limit(), 30);
    /// ```
    pub fn run_limit(&self) -> u32 {
        if self.limit_per_run == 0 {
            return MAX_ACTIONS_PER_RUN;
        }
        self.limit_per_run.min(MAX_ACTIONS_PER_RUN)
    }

    /// Settings with every field present in `overrides` replaced
    pub fn overridden_by(&self, overrides: &Overrides) -> Settings {
        Settings {
            days_until_stale: pick(&overrides.days_until_stale, &self.days_until_stale),
            days_until_close: pick(&overrides.days_until_close, &self.days_until_close),
            stale_label: pick(&overrides.stale_label, &self.stale_label),
            exempt_labels: pick(&overrides.exempt_labels, &self.exempt_labels),
            exempt_assignees: pick(&overrides.exempt_assignees, &self.exempt_assignees),
            exempt_projects: pick(&overrides.exempt_projects, &self.exempt_projects),
            exempt_milestones: pick(&overrides.exempt_milestones, &self.exempt_milestones),
            mark_comment: pick(&overrides.mark_comment, &self.mark_comment),
            unmark_comment: pick(&overrides.unmark_comment, &self.unmark_comment),
            close_comment: pick(&overrides.close_comment, &self.close_comment),
            limit_per_run: pick(&overrides.limit_per_run, &self.limit_per_run),
            perform: pick(&overrides.perform, &self.perform),
        }
    }
}

fn pick<T: Clone>(value: &Option<T>, fallback: &T) -> T {
    value.as_ref().unwrap_or(fallback).clone()
}

/// Fields set explicitly in one block of the configuration document
///
/// `None` means "not set here". For comments, `Some(None)` means the block
/// disabled the comment with `false`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    /// `daysUntilStale`
    pub days_until_stale: Option<u64>,
    /// `daysUntilClose`
    pub days_until_close: Option<CloseAfter>,
    /// `staleLabel`
    pub stale_label: Option<String>,
    /// `exemptLabels`
    pub exempt_labels: Option<Vec<String>>,
    /// `exemptAssignees`
    pub exempt_assignees: Option<AssigneeExemption>,
    /// `exemptProjects`
    pub exempt_projects: Option<bool>,
    /// `exemptMilestones`
    pub exempt_milestones: Option<bool>,
    /// `markComment`
    pub mark_comment: Option<Option<String>>,
    /// `unmarkComment`
    pub unmark_comment: Option<Option<String>>,
    /// `closeComment`
    pub close_comment: Option<Option<String>>,
    /// `limitPerRun`
    pub limit_per_run: Option<u32>,
    /// `perform`
    pub perform: Option<bool>,
}

impl Overrides {
    /// Whether the block sets nothing
    pub fn is_empty(&self) -> bool {
        self == &Overrides::default()
    }
}

/// A validated stale-bot configuration
///
/// Holds the global settings plus the raw per-type overrides; use
/// [`StaleConfig::resolve`] to get the effective settings for a type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaleConfig {
    /// Global settings (defaults merged with top-level keys)
    pub global: Settings,

    /// `issues:` block
    pub issues: Overrides,

    /// `pulls:` block
    pub pulls: Overrides,

    /// Restrict sweeps to one resource type
    pub only: Option<ResourceType>,
}

impl StaleConfig {
    /// Overrides declared for a resource type
    pub fn overrides(&self, resource: ResourceType) -> &Overrides {
        match resource {
            ResourceType::Issues => &self.issues,
            ResourceType::Pulls => &self.pulls,
        }
    }

    /// Effective settings for a resource type
    ///
    /// Each field is the per-type override when present, else the global value.
    ///
    /// # Examples
    ///
    /// ```
    /// use stalebot_config::{CloseAfter, Overrides, StaleConfig};
    /// use stalebot_domain::ResourceType;
    ///
    /// let mut config = StaleConfig::default();
    /// config.pulls = Overrides { days_until_close: Some(CloseAfter::Never), ..Default::default() };
    ///
    /// assert!(config.resolve(ResourceType::Issues).days_until_close.is_enabled());
    /// assert!(!config.resolve(ResourceType::Pulls).days_until_close.is_enabled());
    /// ```
    pub fn resolve(&self, resource: ResourceType) -> Settings {
        self.global.overridden_by(self.overrides(resource))
    }

    /// Whether sweeps of this resource type are allowed by `only`
    pub fn sweeps(&self, resource: ResourceType) -> bool {
        self.only.is_none_or(|only| only == resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.days_until_stale, 60);
        assert_eq!(settings.days_until_close, CloseAfter::Days(7));
        assert_eq!(settings.stale_label, "wontfix");
        assert_eq!(settings.exempt_labels, vec!["pinned", "security"]);
        assert!(settings.mark_comment.is_some());
        assert!(settings.close_comment.is_none());
        assert!(settings.perform);
    }

    #[test]
    fn test_run_limit_is_capped() {
        let mut settings = Settings::default();
        settings.limit_per_run = 10;
        assert_eq!(settings.run_limit(), 10);
        settings.limit_per_run = 31;
        assert_eq!(settings.run_limit(), MAX_ACTIONS_PER_RUN);
        settings.limit_per_run = 0;
        assert_eq!(settings.run_limit(), MAX_ACTIONS_PER_RUN);
    }

    #[test]
    fn test_close_after_zero_disables_closing() {
        assert_eq!(CloseAfter::Days(0).days(), None);
        assert_eq!(CloseAfter::Never.days(), None);
        assert_eq!(CloseAfter::Days(3).days(), Some(3));
    }

    #[test]
    fn test_override_precedence() {
        let config = StaleConfig {
            global: Settings {
                stale_label: "stale".to_string(),
                close_comment: Some("bye".to_string()),
                ..Default::default()
            },
            issues: Overrides {
                stale_label: Some("dormant".to_string()),
                close_comment: Some(None),
                ..Default::default()
            },
            ..Default::default()
        };

        let issues = config.resolve(ResourceType::Issues);
        assert_eq!(issues.stale_label, "dormant");
        assert_eq!(issues.close_comment, None);

        let pulls = config.resolve(ResourceType::Pulls);
        assert_eq!(pulls.stale_label, "stale");
        assert_eq!(pulls.close_comment.as_deref(), Some("bye"));
    }

    #[test]
    fn test_only_restricts_sweeps() {
        let mut config = StaleConfig::default();
        assert!(config.sweeps(ResourceType::Issues));
        config.only = Some(ResourceType::Pulls);
        assert!(!config.sweeps(ResourceType::Issues));
        assert!(config.sweeps(ResourceType::Pulls));
    }

    #[test]
    fn test_restricted_config_still_resolves_both_types() {
        let config = StaleConfig {
            pulls: Overrides {
                stale_label: Some("stale-pr".to_string()),
                ..Default::default()
            },
            only: Some(ResourceType::Pulls),
            ..Default::default()
        };

        let copy = config.clone();
        assert_eq!(copy, config);
        assert_eq!(copy.only, Some(ResourceType::Pulls));
        assert_eq!(copy.resolve(ResourceType::Pulls).stale_label, "stale-pr");
        assert_eq!(copy.resolve(ResourceType::Issues).stale_label, "wontfix");
        assert!(format!("{:?}", copy).contains("Pulls"));
    }
}
