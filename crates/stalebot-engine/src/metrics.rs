//! Metrics collected during a sweep

use crate::Action;
use stalebot_domain::ResourceType;

/// Counters for one mark-and-sweep of one resource type
///
/// In dry-run mode `marked` and `closed` count the actions that would have
/// been taken; they consume budget exactly as live actions do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Resource type swept
    pub resource: ResourceType,

    /// Sweep did not run because `only` names the other type
    pub excluded: bool,

    /// Mutations were logged instead of performed
    pub dry_run: bool,

    /// Closing is enabled for this type
    pub closing_enabled: bool,

    /// Items marked stale
    pub marked: usize,

    /// Items closed
    pub closed: usize,

    /// Candidates ignored because they are locked
    pub skipped_locked: usize,

    /// Candidates left alone because the budget ran out
    pub skipped_budget: usize,

    /// Actions that failed at the tracker
    pub failed: usize,

    /// Budget units spent
    pub budget_consumed: u32,

    /// Budget units available at the start
    pub budget_limit: u32,

    /// Wall-clock duration in milliseconds
    pub elapsed_ms: u64,
}

impl SweepReport {
    /// Create an empty report
    pub fn new(resource: ResourceType, dry_run: bool, closing_enabled: bool) -> Self {
        Self {
            resource,
            excluded: false,
            dry_run,
            closing_enabled,
            marked: 0,
            closed: 0,
            skipped_locked: 0,
            skipped_budget: 0,
            failed: 0,
            budget_consumed: 0,
            budget_limit: 0,
            elapsed_ms: 0,
        }
    }

    /// Report for a sweep that `only` ruled out
    pub fn excluded(resource: ResourceType) -> Self {
        Self {
            excluded: true,
            ..Self::new(resource, false, false)
        }
    }

    /// Record the outcome of a mark
    pub fn record_mark(&mut self, action: Action) {
        match action {
            Action::Applied | Action::DryRun => self.marked += 1,
            Action::OverBudget => self.skipped_budget += 1,
        }
    }

    /// Record the outcome of a close
    pub fn record_close(&mut self, action: Action) {
        match action {
            Action::Applied | Action::DryRun => self.closed += 1,
            Action::OverBudget => self.skipped_budget += 1,
        }
    }

    /// Record a failed action
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Record locked candidates
    pub fn record_locked(&mut self, count: usize) {
        self.skipped_locked += count;
    }

    /// Total mutating actions taken (or simulated)
    pub fn total_actions(&self) -> usize {
        self.marked + self.closed
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let title = format!(
            "Stale sweep of {}{}",
            self.resource,
            if self.dry_run { " (dry run)" } else { "" }
        );
        let mut lines = vec![title.clone(), "=".repeat(title.len())];

        if self.excluded {
            lines.push(format!("Skipped: configured to only process other types"));
            return lines.join("\n");
        }

        lines.push(format!("Marked: {}", self.marked));
        if self.closing_enabled {
            lines.push(format!("Closed: {}", self.closed));
        } else {
            lines.push("Closed: - (closing disabled)".to_string());
        }
        lines.push(format!(
            "Budget: {}/{} used",
            self.budget_consumed, self.budget_limit
        ));

        if self.skipped_locked > 0 {
            lines.push(format!("Skipped (locked): {}", self.skipped_locked));
        }
        if self.skipped_budget > 0 {
            lines.push(format!("Skipped (budget): {}", self.skipped_budget));
        }
        if self.failed > 0 {
            lines.push(format!("Failed: {}", self.failed));
        }
        lines.push(format!("Runtime: {}ms", self.elapsed_ms));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_actions() {
        let mut report = SweepReport::new(ResourceType::Issues, false, true);
        report.record_mark(Action::Applied);
        report.record_mark(Action::OverBudget);
        report.record_close(Action::DryRun);
        report.record_failure();
        report.record_locked(2);

        assert_eq!(report.marked, 1);
        assert_eq!(report.closed, 1);
        assert_eq!(report.skipped_budget, 1);
        assert_eq!(report.skipped_locked, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.total_actions(), 2);
    }

    #[test]
    fn test_summary() {
        let mut report = SweepReport::new(ResourceType::Pulls, true, false);
        report.marked = 4;
        report.budget_consumed = 4;
        report.budget_limit = 30;

        let summary = report.summary();
        assert!(summary.starts_with("Stale sweep of pulls (dry run)"));
        assert!(summary.contains("Marked: 4"));
        assert!(summary.contains("closing disabled"));
        assert!(summary.contains("Budget: 4/30 used"));
        assert!(!summary.contains("Failed"));
    }

    #[test]
    fn test_excluded_summary() {
        let report = SweepReport::excluded(ResourceType::Issues);
        assert!(report.excluded);
        assert!(report.summary().contains("Skipped"));
    }
}
