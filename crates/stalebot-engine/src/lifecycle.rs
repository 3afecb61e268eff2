//! Stale lifecycle: mark, close and unmark
//!
//! Items move `untouched → marked → closed`, and back from `marked` to
//! `untouched` when someone interacts with them.

use crate::budget::ActionBudget;
use crate::query::{closable_query, stale_query};
use crate::{EngineError, SweepReport};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use stalebot_config::{Settings, StaleConfig};
use stalebot_domain::{ActivityEvent, IssueTracker, Item, ResourceType, TrackerFailure};
use std::time::Instant;

/// Color given to a stale label the bot has to create
pub const STALE_LABEL_COLOR: &str = "ffffff";

/// What became of a single mark, close or unmark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Tracker was mutated
    Applied,

    /// Dry run: the action was logged only
    DryRun,

    /// Budget exhausted, nothing done
    OverBudget,
}

/// Result of handling activity on a single item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityOutcome {
    /// Activity came from a bot; nothing was inspected
    SenderIsBot,

    /// Item does not carry the stale label
    NotMarked,

    /// Item is already closed
    ItemClosed,

    /// The event is the stale label being added
    JustMarked,

    /// Stale label removed (or would have been, in a dry run)
    Unmarked(Action),
}

impl ActivityOutcome {
    /// Whether the run should end neutral rather than successful
    pub fn is_neutral(&self) -> bool {
        matches!(self, ActivityOutcome::SenderIsBot)
    }
}

/// Drives the stale lifecycle against an [`IssueTracker`]
///
/// # Examples
///
/// ```
/// use stalebot_config::StaleConfig;
/// use stalebot_domain::{Item, ResourceType};
/// use stalebot_engine::StaleEngine;
/// use stalebot_github::MockTracker;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let tracker = MockTracker::new("octo-org/octo-repo");
/// tracker.insert(ResourceType::Issues, Item::open(1, Vec::<String>::new()));
///
/// let engine = StaleEngine::new(tracker.clone(), StaleConfig::default());
/// let report = engine.mark_and_sweep(ResourceType::Issues).await?;
///
/// assert_eq!(report.marked, 1);
/// assert_eq!(tracker.labeled("wontfix"), vec![1]);
/// # Ok(())
/// # }
/// ```
pub struct StaleEngine<T> {
    tracker: T,
    config: StaleConfig,
}

impl<T: IssueTracker> StaleEngine<T> {
    /// Create an engine for the given tracker and configuration
    pub fn new(tracker: T, config: StaleConfig) -> Self {
        Self { tracker, config }
    }

    /// Tracker the engine drives
    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Validated configuration
    pub fn config(&self) -> &StaleConfig {
        &self.config
    }

    /// Mark stale items of `resource`, then close long-stale ones
    ///
    /// Does nothing (not even a search) when `only` names the other type.
    /// Each sweep gets a fresh [`ActionBudget`].
    ///
    /// With `perform` off the sweep still looks up the stale label and runs
    /// both searches, so every candidate is logged and charged to the budget.
    /// Label creation and item mutations are only logged.
    ///
    /// # Errors
    ///
    /// Returns error if the stale label cannot be ensured or a candidate
    /// search fails. Failures on individual items are logged and counted in
    /// the report instead.
    pub async fn mark_and_sweep(&self, resource: ResourceType) -> Result<SweepReport, EngineError> {
        self.mark_and_sweep_at(resource, Utc::now()).await
    }

    /// [`mark_and_sweep`](Self::mark_and_sweep) with an explicit clock
    pub async fn mark_and_sweep_at(
        &self,
        resource: ResourceType,
        now: DateTime<Utc>,
    ) -> Result<SweepReport, EngineError> {
        if !self.config.sweeps(resource) {
            tracing::info!(
                "Skipping {}: configured to only process {}",
                resource,
                self.config.only.map(|only| only.as_str()).unwrap_or_default()
            );
            return Ok(SweepReport::excluded(resource));
        }

        let start = Instant::now();
        let settings = self.config.resolve(resource);
        let budget = ActionBudget::new(settings.run_limit());
        let mut report = SweepReport::new(
            resource,
            !settings.perform,
            settings.days_until_close.is_enabled(),
        );
        report.budget_limit = budget.limit();

        tracing::info!(
            "Starting mark and sweep of {} in {} (limit {})",
            resource,
            self.tracker.repository(),
            budget.limit()
        );

        self.ensure_stale_label(&settings).await?;

        let request = stale_query(resource, &settings, self.tracker.repository(), now);
        let candidates = self.candidates(&request, &mut report).await?;
        let results = join_all(
            candidates
                .iter()
                .map(|item| self.mark_with(&settings, item, &budget)),
        )
        .await;
        for result in results {
            match result {
                Ok(action) => report.record_mark(action),
                Err(e) => {
                    tracing::error!("{}", e);
                    report.record_failure();
                }
            }
        }

        match closable_query(resource, &settings, self.tracker.repository(), now) {
            Some(request) => {
                tracing::info!("Configured to close stale {}", resource);
                let closable = self.candidates(&request, &mut report).await?;
                let results = join_all(
                    closable
                        .iter()
                        .map(|item| self.close_with(&settings, item, &budget)),
                )
                .await;
                for result in results {
                    match result {
                        Ok(action) => report.record_close(action),
                        Err(e) => {
                            tracing::error!("{}", e);
                            report.record_failure();
                        }
                    }
                }
            }
            None => tracing::info!("Configured to leave stale {} open", resource),
        }

        report.budget_consumed = budget.consumed();
        report.elapsed_ms = start.elapsed().as_millis() as u64;
        Ok(report)
    }

    /// Mark one item stale, spending a unit of `budget`
    ///
    /// # Errors
    ///
    /// Returns error if posting the comment or adding the label fails. The
    /// budget unit stays spent.
    pub async fn mark(
        &self,
        resource: ResourceType,
        item: &Item,
        budget: &ActionBudget,
    ) -> Result<Action, EngineError> {
        self.mark_with(&self.config.resolve(resource), item, budget)
            .await
    }

    /// Close one stale item, spending a unit of `budget`
    ///
    /// # Errors
    ///
    /// Returns error if posting the comment or closing fails. The budget unit
    /// stays spent.
    pub async fn close(
        &self,
        resource: ResourceType,
        item: &Item,
        budget: &ActionBudget,
    ) -> Result<Action, EngineError> {
        self.close_with(&self.config.resolve(resource), item, budget)
            .await
    }

    /// Remove the stale label from an item
    ///
    /// Not governed by the budget. A label that is already gone is not an
    /// error; any other removal failure is logged and swallowed.
    ///
    /// # Errors
    ///
    /// Returns error if posting the unmark comment fails.
    pub async fn unmark(&self, resource: ResourceType, item: &Item) -> Result<Action, EngineError> {
        let settings = self.config.resolve(resource);
        let repository = self.tracker.repository();
        let number = item.number;

        if !settings.perform {
            tracing::info!(
                "DRY RUN: Would unmark {}#{} (remove '{}')",
                repository,
                number,
                settings.stale_label
            );
            return Ok(Action::DryRun);
        }

        tracing::info!("{}#{} is being unmarked", repository, number);
        if let Some(comment) = &settings.unmark_comment {
            self.tracker
                .create_comment(number, comment)
                .await
                .map_err(|e| EngineError::action("comment on", number, e))?;
        }

        match self.tracker.remove_label(number, &settings.stale_label).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                tracing::debug!(
                    "Label '{}' already removed from {}#{}",
                    settings.stale_label,
                    repository,
                    number
                );
            }
            Err(e) => {
                tracing::error!("{}", EngineError::action("unlabel", number, e));
            }
        }
        Ok(Action::Applied)
    }

    /// React to activity on a single item
    ///
    /// Unmarks the item if it carries the stale label, is still open, and
    /// the activity is not the stale label itself being added.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ItemNotFound`] if the event omitted labels and
    /// the item could not be fetched, or an unmark error.
    pub async fn handle_activity(
        &self,
        event: &ActivityEvent,
    ) -> Result<ActivityOutcome, EngineError> {
        if event.sender.is_bot() {
            tracing::info!("Sender {} is a bot. Doing nothing", event.sender.login);
            return Ok(ActivityOutcome::SenderIsBot);
        }

        let fetched;
        let item = if event.item.has_label_data() {
            &event.item
        } else {
            tracing::debug!("Payload has no labels, fetching #{}", event.item.number);
            fetched = self
                .tracker
                .get_item(event.item.number)
                .await
                .map_err(|e| {
                    tracing::warn!("Failed to fetch #{}: {}", event.item.number, e);
                    EngineError::ItemNotFound(event.item.number)
                })?;
            &fetched
        };

        let stale_label = self.config.resolve(event.resource).stale_label;
        if !item.has_label(&stale_label) {
            return Ok(ActivityOutcome::NotMarked);
        }
        if item.is_closed() {
            return Ok(ActivityOutcome::ItemClosed);
        }
        if event.adds_label(&stale_label) {
            return Ok(ActivityOutcome::JustMarked);
        }

        let action = self.unmark(event.resource, item).await?;
        Ok(ActivityOutcome::Unmarked(action))
    }

    async fn ensure_stale_label(&self, settings: &Settings) -> Result<(), EngineError> {
        let label = &settings.stale_label;
        let exists = self
            .tracker
            .label_exists(label)
            .await
            .map_err(|e| EngineError::Label(format!("{}: {}", label, e)))?;
        if exists {
            return Ok(());
        }

        if !settings.perform {
            tracing::info!("DRY RUN: Would create label '{}'", label);
            return Ok(());
        }

        tracing::info!("Creating label '{}' in {}", label, self.tracker.repository());
        self.tracker
            .create_label(label, STALE_LABEL_COLOR)
            .await
            .map_err(|e| EngineError::Label(format!("{}: {}", label, e)))
    }

    /// Search, dropping (and counting) locked items
    async fn candidates(
        &self,
        request: &stalebot_domain::SearchRequest,
        report: &mut SweepReport,
    ) -> Result<Vec<Item>, EngineError> {
        let items = self
            .tracker
            .search(request)
            .await
            .map_err(|e| EngineError::Search(e.to_string()))?;
        let (locked, open): (Vec<Item>, Vec<Item>) = items.into_iter().partition(|item| item.locked);
        report.record_locked(locked.len());
        tracing::debug!(
            "Search returned {} candidate(s), {} locked",
            open.len() + locked.len(),
            locked.len()
        );
        Ok(open)
    }

    async fn mark_with(
        &self,
        settings: &Settings,
        item: &Item,
        budget: &ActionBudget,
    ) -> Result<Action, EngineError> {
        if !budget.try_take() {
            tracing::debug!("Action budget exhausted, not marking #{}", item.number);
            return Ok(Action::OverBudget);
        }

        let repository = self.tracker.repository();
        let number = item.number;
        if !settings.perform {
            tracing::info!("DRY RUN: Would mark {}#{} as stale", repository, number);
            return Ok(Action::DryRun);
        }

        tracing::info!("{}#{} is being marked", repository, number);
        if let Some(comment) = &settings.mark_comment {
            self.tracker
                .create_comment(number, comment)
                .await
                .map_err(|e| EngineError::action("comment on", number, e))?;
        }
        self.tracker
            .add_labels(number, std::slice::from_ref(&settings.stale_label))
            .await
            .map_err(|e| EngineError::action("label", number, e))?;
        Ok(Action::Applied)
    }

    async fn close_with(
        &self,
        settings: &Settings,
        item: &Item,
        budget: &ActionBudget,
    ) -> Result<Action, EngineError> {
        if !budget.try_take() {
            tracing::debug!("Action budget exhausted, not closing #{}", item.number);
            return Ok(Action::OverBudget);
        }

        let repository = self.tracker.repository();
        let number = item.number;
        if !settings.perform {
            tracing::info!("DRY RUN: Would close {}#{}", repository, number);
            return Ok(Action::DryRun);
        }

        tracing::info!("{}#{} is being closed", repository, number);
        if let Some(comment) = &settings.close_comment {
            self.tracker
                .create_comment(number, comment)
                .await
                .map_err(|e| EngineError::action("comment on", number, e))?;
        }
        self.tracker
            .close(number)
            .await
            .map_err(|e| EngineError::action("close", number, e))?;
        Ok(Action::Applied)
    }
}
