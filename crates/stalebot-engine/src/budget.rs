//! Per-sweep action budget
//!
//! Every mark and close spends one unit before touching the tracker. Once
//! the budget is empty further actions are skipped; spent units are never
//! handed back, even if the action fails.

use std::sync::atomic::{AtomicU32, Ordering};

/// Atomic countdown of the mutating actions left in one sweep
///
/// # Examples
///
/// ```
/// use stalebot_engine::ActionBudget;
///
/// let budget = ActionBudget::new(2);
/// assert!(budget.try_take());
/// assert!(budget.try_take());
/// assert!(!budget.try_take());
/// assert_eq!(budget.consumed(), 2);
/// ```
#[derive(Debug)]
pub struct ActionBudget {
    limit: u32,
    remaining: AtomicU32,
}

impl ActionBudget {
    /// Create a budget of `limit` actions
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            remaining: AtomicU32::new(limit),
        }
    }

    /// Spend one unit; `false` when nothing is left
    pub fn try_take(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |left| left.checked_sub(1))
            .is_ok()
    }

    /// Units still available
    pub fn remaining(&self) -> u32 {
        self.remaining.load(Ordering::Acquire)
    }

    /// Units spent so far
    pub fn consumed(&self) -> u32 {
        self.limit - self.remaining()
    }

    /// Initial size of the budget
    pub fn limit(&self) -> u32 {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;

    #[test]
    fn test_empty_budget() {
        let budget = ActionBudget::new(0);
        assert!(!budget.try_take());
        assert_eq!(budget.remaining(), 0);
        assert_eq!(budget.consumed(), 0);
    }

    #[test]
    fn test_concurrent_takes_respect_limit() {
        let budget = Arc::new(ActionBudget::new(30));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let budget = Arc::clone(&budget);
                std::thread::spawn(move || (0..10).filter(|_| budget.try_take()).count())
            })
            .collect();

        let taken: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(taken, 30);
        assert_eq!(budget.remaining(), 0);
    }

    proptest! {
        #[test]
        fn prop_takes_never_exceed_limit(limit in 0u32..64, attempts in 0usize..128) {
            let budget = ActionBudget::new(limit);
            let taken = (0..attempts).filter(|_| budget.try_take()).count();
            prop_assert_eq!(taken, attempts.min(limit as usize));
            prop_assert_eq!(budget.consumed() as usize, taken);
        }
    }
}
