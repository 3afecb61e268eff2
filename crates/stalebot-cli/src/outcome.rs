//! Process outcomes and their exit codes.

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Work done (or nothing needed doing)
    Success,
    /// Deliberately did nothing, e.g. activity from a bot
    Neutral,
    /// Configuration, tracker or payload failure
    Failure,
}

impl RunOutcome {
    /// Exit status understood by the Actions runner.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Success => 0,
            RunOutcome::Neutral => 78,
            RunOutcome::Failure => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(RunOutcome::Success.exit_code(), 0);
        assert_eq!(RunOutcome::Neutral.exit_code(), 78);
        assert_eq!(RunOutcome::Failure.exit_code(), 1);
    }
}
