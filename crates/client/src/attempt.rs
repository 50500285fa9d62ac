//! Per-attempt scan state: Idle → Submitting → Succeeded | Failed.
//!
//! A verification attempt owns exactly one outstanding request. The
//! guard rejects starting a new attempt while one is in flight, which is
//! what keeps a view from racing duplicate requests for the same
//! reference; independent attempts for different references just use
//! separate guards.

use fpi_protocol::ScanOutcome;

/// Where a verification attempt currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptState {
    Idle,
    Submitting,
    Succeeded(ScanOutcome),
    Failed(String),
}

impl AttemptState {
    /// Succeeded or Failed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AttemptState::Succeeded(_) | AttemptState::Failed(_))
    }
}

/// Invalid transitions on a [`ScanAttempt`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttemptError {
    #[error("a scan request is already in flight")]
    AlreadySubmitting,
    #[error("no scan request is in flight")]
    NotSubmitting,
}

/// Transition guard for one verification attempt.
#[derive(Debug, Clone)]
pub struct ScanAttempt {
    state: AttemptState,
}

impl ScanAttempt {
    pub fn new() -> Self {
        ScanAttempt {
            state: AttemptState::Idle,
        }
    }

    pub fn state(&self) -> &AttemptState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == AttemptState::Submitting
    }

    /// Enter `Submitting`. Allowed from `Idle` or a terminal state (a
    /// finished attempt may be re-run); rejected while one is in flight.
    pub fn begin(&mut self) -> Result<(), AttemptError> {
        if self.is_submitting() {
            return Err(AttemptError::AlreadySubmitting);
        }
        self.state = AttemptState::Submitting;
        Ok(())
    }

    /// Record the outcome of the in-flight request.
    pub fn succeed(&mut self, outcome: ScanOutcome) -> Result<(), AttemptError> {
        if !self.is_submitting() {
            return Err(AttemptError::NotSubmitting);
        }
        self.state = AttemptState::Succeeded(outcome);
        Ok(())
    }

    /// Record the failure of the in-flight request.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), AttemptError> {
        if !self.is_submitting() {
            return Err(AttemptError::NotSubmitting);
        }
        self.state = AttemptState::Failed(message.into());
        Ok(())
    }
}

impl Default for ScanAttempt {
    fn default() -> Self {
        ScanAttempt::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn outcome() -> ScanOutcome {
        ScanOutcome::from_response(&json!({
            "verdict": {
                "isAuthentic": true,
                "isLatestDbState": true,
                "dbCloudHashMatches": true,
                "chainCloudHashMatches": true,
                "message": "ok"
            }
        }))
        .unwrap()
    }

    #[test]
    fn happy_path() {
        let mut attempt = ScanAttempt::new();
        assert_eq!(*attempt.state(), AttemptState::Idle);
        attempt.begin().unwrap();
        assert!(attempt.is_submitting());
        attempt.succeed(outcome()).unwrap();
        assert!(attempt.state().is_terminal());
    }

    #[test]
    fn rejects_double_submit() {
        let mut attempt = ScanAttempt::new();
        attempt.begin().unwrap();
        assert_eq!(attempt.begin(), Err(AttemptError::AlreadySubmitting));
    }

    #[test]
    fn terminal_state_allows_retry() {
        let mut attempt = ScanAttempt::new();
        attempt.begin().unwrap();
        attempt.fail("backend unreachable").unwrap();
        assert!(attempt.state().is_terminal());
        attempt.begin().unwrap();
        assert!(attempt.is_submitting());
    }

    #[test]
    fn outcome_requires_in_flight_request() {
        let mut attempt = ScanAttempt::new();
        assert_eq!(attempt.succeed(outcome()), Err(AttemptError::NotSubmitting));
        assert_eq!(attempt.fail("x"), Err(AttemptError::NotSubmitting));
    }
}
