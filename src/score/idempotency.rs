//! Idempotency scoring.
//!
//! Confidence that re-running the workflow reproduces the same result.
//! Deterministic failures (navigation, assertion) score 1.0 since the
//! same script fails the same way on retry. Timing-sensitive failures
//! score 0.5; anything that varies by cursor position or explicit
//! randomness scores 0.0.

use crate::error::GreenlineError;
use crate::exec::WorkflowResult;
use crate::workflow::WorkflowTolerance;

use super::Scorer;

pub struct IdempotencyScorer;

impl Scorer for IdempotencyScorer {
    fn evaluate(&self, result: &WorkflowResult, _tolerance: &WorkflowTolerance) -> f64 {
        if result.is_success() {
            // Success replays the same path.
            return 1.0;
        }

        let Some(error) = result.error() else {
            return 0.5;
        };

        // Variant match takes priority over message inspection.
        match error {
            GreenlineError::NavigationFailed { .. } | GreenlineError::AssertionFailed { .. } => {
                return 1.0
            }
            _ => {}
        }

        let message = error.to_string();
        let kind = error.kind();

        if message.contains("timeout") || message.contains("lock") {
            // Timing-sensitive: a retry may land differently.
            return 0.5;
        }
        if message.contains("cursor") || message.contains("position") {
            return 0.0;
        }
        if message.contains("random") || message.contains("nondeterministic") {
            return 0.0;
        }
        if kind.contains("Navigation") || kind.contains("Assertion") {
            return 1.0;
        }

        0.5
    }

    fn name(&self) -> &'static str {
        "Idempotency"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn tolerance() -> WorkflowTolerance {
        WorkflowTolerance::defaults("wf").unwrap()
    }

    fn failure(error: GreenlineError) -> WorkflowResult {
        WorkflowResult::failure("row", 100, error)
    }

    #[test]
    fn success_is_fully_idempotent() {
        let result = WorkflowResult::success("row", 100, PathBuf::from("p"));
        assert_eq!(IdempotencyScorer.evaluate(&result, &tolerance()), 1.0);
    }

    #[test]
    fn navigation_failure_repeats_identically() {
        let result = failure(GreenlineError::NavigationFailed {
            message: "Failed to reach MAIN MENU".into(),
            screen_dump: String::new(),
        });
        assert_eq!(IdempotencyScorer.evaluate(&result, &tolerance()), 1.0);
    }

    #[test]
    fn assertion_failure_repeats_identically() {
        let result = failure(GreenlineError::AssertionFailed {
            message: "Assertion failed".into(),
            screen_dump: String::new(),
        });
        assert_eq!(IdempotencyScorer.evaluate(&result, &tolerance()), 1.0);
    }

    #[test]
    fn lock_timeout_is_timing_sensitive() {
        let result = failure(GreenlineError::LockTimeout { timeout_ms: 5000 });
        assert_eq!(IdempotencyScorer.evaluate(&result, &tolerance()), 0.5);
    }

    #[test]
    fn row_timeout_is_timing_sensitive() {
        let result = WorkflowResult::timeout("row", 300);
        assert_eq!(IdempotencyScorer.evaluate(&result, &tolerance()), 0.5);
    }

    #[test]
    fn cursor_variation_is_non_idempotent() {
        let result = failure(GreenlineError::Session {
            message: "cursor position drifted".into(),
        });
        assert_eq!(IdempotencyScorer.evaluate(&result, &tolerance()), 0.0);
    }

    #[test]
    fn explicit_nondeterminism_is_non_idempotent() {
        let result = failure(GreenlineError::Other(anyhow::anyhow!(
            "nondeterministic screen refresh"
        )));
        assert_eq!(IdempotencyScorer.evaluate(&result, &tolerance()), 0.0);
    }

    #[test]
    fn unknown_failure_is_partial() {
        let result = failure(GreenlineError::Session {
            message: "socket reset".into(),
        });
        assert_eq!(IdempotencyScorer.evaluate(&result, &tolerance()), 0.5);
    }
}
