//! Correctness scoring.
//!
//! Confidence that the workflow produced correct, complete output:
//! 1.0 on success, 0.5 for recoverable failures (a retry may pass),
//! 0.0 for critical ones (data loss, navigation dead-ends, lost
//! connections), 0.3 when the failure is unclassifiable.

use crate::error::GreenlineError;
use crate::exec::WorkflowResult;
use crate::workflow::WorkflowTolerance;

use super::Scorer;

pub struct CorrectnessScorer;

impl Scorer for CorrectnessScorer {
    fn evaluate(&self, result: &WorkflowResult, _tolerance: &WorkflowTolerance) -> f64 {
        if result.is_success() {
            return 1.0;
        }

        let Some(error) = result.error() else {
            // Failure with no recorded cause; assume recoverable.
            return 0.5;
        };

        // Variant match takes priority over message inspection.
        match error {
            // Recoverable: timing or screen state may differ on retry.
            GreenlineError::AssertionFailed { .. } => return 0.5,
            // Critical: the script cannot proceed past a wrong screen.
            GreenlineError::NavigationFailed { .. } => return 0.0,
            _ => {}
        }

        let message = error.to_string();
        let kind = error.kind();

        if message.contains("truncated") || message.contains("data loss") {
            return 0.0;
        }
        if message.contains("field mismatch") || message.contains("type mismatch") {
            return 0.0;
        }
        if message.contains("ConnectionException") || message.contains("TimeoutException") {
            return 0.0;
        }
        if message.contains("assertion") || kind.contains("Assertion") {
            return 0.5;
        }

        // Unknown failure: some confidence remains.
        0.3
    }

    fn name(&self) -> &'static str {
        "Correctness"
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
    fn success_scores_one() {
        let result = WorkflowResult::success("row", 100, PathBuf::from("p"));
        assert_eq!(CorrectnessScorer.evaluate(&result, &tolerance()), 1.0);
    }

    #[test]
    fn assertion_failure_is_recoverable() {
        let result = failure(GreenlineError::AssertionFailed {
            message: "Assertion failed".into(),
            screen_dump: String::new(),
        });
        assert_eq!(CorrectnessScorer.evaluate(&result, &tolerance()), 0.5);
    }

    #[test]
    fn navigation_failure_is_critical() {
        let result = failure(GreenlineError::NavigationFailed {
            message: "Failed to reach MAIN MENU".into(),
            screen_dump: String::new(),
        });
        assert_eq!(CorrectnessScorer.evaluate(&result, &tolerance()), 0.0);
    }

    #[test]
    fn truncation_message_is_critical() {
        let result = failure(GreenlineError::Batch {
            message: "field value truncated on entry".into(),
        });
        assert_eq!(CorrectnessScorer.evaluate(&result, &tolerance()), 0.0);
    }

    #[test]
    fn type_mismatch_message_is_critical() {
        let result = failure(GreenlineError::Batch {
            message: "type mismatch on numeric field".into(),
        });
        assert_eq!(CorrectnessScorer.evaluate(&result, &tolerance()), 0.0);
    }

    #[test]
    fn wrapped_connection_exception_is_critical() {
        let result = failure(GreenlineError::Session {
            message: "host closed: ConnectionException".into(),
        });
        assert_eq!(CorrectnessScorer.evaluate(&result, &tolerance()), 0.0);
    }

    #[test]
    fn assertion_keyword_in_message_is_recoverable() {
        let result = failure(GreenlineError::Other(anyhow::anyhow!(
            "downstream assertion mismatch"
        )));
        assert_eq!(CorrectnessScorer.evaluate(&result, &tolerance()), 0.5);
    }

    #[test]
    fn unknown_failure_scores_point_three() {
        let result = failure(GreenlineError::Session {
            message: "socket reset".into(),
        });
        assert_eq!(CorrectnessScorer.evaluate(&result, &tolerance()), 0.3);
    }
}
