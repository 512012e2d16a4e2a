//! Reliability scoring.
//!
//! Scorers translate one execution's outcome plus its declared tolerance
//! into a confidence score in `[0.0, 1.0]`: the mechanism for deciding
//! whether a workflow's non-determinism is acceptable. Each scorer is
//! pure; classification looks at the failure's error variant first and
//! falls back to message substrings only when the variant is not
//! decisive.

pub mod correctness;
pub mod idempotency;
pub mod latency;

pub use correctness::CorrectnessScorer;
pub use idempotency::IdempotencyScorer;
pub use latency::LatencyScorer;

use crate::exec::WorkflowResult;
use crate::workflow::WorkflowTolerance;

/// A pure reliability scorer.
pub trait Scorer: Send + Sync {
    /// Confidence in `[0.0, 1.0]` that this execution is acceptable
    /// under the given tolerance.
    fn evaluate(&self, result: &WorkflowResult, tolerance: &WorkflowTolerance) -> f64;

    /// Scorer name for reports.
    fn name(&self) -> &'static str;
}

/// All built-in scorers.
pub fn builtin_scorers() -> Vec<Box<dyn Scorer>> {
    vec![
        Box::new(CorrectnessScorer),
        Box::new(IdempotencyScorer),
        Box::new(LatencyScorer),
    ]
}
