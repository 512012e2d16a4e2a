//! Latency scoring.
//!
//! Confidence that the workflow stays inside its duration SLA:
//! 1.0 comfortably under (below 80% of the bound), 0.0 at or past the
//! bound, a linear score between. The boundary is inclusive: finishing
//! exactly at `max_duration_ms` violates the SLA.

use crate::exec::WorkflowResult;
use crate::workflow::WorkflowTolerance;

use super::Scorer;

pub struct LatencyScorer;

impl Scorer for LatencyScorer {
    fn evaluate(&self, result: &WorkflowResult, tolerance: &WorkflowTolerance) -> f64 {
        let actual = result.latency_ms();
        let max = tolerance.max_duration_ms;

        if actual >= max {
            return 0.0;
        }
        if (actual as f64) < (max as f64) * 0.8 {
            return 1.0;
        }

        // Linear score inside the [80%, 100%) band: 0.8 at the 80% mark.
        let penalty = (max - actual) as f64 / max as f64;
        1.0 - penalty
    }

    fn name(&self) -> &'static str {
        "Latency"
    }
}
