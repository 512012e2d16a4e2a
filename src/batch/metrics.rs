//! Batch result reduction.
//!
//! Computed once over a completed result set; order-independent (the
//! reduction relies only on the multiset of results). Latency percentiles
//! cover successful runs only, since synthesized timeouts record a
//! latency of zero and would skew them.

use std::time::Duration;

use crate::error::{GreenlineError, Result};
use crate::exec::WorkflowResult;

/// Aggregated metrics for one batch execution.
#[derive(Debug)]
pub struct BatchMetrics {
    total_workflows: usize,
    success_count: usize,
    failure_count: usize,
    p50_latency_ms: u64,
    p99_latency_ms: u64,
    throughput_ops_per_sec: f64,
    failures: Vec<WorkflowResult>,
}

impl BatchMetrics {
    /// Reduce a completed result set.
    ///
    /// Rejects an empty set: metrics over nothing are meaningless and
    /// almost always indicate a wiring bug upstream.
    pub fn from_results(results: Vec<WorkflowResult>, wall_clock: Duration) -> Result<Self> {
        if results.is_empty() {
            return Err(GreenlineError::Batch {
                message: "cannot compute metrics over an empty result set".into(),
            });
        }

        let total = results.len();
        let mut latencies: Vec<u64> = Vec::new();
        let mut failures: Vec<WorkflowResult> = Vec::new();

        for result in results {
            if result.is_success() {
                latencies.push(result.latency_ms());
            } else {
                failures.push(result);
            }
        }
        latencies.sort_unstable();

        let success_count = latencies.len();
        let failure_count = failures.len();

        let wall_ms = wall_clock.as_millis() as u64;
        let throughput = if wall_ms > 0 {
            (total as f64 * 1000.0) / wall_ms as f64
        } else {
            0.0
        };

        Ok(Self {
            total_workflows: total,
            success_count,
            failure_count,
            p50_latency_ms: nearest_rank(&latencies, 0.50),
            p99_latency_ms: nearest_rank(&latencies, 0.99),
            throughput_ops_per_sec: throughput,
            failures,
        })
    }

    pub fn total_workflows(&self) -> usize {
        self.total_workflows
    }

    pub fn success_count(&self) -> usize {
        self.success_count
    }

    pub fn failure_count(&self) -> usize {
        self.failure_count
    }

    pub fn p50_latency_ms(&self) -> u64 {
        self.p50_latency_ms
    }

    pub fn p99_latency_ms(&self) -> u64 {
        self.p99_latency_ms
    }

    pub fn throughput_ops_per_sec(&self) -> f64 {
        self.throughput_ops_per_sec
    }

    /// Failed results, verbatim, for diagnostics.
    pub fn failures(&self) -> &[WorkflowResult] {
        &self.failures
    }

    pub fn failure_rate(&self) -> f64 {
        (self.failure_count as f64 * 100.0) / self.total_workflows as f64
    }

    pub fn success_rate(&self) -> f64 {
        100.0 - self.failure_rate()
    }

    /// Formatted report for terminal output.
    pub fn render(&self) -> String {
        let bar = "═".repeat(70);
        let rule = "─".repeat(70);
        let mut out = String::new();
        out.push_str(&format!("\n{}\n", bar));
        out.push_str("  BATCH EXECUTION METRICS\n");
        out.push_str(&format!("{}\n", bar));
        out.push_str(&format!("  Total workflows:   {}\n", self.total_workflows));
        out.push_str(&format!(
            "  Success:           {} ({:.1}%)\n",
            self.success_count,
            self.success_rate()
        ));
        out.push_str(&format!(
            "  Failures:          {} ({:.1}%)\n",
            self.failure_count,
            self.failure_rate()
        ));
        out.push_str(&format!("{}\n", rule));
        out.push_str(&format!("  P50 latency:       {}ms\n", self.p50_latency_ms));
        out.push_str(&format!("  P99 latency:       {}ms\n", self.p99_latency_ms));
        out.push_str(&format!(
            "  Throughput:        {:.1} workflows/sec\n",
            self.throughput_ops_per_sec
        ));
        out.push_str(&format!("{}\n", bar));

        if !self.failures.is_empty() {
            out.push_str("\n  FAILURES:\n");
            for failure in &self.failures {
                out.push_str(&format!("    {}\n", failure.summary()));
                if let Some(error) = failure.error() {
                    out.push_str(&format!("      {}\n", error));
                }
            }
        }

        out
    }
}

/// Nearest-rank percentile over sorted latencies:
/// `index = ceil(percentile × N) − 1`. Empty input yields 0.
fn nearest_rank(sorted: &[u64], percentile: f64) -> u64 {
    if sorted.is_empty() {
        return 0;
    }
    let index = (percentile * sorted.len() as f64).ceil() as usize - 1;
    sorted[index.min(sorted.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn ok(key: &str, latency: u64) -> WorkflowResult {
        WorkflowResult::success(key, latency, PathBuf::from("p"))
    }

    fn results_with_latencies(latencies: &[u64]) -> Vec<WorkflowResult> {
        latencies
            .iter()
            .enumerate()
            .map(|(i, l)| ok(&format!("row{}", i), *l))
            .collect()
    }

    #[test]
    fn empty_result_set_is_rejected() {
        let err = BatchMetrics::from_results(vec![], Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, GreenlineError::Batch { .. }));
    }

    #[test]
    fn counts_partition_on_success_flag() {
        let mut results = results_with_latencies(&[10, 20]);
        results.push(WorkflowResult::timeout("slow", 300));

        let metrics = BatchMetrics::from_results(results, Duration::from_secs(1)).unwrap();
        assert_eq!(metrics.total_workflows(), 3);
        assert_eq!(metrics.success_count(), 2);
        assert_eq!(metrics.failure_count(), 1);
        assert_eq!(metrics.failures().len(), 1);
        assert_eq!(metrics.failures()[0].row_key(), "slow");
    }

    #[test]
    fn nearest_rank_percentiles() {
        let metrics = BatchMetrics::from_results(
            results_with_latencies(&[50, 10, 40, 20, 30]),
            Duration::from_secs(1),
        )
        .unwrap();
        // Sorted: [10,20,30,40,50]; p50 index = ceil(2.5)-1 = 2; p99 index = ceil(4.95)-1 = 4.
        assert_eq!(metrics.p50_latency_ms(), 30);
        assert_eq!(metrics.p99_latency_ms(), 50);
    }

    #[test]
    fn percentiles_ignore_failed_latencies() {
        let mut results = results_with_latencies(&[10, 20, 30]);
        results.push(WorkflowResult::failure(
            "bad",
            9_999,
            GreenlineError::Batch {
                message: "boom".into(),
            },
        ));

        let metrics = BatchMetrics::from_results(results, Duration::from_secs(1)).unwrap();
        assert_eq!(metrics.p99_latency_ms(), 30);
    }

    #[test]
    fn all_failures_zero_percentiles() {
        let results = vec![
            WorkflowResult::timeout("a", 300),
            WorkflowResult::timeout("b", 300),
        ];
        let metrics = BatchMetrics::from_results(results, Duration::from_secs(1)).unwrap();
        assert_eq!(metrics.p50_latency_ms(), 0);
        assert_eq!(metrics.p99_latency_ms(), 0);
    }

    #[test]
    fn throughput_is_results_per_second() {
        let metrics = BatchMetrics::from_results(
            results_with_latencies(&[10, 10, 10, 10]),
            Duration::from_secs(2),
        )
        .unwrap();
        assert!((metrics.throughput_ops_per_sec() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn zero_wall_clock_yields_zero_throughput() {
        let metrics =
            BatchMetrics::from_results(results_with_latencies(&[10]), Duration::ZERO).unwrap();
        assert_eq!(metrics.throughput_ops_per_sec(), 0.0);
    }

    #[test]
    fn reduction_is_order_independent() {
        let forward = BatchMetrics::from_results(
            results_with_latencies(&[5, 15, 25, 35, 45]),
            Duration::from_secs(1),
        )
        .unwrap();
        let reversed = BatchMetrics::from_results(
            results_with_latencies(&[45, 35, 25, 15, 5]),
            Duration::from_secs(1),
        )
        .unwrap();

        assert_eq!(forward.success_count(), reversed.success_count());
        assert_eq!(forward.failure_count(), reversed.failure_count());
        assert_eq!(forward.p50_latency_ms(), reversed.p50_latency_ms());
        assert_eq!(forward.p99_latency_ms(), reversed.p99_latency_ms());
        assert_eq!(
            forward.throughput_ops_per_sec(),
            reversed.throughput_ops_per_sec()
        );
    }

    #[test]
    fn render_includes_failures_section_only_when_present() {
        let clean = BatchMetrics::from_results(
            results_with_latencies(&[10]),
            Duration::from_secs(1),
        )
        .unwrap();
        assert!(!clean.render().contains("FAILURES"));

        let mixed = BatchMetrics::from_results(
            vec![ok("a", 10), WorkflowResult::timeout("b", 300)],
            Duration::from_secs(1),
        )
        .unwrap();
        let report = mixed.render();
        assert!(report.contains("FAILURES"));
        assert!(report.contains("timeout"));
    }
}
