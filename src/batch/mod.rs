//! Concurrent batch execution.
//!
//! Runs one workflow instance per dataset row. Every row is an
//! independent unit of work on its own thread with its own session,
//! artifact directory, and ledger; there is no shared mutable state.
//! Failures never cross rows. A per-row timeout bounds how long the
//! orchestrator waits for a result, but does not stop the underlying
//! worker: a stuck lock poll can keep consuming its thread after its
//! timeout has been recorded (known limitation).
//!
//! Concurrency is bounded by [`BatchOptions::max_concurrent`] via a
//! permit gate; the default admits every row at once, matching the
//! one-task-per-row design this replaces. Callers with very large
//! datasets should set a bound.

pub mod metrics;

pub use metrics::BatchMetrics;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::artifact::FsArtifacts;
use crate::error::{GreenlineError, Result};
use crate::exec::{StepRunner, WorkflowResult};
use crate::session::SessionFactory;
use crate::workflow::WorkflowDefinition;

/// Default per-row timeout: five minutes.
pub const DEFAULT_ROW_TIMEOUT: Duration = Duration::from_secs(300);

/// Options for one batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// How long the orchestrator waits for each row's result.
    pub row_timeout: Duration,
    /// Maximum rows executing at once; `None` admits every row.
    pub max_concurrent: Option<usize>,
    /// Directory artifact subdirectories are created under.
    pub artifact_root: PathBuf,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            row_timeout: DEFAULT_ROW_TIMEOUT,
            max_concurrent: None,
            artifact_root: PathBuf::from("artifacts"),
        }
    }
}

/// Fan-out executor: one workflow instance per dataset row.
pub struct BatchRunner {
    factory: Arc<dyn SessionFactory>,
    options: BatchOptions,
}

impl BatchRunner {
    pub fn new(factory: Arc<dyn SessionFactory>, options: BatchOptions) -> Self {
        Self { factory, options }
    }

    /// Execute the workflow once per row and reduce to metrics.
    pub fn execute_all(
        &self,
        workflow: &WorkflowDefinition,
        rows: Vec<(String, HashMap<String, String>)>,
    ) -> Result<BatchMetrics> {
        self.execute_all_with_progress(workflow, rows, |_| {})
    }

    /// Execute with a per-row completion callback (progress reporting).
    pub fn execute_all_with_progress(
        &self,
        workflow: &WorkflowDefinition,
        rows: Vec<(String, HashMap<String, String>)>,
        mut on_row: impl FnMut(&WorkflowResult),
    ) -> Result<BatchMetrics> {
        if rows.is_empty() {
            return Err(GreenlineError::Batch {
                message: "dataset contains no data rows".into(),
            });
        }
        if workflow.login_step().is_none() {
            return Err(GreenlineError::InvalidStep {
                message: "workflow requires a LOGIN step".into(),
            });
        }

        let start = Instant::now();
        let workflow = Arc::new(workflow.clone());
        let permits = Arc::new(Permits::new(self.options.max_concurrent));

        // One channel per row: the orchestrator below waits on each in
        // spawn order, so a timeout is charged to the right row.
        let mut receivers = Vec::with_capacity(rows.len());
        for (row_key, row) in rows {
            let (tx, rx) = mpsc::channel();
            receivers.push((row_key.clone(), rx));

            let workflow = Arc::clone(&workflow);
            let factory = Arc::clone(&self.factory);
            let permits = Arc::clone(&permits);
            let artifact_root = self.options.artifact_root.clone();

            thread::spawn(move || {
                permits.acquire();
                let result = run_row(&workflow, &row_key, &row, factory.as_ref(), &artifact_root);
                permits.release();
                // The orchestrator may have given up on this row already.
                let _ = tx.send(result);
            });
        }

        let timeout_secs = self.options.row_timeout.as_secs();
        let mut results = Vec::with_capacity(receivers.len());
        for (row_key, rx) in receivers {
            let result = match rx.recv_timeout(self.options.row_timeout) {
                Ok(result) => result,
                Err(RecvTimeoutError::Timeout) => {
                    warn!("row '{}' exceeded {}s timeout", row_key, timeout_secs);
                    WorkflowResult::timeout(row_key, timeout_secs)
                }
                Err(RecvTimeoutError::Disconnected) => WorkflowResult::failure(
                    row_key,
                    0,
                    GreenlineError::Batch {
                        message: "worker terminated before producing a result".into(),
                    },
                ),
            };
            on_row(&result);
            results.push(result);
        }

        BatchMetrics::from_results(results, start.elapsed())
    }
}

/// Run one row end to end: fresh session, fresh artifact sink, sequential
/// steps. Any error becomes a failure result for this row alone.
fn run_row(
    workflow: &WorkflowDefinition,
    row_key: &str,
    row: &HashMap<String, String>,
    factory: &dyn SessionFactory,
    artifact_root: &std::path::Path,
) -> WorkflowResult {
    let start = Instant::now();
    match run_row_inner(workflow, row_key, row, factory, artifact_root) {
        Ok(artifact_dir) => {
            let latency_ms = start.elapsed().as_millis() as u64;
            debug!("row '{}' completed in {}ms", row_key, latency_ms);
            WorkflowResult::success(row_key, latency_ms, artifact_dir)
        }
        Err(e) => {
            let latency_ms = start.elapsed().as_millis() as u64;
            debug!("row '{}' failed after {}ms: {}", row_key, latency_ms, e);
            WorkflowResult::failure(row_key, latency_ms, e)
        }
    }
}

fn run_row_inner(
    workflow: &WorkflowDefinition,
    row_key: &str,
    row: &HashMap<String, String>,
    factory: &dyn SessionFactory,
    artifact_root: &std::path::Path,
) -> Result<PathBuf> {
    let login = workflow
        .login_step()
        .ok_or_else(|| GreenlineError::InvalidStep {
            message: "workflow requires a LOGIN step".into(),
        })?;

    let session = factory.open(login)?;
    let artifact_dir = artifact_root.join(format!("{}_{}", workflow.path_stem(), row_key));
    let sink = FsArtifacts::create(&artifact_dir)?;

    let mut runner = StepRunner::new(session, &sink, row);
    runner.run_workflow(workflow)?;

    // Already-closed sessions are expected here.
    let _ = runner.disconnect();

    Ok(artifact_dir)
}

/// Counting permit gate over a `Mutex` + `Condvar`. `None` capacity means
/// unbounded (acquire never blocks).
struct Permits {
    capacity: Option<usize>,
    in_use: Mutex<usize>,
    released: Condvar,
}

impl Permits {
    fn new(capacity: Option<usize>) -> Self {
        Self {
            capacity,
            in_use: Mutex::new(0),
            released: Condvar::new(),
        }
    }

    fn acquire(&self) {
        let Some(capacity) = self.capacity else { return };
        let mut in_use = self.in_use.lock().unwrap();
        while *in_use >= capacity {
            in_use = self.released.wait(in_use).unwrap();
        }
        *in_use += 1;
    }

    fn release(&self) {
        if self.capacity.is_none() {
            return;
        }
        let mut in_use = self.in_use.lock().unwrap();
        *in_use -= 1;
        self.released.notify_one();
    }
}
