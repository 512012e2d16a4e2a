//! Per-run execution result.

use std::path::PathBuf;

use crate::error::GreenlineError;

/// Immutable result of one workflow execution attempt (live, batch-row,
/// or synthesized timeout).
///
/// Exactly one of `artifact_path` / `error` is set: the constructors are
/// the only way to build one.
#[derive(Debug)]
pub struct WorkflowResult {
    row_key: String,
    success: bool,
    latency_ms: u64,
    artifact_path: Option<PathBuf>,
    error: Option<GreenlineError>,
}

impl WorkflowResult {
    /// Successful run with its artifact directory.
    pub fn success(row_key: impl Into<String>, latency_ms: u64, artifact_path: PathBuf) -> Self {
        Self {
            row_key: row_key.into(),
            success: true,
            latency_ms,
            artifact_path: Some(artifact_path),
            error: None,
        }
    }

    /// Failed run with the observed latency and cause.
    pub fn failure(row_key: impl Into<String>, latency_ms: u64, error: GreenlineError) -> Self {
        Self {
            row_key: row_key.into(),
            success: false,
            latency_ms,
            artifact_path: None,
            error: Some(error),
        }
    }

    /// Synthesized result for a batch row whose run never produced one.
    /// Latency is unknown and recorded as zero.
    pub fn timeout(row_key: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            row_key: row_key.into(),
            success: false,
            latency_ms: 0,
            artifact_path: None,
            error: Some(GreenlineError::RowTimeout { timeout_secs }),
        }
    }

    pub fn row_key(&self) -> &str {
        &self.row_key
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn latency_ms(&self) -> u64 {
        self.latency_ms
    }

    /// Artifact directory; present iff the run succeeded.
    pub fn artifact_path(&self) -> Option<&PathBuf> {
        self.artifact_path.as_ref()
    }

    /// Failure cause; present iff the run failed.
    pub fn error(&self) -> Option<&GreenlineError> {
        self.error.as_ref()
    }

    /// One-line human-readable summary.
    pub fn summary(&self) -> String {
        if self.success {
            let path = self
                .artifact_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            format!("✓ {} ({}ms) → {}", self.row_key, self.latency_ms, path)
        } else {
            let kind = self.error.as_ref().map_or("unknown", |e| e.kind());
            format!("✗ {} ({}ms) — {}", self.row_key, self.latency_ms, kind)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_carries_artifact_path_only() {
        let result = WorkflowResult::success("row1", 120, PathBuf::from("/artifacts/wf_row1"));
        assert!(result.is_success());
        assert!(result.artifact_path().is_some());
        assert!(result.error().is_none());
    }

    #[test]
    fn failure_carries_error_only() {
        let err = GreenlineError::AssertionFailed {
            message: "Assertion failed".into(),
            screen_dump: String::new(),
        };
        let result = WorkflowResult::failure("row2", 340, err);
        assert!(!result.is_success());
        assert!(result.artifact_path().is_none());
        assert_eq!(result.error().unwrap().kind(), "AssertionFailed");
    }

    #[test]
    fn timeout_has_zero_latency_and_row_key() {
        let result = WorkflowResult::timeout("row3", 300);
        assert!(!result.is_success());
        assert_eq!(result.latency_ms(), 0);
        assert_eq!(result.row_key(), "row3");
        assert!(result.error().unwrap().to_string().contains("timeout"));
    }

    #[test]
    fn summary_marks_outcome() {
        let ok = WorkflowResult::success("r", 10, PathBuf::from("p"));
        assert!(ok.summary().starts_with('✓'));

        let bad = WorkflowResult::timeout("r", 300);
        assert!(bad.summary().starts_with('✗'));
        assert!(bad.summary().contains("RowTimeout"));
    }
}
