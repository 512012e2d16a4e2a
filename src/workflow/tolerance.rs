//! Declared reliability bounds for a workflow.
//!
//! A tolerance answers "is this execution acceptable?": how long it may
//! run, how much numeric precision fielded data may lose, how many
//! retries an outer layer may spend, and whether a human must approve
//! the run first. The core only *scores* against these bounds; it never
//! retries.

use serde::{Deserialize, Serialize};

use crate::error::{GreenlineError, Result};

/// Default per-workflow duration bound: five minutes.
pub const DEFAULT_MAX_DURATION_MS: u64 = 300_000;
/// Default field precision: two decimal places (monetary data).
pub const DEFAULT_FIELD_PRECISION: f64 = 0.01;
/// Default retry budget.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Raw tolerance block as it appears in a workflow file.
///
/// All fields optional; [`WorkflowTolerance::from_spec`] applies defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ToleranceSpec {
    #[serde(default)]
    pub max_duration_ms: Option<u64>,
    #[serde(default)]
    pub field_precision: Option<f64>,
    #[serde(default)]
    pub max_retries: Option<u32>,
    #[serde(default)]
    pub requires_approval: Option<bool>,
}

/// Validated tolerance bounds, shared read-only across concurrent runs.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowTolerance {
    pub workflow_name: String,
    pub max_duration_ms: u64,
    pub field_precision: f64,
    pub max_retries: u32,
    pub requires_approval: bool,
}

impl WorkflowTolerance {
    /// Construct with validation.
    pub fn new(
        workflow_name: impl Into<String>,
        max_duration_ms: u64,
        field_precision: f64,
        max_retries: u32,
        requires_approval: bool,
    ) -> Result<Self> {
        let workflow_name = workflow_name.into();
        if workflow_name.trim().is_empty() {
            return Err(GreenlineError::InvalidStep {
                message: "tolerance requires a workflow name".into(),
            });
        }
        if max_duration_ms == 0 {
            return Err(GreenlineError::InvalidStep {
                message: format!("maxDurationMs must be > 0, got: {}", max_duration_ms),
            });
        }
        if field_precision <= 0.0 {
            return Err(GreenlineError::InvalidStep {
                message: format!("fieldPrecision must be > 0, got: {}", field_precision),
            });
        }
        Ok(Self {
            workflow_name,
            max_duration_ms,
            field_precision,
            max_retries,
            requires_approval,
        })
    }

    /// Tolerance with defaults for every unspecified value.
    pub fn defaults(workflow_name: impl Into<String>) -> Result<Self> {
        Self::new(
            workflow_name,
            DEFAULT_MAX_DURATION_MS,
            DEFAULT_FIELD_PRECISION,
            DEFAULT_MAX_RETRIES,
            false,
        )
    }

    /// Resolve a raw spec against the defaults.
    pub fn from_spec(workflow_name: impl Into<String>, spec: &ToleranceSpec) -> Result<Self> {
        Self::new(
            workflow_name,
            spec.max_duration_ms.unwrap_or(DEFAULT_MAX_DURATION_MS),
            spec.field_precision.unwrap_or(DEFAULT_FIELD_PRECISION),
            spec.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            spec.requires_approval.unwrap_or(false),
        )
    }

    /// Whether an observed duration violates the bound.
    pub fn exceeded_duration(&self, actual_ms: u64) -> bool {
        actual_ms > self.max_duration_ms
    }

    /// Whether a numeric field value is representable at the declared
    /// precision (e.g. 123.456 with precision 0.01 is not).
    pub fn within_precision(&self, value: f64) -> bool {
        let rounded = (value / self.field_precision).round() * self.field_precision;
        (value - rounded).abs() < 1e-9
    }

    /// Whether a retry count stays inside the budget.
    pub fn within_retry_budget(&self, retries: u32) -> bool {
        retries <= self.max_retries
    }
}
