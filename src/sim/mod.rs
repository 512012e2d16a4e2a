//! Offline workflow simulation.
//!
//! Predicts a workflow's outcome with no session and no side effects, so
//! a human can approve a run before it touches the host. Each step adds a
//! fixed duration estimate to a running total checked against the
//! declared tolerance; FILL values are screened for truncation and
//! precision-loss risk.
//!
//! The precision check deliberately rounds to two decimal places
//! regardless of the configured `field_precision` (which the warning text
//! still cites); matching the live system's behavior takes priority over
//! tidiness here.

use std::collections::HashMap;

use serde::Serialize;

use crate::workflow::{ActionKind, StepDefinition, WorkflowDefinition, WorkflowTolerance};

/// Estimated duration of a LOGIN step (connection included).
pub const LOGIN_ESTIMATE_MS: u64 = 2_000;
/// Estimated duration of every other step kind.
pub const STEP_ESTIMATE_MS: u64 = 500;

/// Longest field value the host accepts without truncating.
const MAX_FIELD_LEN: usize = 255;

/// Predicted outcome for a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPrediction {
    Success,
    Timeout,
    Error,
}

/// Predicted outcome for the whole workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictedOutcome {
    Success,
    Timeout,
    ValidationError,
}

impl std::fmt::Display for PredictedOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PredictedOutcome::Success => "success",
            PredictedOutcome::Timeout => "timeout",
            PredictedOutcome::ValidationError => "validation_error",
        };
        write!(f, "{}", s)
    }
}

/// One simulated step.
#[derive(Debug, Clone, Serialize)]
pub struct SimulatedStep {
    pub step_index: usize,
    pub step_name: String,
    pub prediction: StepPrediction,
    pub warning: Option<String>,
}

/// Result of one offline dry run.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSimulation {
    pub steps: Vec<SimulatedStep>,
    pub predicted_outcome: PredictedOutcome,
    pub predicted_fields: HashMap<String, String>,
    pub warnings: Vec<String>,
}

impl WorkflowSimulation {
    /// Whether the simulation predicts a clean run.
    pub fn predict_success(&self) -> bool {
        self.predicted_outcome == PredictedOutcome::Success
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Short summary, e.g. "success: 4 steps, 2 warnings".
    pub fn summary(&self) -> String {
        let mut s = format!("{}: {} steps", self.predicted_outcome, self.steps.len());
        if self.has_warnings() {
            s.push_str(&format!(", {} warnings", self.warnings.len()));
        }
        s
    }
}

/// Simulate a workflow against one data row and a tolerance.
///
/// Pure: no I/O, no session, no clock. A step that pushes the cumulative
/// estimate past `tolerance.max_duration_ms` is marked `timeout` and
/// stops the walk; an ASSERT with no criteria is marked `error` but the
/// walk continues.
pub fn simulate(
    workflow: &WorkflowDefinition,
    row: &HashMap<String, String>,
    tolerance: &WorkflowTolerance,
) -> WorkflowSimulation {
    let mut steps = Vec::new();
    let mut warnings = Vec::new();
    let mut cumulative_ms: u64 = 0;
    let mut outcome = PredictedOutcome::Success;

    if workflow.steps.is_empty() {
        warnings.push("Workflow is empty or invalid".to_string());
        return WorkflowSimulation {
            steps,
            predicted_outcome: PredictedOutcome::ValidationError,
            predicted_fields: HashMap::new(),
            warnings,
        };
    }

    for (index, step) in workflow.steps.iter().enumerate() {
        let kind_and_def = step.as_ref().and_then(|s| s.action.map(|k| (k, s)));
        let Some((kind, def)) = kind_and_def else {
            let warning = format!("Step {} has no action", index);
            steps.push(SimulatedStep {
                step_index: index,
                step_name: "UNKNOWN".to_string(),
                prediction: StepPrediction::Error,
                warning: Some(warning.clone()),
            });
            warnings.push(warning);
            outcome = PredictedOutcome::ValidationError;
            continue;
        };
        let step_name = kind.to_string();
        let mut prediction = StepPrediction::Success;
        let mut step_warning: Option<String> = None;

        let estimate = if kind == ActionKind::Login {
            LOGIN_ESTIMATE_MS
        } else {
            STEP_ESTIMATE_MS
        };
        cumulative_ms += estimate;

        if cumulative_ms > tolerance.max_duration_ms {
            prediction = StepPrediction::Timeout;
            outcome = PredictedOutcome::Timeout;
            step_warning = Some(format!(
                "Step {} would exceed timeout (cumulative: {}ms > {}ms)",
                index, cumulative_ms, tolerance.max_duration_ms
            ));
        }

        if kind == ActionKind::Fill {
            check_fill_fields(def, index, tolerance, &mut warnings);
        }

        if kind == ActionKind::Assert {
            let text_blank = def.text.as_ref().map_or(true, |v| v.is_empty());
            let screen_blank = def.screen.as_ref().map_or(true, |v| v.is_empty());
            if text_blank && screen_blank {
                prediction = StepPrediction::Error;
                outcome = PredictedOutcome::ValidationError;
                step_warning = Some(format!(
                    "Step {} ASSERT: must specify 'screen' or 'text'",
                    index
                ));
            }
        }

        let timed_out = prediction == StepPrediction::Timeout;
        steps.push(SimulatedStep {
            step_index: index,
            step_name,
            prediction,
            warning: step_warning.clone(),
        });
        if let Some(w) = step_warning {
            warnings.push(w);
        }
        if timed_out {
            break;
        }
    }

    WorkflowSimulation {
        steps,
        predicted_outcome: outcome,
        predicted_fields: row.clone(),
        warnings,
    }
}

/// Screen FILL values for truncation and precision-loss risk.
///
/// The rounding is fixed at two decimal places; the warning echoes the
/// configured precision for operator context.
fn check_fill_fields(
    def: &StepDefinition,
    index: usize,
    tolerance: &WorkflowTolerance,
    warnings: &mut Vec<String>,
) {
    let Some(fields) = &def.fields else { return };

    for (name, value) in fields {
        if value.len() > MAX_FIELD_LEN {
            warnings.push(format!(
                "Step {} FILL: field '{}' value too long ({} chars, max {})",
                index,
                name,
                value.len(),
                MAX_FIELD_LEN
            ));
        }

        if let Ok(num) = value.parse::<f64>() {
            let rounded = (num * 100.0).round() / 100.0;
            if num != rounded {
                warnings.push(format!(
                    "Step {} FILL: field '{}' has precision loss (precision: {:.3})",
                    index, name, tolerance.field_precision
                ));
            }
        }
    }
}
