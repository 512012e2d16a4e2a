//! Static workflow validation.
//!
//! The validator gates execution: a workflow with errors never reaches a
//! session. Checks accumulate into one [`ValidationResult`]: errors
//! invalidate the workflow, warnings are advisory only, and structurally
//! malformed steps (including literal nulls) are reported, never thrown.
//!
//! # Pipeline
//!
//! 1. Workflow-level structure (name, non-empty steps)
//! 2. Step ordering ([`ordering`])
//! 3. Per-step checks: action presence, timeout bounds, factory
//!    conversion, kind-specific constraints ([`checks`])
//! 4. Parameter references, an independent pass usable with or without
//!    a concrete dataset ([`parameters`])

pub mod checks;
pub mod ordering;
pub mod parameters;
pub mod result;

pub use checks::{ActionCheck, CheckRegistry};
pub use result::{ValidationError, ValidationResult, ValidationWarning};

use std::collections::HashSet;

use crate::workflow::{Action, StepDefinition, WorkflowDefinition};

/// Minimum accepted step timeout, in milliseconds.
const MIN_STEP_TIMEOUT_MS: u64 = 100;
/// Maximum accepted step timeout, in milliseconds.
const MAX_STEP_TIMEOUT_MS: u64 = 300_000;

/// Validates workflow structure, ordering, and per-step constraints.
pub struct WorkflowValidator {
    checks: CheckRegistry,
}

impl WorkflowValidator {
    /// Create a validator with the built-in per-kind checkers.
    pub fn new() -> Self {
        Self {
            checks: CheckRegistry::with_builtins(),
        }
    }

    /// Run the full structural pipeline (no dataset required).
    pub fn validate(&self, workflow: &WorkflowDefinition) -> ValidationResult {
        let mut result = ValidationResult::new();

        if workflow.name.trim().is_empty() {
            result.add_error(
                None,
                "name",
                "Workflow name is required",
                "Add 'name:' field to the workflow file",
            );
        }

        if workflow.steps.is_empty() {
            result.add_error(
                None,
                "steps",
                "Workflow must have at least one step",
                "Add at least one step to the 'steps:' list",
            );
            // No further checks are meaningful on an empty workflow.
            return result;
        }

        result.merge(ordering::validate_order(&workflow.steps));

        for (index, step) in workflow.steps.iter().enumerate() {
            self.validate_step(step.as_ref(), index, &mut result);
        }

        result
    }

    /// Run the structural pipeline plus the parameter-reference pass
    /// against a set of available dataset columns.
    pub fn validate_with_columns(
        &self,
        workflow: &WorkflowDefinition,
        columns: &HashSet<String>,
    ) -> ValidationResult {
        let mut result = self.validate(workflow);
        result.merge(parameters::validate_references(workflow, columns));
        result
    }

    fn validate_step(
        &self,
        step: Option<&StepDefinition>,
        index: usize,
        result: &mut ValidationResult,
    ) {
        let Some(step) = step else {
            result.add_error(
                Some(index),
                "step",
                "Step is null",
                "Provide a valid step definition",
            );
            return;
        };

        let Some(kind) = step.action else {
            result.add_error(
                Some(index),
                "action",
                "Step action is required",
                "Add 'action:' field (LOGIN, NAVIGATE, FILL, ...)",
            );
            return;
        };

        if let Some(timeout) = step.timeout {
            if !(MIN_STEP_TIMEOUT_MS..=MAX_STEP_TIMEOUT_MS).contains(&timeout) {
                result.add_error(
                    Some(index),
                    "timeout",
                    format!(
                        "Timeout {}ms is outside the accepted range [{}ms, {}ms]",
                        timeout, MIN_STEP_TIMEOUT_MS, MAX_STEP_TIMEOUT_MS
                    ),
                    "Use a timeout between 100 and 300000 milliseconds",
                );
            }
        }

        // Safety net independent of the kind-specific checkers: the same
        // conversion runs again at execution time and must agree.
        if let Err(e) = Action::try_from(step) {
            result.add_error(
                Some(index),
                "action",
                e.to_string(),
                "Complete the step's required fields",
            );
            return;
        }

        if let Some(check) = self.checks.for_kind(kind) {
            check.check(step, index, result);
        }
    }
}

impl Default for WorkflowValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::ActionKind;

    fn login_step() -> Option<StepDefinition> {
        Some(StepDefinition {
            action: Some(ActionKind::Login),
            host: Some("h".into()),
            user: Some("u".into()),
            password: Some("p".into()),
            ..Default::default()
        })
    }

    fn workflow(steps: Vec<Option<StepDefinition>>) -> WorkflowDefinition {
        WorkflowDefinition {
            name: "test".into(),
            steps,
            ..Default::default()
        }
    }

    #[test]
    fn valid_workflow_passes() {
        let wf = workflow(vec![login_step()]);
        let result = WorkflowValidator::new().validate(&wf);
        assert!(result.is_valid(), "{:?}", result.errors());
    }

    #[test]
    fn blank_name_is_an_error() {
        let mut wf = workflow(vec![login_step()]);
        wf.name = "  ".into();
        let result = WorkflowValidator::new().validate(&wf);
        assert!(!result.is_valid());
        assert!(result.errors().iter().any(|e| e.field == "name"));
    }

    #[test]
    fn empty_steps_short_circuits() {
        let wf = workflow(vec![]);
        let result = WorkflowValidator::new().validate(&wf);
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].field, "steps");
    }

    #[test]
    fn null_step_is_reported_not_thrown() {
        let wf = workflow(vec![login_step(), None]);
        let result = WorkflowValidator::new().validate(&wf);
        assert!(result
            .errors()
            .iter()
            .any(|e| e.step_index == Some(1) && e.field == "step"));
    }

    #[test]
    fn missing_action_skips_remaining_step_checks() {
        let bare = Some(StepDefinition {
            timeout: Some(1), // out of bounds, but unreachable without an action
            ..Default::default()
        });
        let wf = workflow(vec![login_step(), bare]);
        let result = WorkflowValidator::new().validate(&wf);
        let step_errors: Vec<_> = result
            .errors()
            .iter()
            .filter(|e| e.step_index == Some(1))
            .collect();
        assert_eq!(step_errors.len(), 1);
        assert_eq!(step_errors[0].field, "action");
    }

    #[test]
    fn timeout_bounds_are_enforced() {
        let mut fill = StepDefinition {
            action: Some(ActionKind::Fill),
            timeout: Some(99),
            ..Default::default()
        };
        fill.fields = Some([("f".to_string(), "v".to_string())].into_iter().collect());

        let wf = workflow(vec![login_step(), Some(fill.clone())]);
        let result = WorkflowValidator::new().validate(&wf);
        assert!(result.errors().iter().any(|e| e.field == "timeout"));

        fill.timeout = Some(300_001);
        let wf = workflow(vec![login_step(), Some(fill.clone())]);
        assert!(WorkflowValidator::new()
            .validate(&wf)
            .errors()
            .iter()
            .any(|e| e.field == "timeout"));

        fill.timeout = Some(100);
        let wf = workflow(vec![login_step(), Some(fill)]);
        assert!(WorkflowValidator::new().validate(&wf).is_valid());
    }

    #[test]
    fn factory_failure_becomes_structured_error() {
        let submit = Some(StepDefinition {
            action: Some(ActionKind::Submit),
            ..Default::default()
        });
        let wf = workflow(vec![login_step(), submit]);
        let result = WorkflowValidator::new().validate(&wf);
        assert!(!result.is_valid());
        assert!(result
            .errors()
            .iter()
            .any(|e| e.step_index == Some(1) && e.message.contains("key")));
    }

    #[test]
    fn valid_workflow_converts_every_step() {
        let mut assert_step = StepDefinition {
            action: Some(ActionKind::Assert),
            ..Default::default()
        };
        assert_step.text = Some("READY".into());
        let wf = workflow(vec![login_step(), Some(assert_step)]);

        let result = WorkflowValidator::new().validate(&wf);
        assert!(result.is_valid());
        for step in wf.steps.iter().flatten() {
            assert!(Action::try_from(step).is_ok());
        }
    }
}
