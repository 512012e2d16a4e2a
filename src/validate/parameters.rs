//! Parameter-reference validation.
//!
//! Scans every scalar value of every step for `${data.<name>}` tokens and
//! warns (never errors) when a referenced column is absent from the
//! available set. Usable against a concrete dataset or as a template-only
//! dry run with an empty column set.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::workflow::{StepDefinition, WorkflowDefinition};

use super::result::ValidationResult;

static PARAM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{data\.([^}]+)\}").unwrap());

/// Warn on every `${data.<name>}` reference not present in `columns`.
pub fn validate_references(
    workflow: &WorkflowDefinition,
    columns: &HashSet<String>,
) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (index, step) in workflow.steps.iter().enumerate() {
        let Some(step) = step else { continue };
        for reference in step_references(step) {
            if !columns.contains(&reference) {
                result.add_warning(
                    Some(index),
                    "parameter",
                    format!("Parameter ${{data.{}}} not found in dataset", reference),
                );
            }
        }
    }

    result
}

/// Extract all `${data.<name>}` reference names from one step.
fn step_references(step: &StepDefinition) -> Vec<String> {
    let mut references = Vec::new();

    let scalars = [
        &step.host,
        &step.user,
        &step.password,
        &step.screen,
        &step.keys,
        &step.key,
        &step.text,
        &step.name,
    ];
    for value in scalars.into_iter().flatten() {
        collect_references(value, &mut references);
    }

    if let Some(fields) = &step.fields {
        for value in fields.values() {
            collect_references(value, &mut references);
        }
    }

    references
}

fn collect_references(value: &str, out: &mut Vec<String>) {
    for capture in PARAM_PATTERN.captures_iter(value) {
        out.push(capture[1].to_string());
    }
}
