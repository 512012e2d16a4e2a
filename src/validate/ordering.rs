//! Step ordering constraints.
//!
//! - LOGIN must be the first step (error)
//! - SUBMIT should immediately follow NAVIGATE or FILL (warning)

use crate::workflow::{ActionKind, StepDefinition};

use super::result::ValidationResult;

/// Validate ordering constraints over the raw step list.
pub fn validate_order(steps: &[Option<StepDefinition>]) -> ValidationResult {
    let mut result = ValidationResult::new();

    if steps.is_empty() {
        return result;
    }

    let first_kind = steps[0].as_ref().and_then(|s| s.action);
    if first_kind != Some(ActionKind::Login) {
        let found = first_kind.map_or_else(|| "none".to_string(), |k| k.to_string());
        result.add_error(
            Some(0),
            "action",
            format!("Workflow must start with LOGIN step, found: {}", found),
            "Move the LOGIN step to position 0",
        );
    }

    for (i, step) in steps.iter().enumerate() {
        let kind = step.as_ref().and_then(|s| s.action);
        if kind != Some(ActionKind::Submit) {
            continue;
        }
        let prev_kind = if i > 0 {
            steps[i - 1].as_ref().and_then(|s| s.action)
        } else {
            None
        };
        let preceded_by_entry = matches!(
            prev_kind,
            Some(ActionKind::Fill) | Some(ActionKind::Navigate)
        );
        if !preceded_by_entry {
            result.add_warning(
                Some(i),
                "action",
                "SUBMIT should typically follow FILL or NAVIGATE",
            );
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(kind: ActionKind) -> Option<StepDefinition> {
        Some(StepDefinition {
            action: Some(kind),
            ..Default::default()
        })
    }

    #[test]
    fn login_first_passes() {
        let result = validate_order(&[step(ActionKind::Login), step(ActionKind::Navigate)]);
        assert!(result.is_valid());
        assert!(result.warnings().is_empty());
    }

    #[test]
    fn non_login_first_is_single_error_at_index_zero() {
        let result = validate_order(&[step(ActionKind::Navigate), step(ActionKind::Login)]);
        assert!(!result.is_valid());
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].step_index, Some(0));
        assert_eq!(result.errors()[0].field, "action");
    }

    #[test]
    fn null_first_step_is_not_login() {
        let result = validate_order(&[None, step(ActionKind::Login)]);
        assert!(!result.is_valid());
    }

    #[test]
    fn submit_after_fill_is_clean() {
        let result = validate_order(&[
            step(ActionKind::Login),
            step(ActionKind::Fill),
            step(ActionKind::Submit),
        ]);
        assert!(result.warnings().is_empty());
    }

    #[test]
    fn submit_after_wait_warns() {
        let result = validate_order(&[
            step(ActionKind::Login),
            step(ActionKind::Wait),
            step(ActionKind::Submit),
        ]);
        assert!(result.is_valid());
        assert_eq!(result.warnings().len(), 1);
        assert_eq!(result.warnings()[0].step_index, Some(2));
    }

    #[test]
    fn submit_at_index_zero_warns_without_comparing() {
        let result = validate_order(&[step(ActionKind::Submit)]);
        assert_eq!(result.warnings().len(), 1);
        assert_eq!(result.warnings()[0].step_index, Some(0));
    }

    #[test]
    fn empty_steps_produce_nothing() {
        let result = validate_order(&[]);
        assert!(result.is_valid());
        assert!(result.warnings().is_empty());
    }
}
