//! Kind-specific step checks.
//!
//! One checker per action kind, looked up by the validator once a step's
//! kind is known. These run after (and independently of) factory
//! conversion, so each reports every missing field with its own suggested
//! fix rather than stopping at the first.

use crate::workflow::{ActionKind, StepDefinition};

use super::result::ValidationResult;

/// A pluggable per-kind constraint check.
pub trait ActionCheck: Send + Sync {
    /// The action kind this check applies to.
    fn kind(&self) -> ActionKind;

    /// Check one step, accumulating diagnostics.
    fn check(&self, step: &StepDefinition, step_index: usize, result: &mut ValidationResult);
}

fn require_field(
    value: &Option<String>,
    kind: ActionKind,
    field: &'static str,
    step_index: usize,
    result: &mut ValidationResult,
) {
    let missing = value.as_ref().map_or(true, |v| v.trim().is_empty());
    if missing {
        result.add_error(
            Some(step_index),
            field,
            format!("{} step requires '{}'", kind, field),
            format!("Add '{}:' to the step", field),
        );
    }
}

/// LOGIN requires host, user, and password.
pub struct LoginCheck;

impl ActionCheck for LoginCheck {
    fn kind(&self) -> ActionKind {
        ActionKind::Login
    }

    fn check(&self, step: &StepDefinition, step_index: usize, result: &mut ValidationResult) {
        require_field(&step.host, self.kind(), "host", step_index, result);
        require_field(&step.user, self.kind(), "user", step_index, result);
        require_field(&step.password, self.kind(), "password", step_index, result);
    }
}

/// NAVIGATE requires a target screen and a keystroke sequence.
pub struct NavigateCheck;

impl ActionCheck for NavigateCheck {
    fn kind(&self) -> ActionKind {
        ActionKind::Navigate
    }

    fn check(&self, step: &StepDefinition, step_index: usize, result: &mut ValidationResult) {
        require_field(&step.screen, self.kind(), "screen", step_index, result);
        require_field(&step.keys, self.kind(), "keys", step_index, result);
    }
}

/// FILL requires a non-empty field map.
pub struct FillCheck;

impl ActionCheck for FillCheck {
    fn kind(&self) -> ActionKind {
        ActionKind::Fill
    }

    fn check(&self, step: &StepDefinition, step_index: usize, result: &mut ValidationResult) {
        let empty = step.fields.as_ref().map_or(true, |f| f.is_empty());
        if empty {
            result.add_error(
                Some(step_index),
                "fields",
                "FILL step requires non-empty 'fields'",
                "Add at least one field under 'fields:'",
            );
        }
    }
}

/// SUBMIT requires an AID key name.
pub struct SubmitCheck;

impl ActionCheck for SubmitCheck {
    fn kind(&self) -> ActionKind {
        ActionKind::Submit
    }

    fn check(&self, step: &StepDefinition, step_index: usize, result: &mut ValidationResult) {
        require_field(&step.key, self.kind(), "key", step_index, result);
    }
}

/// ASSERT requires at least one non-blank criterion.
pub struct AssertCheck;

impl ActionCheck for AssertCheck {
    fn kind(&self) -> ActionKind {
        ActionKind::Assert
    }

    fn check(&self, step: &StepDefinition, step_index: usize, result: &mut ValidationResult) {
        let text_blank = step.text.as_ref().map_or(true, |v| v.trim().is_empty());
        let screen_blank = step.screen.as_ref().map_or(true, |v| v.trim().is_empty());
        if text_blank && screen_blank {
            result.add_error(
                Some(step_index),
                "text",
                "ASSERT step requires 'text' or 'screen'",
                "Add a 'text:' or 'screen:' criterion",
            );
        }
    }
}

/// WAIT requires a positive timeout.
pub struct WaitCheck;

impl ActionCheck for WaitCheck {
    fn kind(&self) -> ActionKind {
        ActionKind::Wait
    }

    fn check(&self, step: &StepDefinition, step_index: usize, result: &mut ValidationResult) {
        match step.timeout {
            Some(ms) if ms > 0 => {}
            _ => result.add_error(
                Some(step_index),
                "timeout",
                "WAIT step requires 'timeout' > 0",
                "Add a positive 'timeout:' in milliseconds",
            ),
        }
    }
}

/// CAPTURE has no required fields; the name defaults at execution time.
pub struct CaptureCheck;

impl ActionCheck for CaptureCheck {
    fn kind(&self) -> ActionKind {
        ActionKind::Capture
    }

    fn check(&self, _step: &StepDefinition, _step_index: usize, _result: &mut ValidationResult) {}
}

/// Registry of per-kind checks.
pub struct CheckRegistry {
    checks: Vec<Box<dyn ActionCheck>>,
}

impl CheckRegistry {
    /// Registry with one checker per built-in action kind.
    pub fn with_builtins() -> Self {
        Self {
            checks: vec![
                Box::new(LoginCheck),
                Box::new(NavigateCheck),
                Box::new(FillCheck),
                Box::new(SubmitCheck),
                Box::new(AssertCheck),
                Box::new(WaitCheck),
                Box::new(CaptureCheck),
            ],
        }
    }

    /// Find the checker for an action kind.
    pub fn for_kind(&self, kind: ActionKind) -> Option<&dyn ActionCheck> {
        self.checks
            .iter()
            .find(|c| c.kind() == kind)
            .map(|c| c.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_step(check: &dyn ActionCheck, step: &StepDefinition) -> ValidationResult {
        let mut result = ValidationResult::new();
        check.check(step, 0, &mut result);
        result
    }

    #[test]
    fn login_reports_each_missing_field() {
        let step = StepDefinition {
            action: Some(ActionKind::Login),
            ..Default::default()
        };
        let result = check_step(&LoginCheck, &step);
        let fields: Vec<_> = result.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["host", "user", "password"]);
    }

    #[test]
    fn login_passes_with_all_fields() {
        let step = StepDefinition {
            action: Some(ActionKind::Login),
            host: Some("h".into()),
            user: Some("u".into()),
            password: Some("p".into()),
            ..Default::default()
        };
        assert!(check_step(&LoginCheck, &step).is_valid());
    }

    #[test]
    fn navigate_requires_screen_and_keys() {
        let step = StepDefinition {
            action: Some(ActionKind::Navigate),
            screen: Some("MAIN_MENU".into()),
            ..Default::default()
        };
        let result = check_step(&NavigateCheck, &step);
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].field, "keys");
    }

    #[test]
    fn assert_accepts_either_criterion() {
        let mut step = StepDefinition {
            action: Some(ActionKind::Assert),
            ..Default::default()
        };
        assert!(!check_step(&AssertCheck, &step).is_valid());

        step.screen = Some("MAIN_MENU".into());
        assert!(check_step(&AssertCheck, &step).is_valid());
    }

    #[test]
    fn wait_rejects_missing_and_zero_timeout() {
        let mut step = StepDefinition {
            action: Some(ActionKind::Wait),
            ..Default::default()
        };
        assert!(!check_step(&WaitCheck, &step).is_valid());

        step.timeout = Some(0);
        assert!(!check_step(&WaitCheck, &step).is_valid());

        step.timeout = Some(500);
        assert!(check_step(&WaitCheck, &step).is_valid());
    }

    #[test]
    fn capture_never_complains() {
        let step = StepDefinition {
            action: Some(ActionKind::Capture),
            ..Default::default()
        };
        assert!(check_step(&CaptureCheck, &step).is_valid());
    }

    #[test]
    fn registry_covers_every_kind() {
        let registry = CheckRegistry::with_builtins();
        for kind in [
            ActionKind::Login,
            ActionKind::Navigate,
            ActionKind::Fill,
            ActionKind::Submit,
            ActionKind::Assert,
            ActionKind::Wait,
            ActionKind::Capture,
        ] {
            assert!(registry.for_kind(kind).is_some(), "no check for {}", kind);
        }
    }
}
