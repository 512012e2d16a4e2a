//! Validation diagnostics.
//!
//! Errors invalidate the workflow; warnings are advisory and never affect
//! validity. Results from independent passes merge into one report.

use serde::Serialize;

/// A validation error with a suggested fix.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    /// Index of the offending step; `None` for workflow-level errors.
    pub step_index: Option<usize>,
    /// Field the error refers to.
    pub field: String,
    /// Human-readable message.
    pub message: String,
    /// Suggested fix.
    pub suggested_fix: String,
}

/// An advisory validation warning.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationWarning {
    /// Index of the step the warning refers to; `None` for workflow-level.
    pub step_index: Option<usize>,
    /// Field the warning refers to.
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

/// Accumulated validation errors and warnings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no errors exist (warnings are allowed).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record an error with a suggested fix.
    pub fn add_error(
        &mut self,
        step_index: Option<usize>,
        field: impl Into<String>,
        message: impl Into<String>,
        suggested_fix: impl Into<String>,
    ) {
        self.errors.push(ValidationError {
            step_index,
            field: field.into(),
            message: message.into(),
            suggested_fix: suggested_fix.into(),
        });
    }

    /// Record an advisory warning.
    pub fn add_warning(
        &mut self,
        step_index: Option<usize>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.warnings.push(ValidationWarning {
            step_index,
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    /// Fold another result's errors and warnings into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}
