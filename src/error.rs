//! Error types for Greenline operations.
//!
//! This module defines [`GreenlineError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `GreenlineError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `GreenlineError::Other`) for unexpected errors
//! - Execution-fatal errors carry diagnostic context (screen dumps) so a failed
//!   run can be debugged without replaying it against the host

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Greenline operations.
#[derive(Debug, Error)]
pub enum GreenlineError {
    /// Workflow file not found or failed to parse.
    #[error("Failed to load workflow at {path}: {message}")]
    WorkflowLoad { path: PathBuf, message: String },

    /// Step definition is missing a field required by its action kind.
    #[error("Invalid step: {message}")]
    InvalidStep { message: String },

    /// Navigation did not reach the expected screen.
    ///
    /// The screen dump is truncated to at most 80 lines to bound memory.
    #[error("Navigation failed: {message}")]
    NavigationFailed { message: String, screen_dump: String },

    /// A screen assertion did not match.
    ///
    /// Carries the full, untruncated screen dump.
    #[error("Assertion failed: {message}")]
    AssertionFailed { message: String, screen_dump: String },

    /// The busy/lock indicator did not clear within the allowed window.
    #[error("keyboard locked after {timeout_ms}ms")]
    LockTimeout { timeout_ms: u64 },

    /// Session transport failure (connect, disconnect, key injection).
    #[error("Session error: {message}")]
    Session { message: String },

    /// Dataset file not found, malformed, or empty.
    #[error("Dataset error: {message}")]
    Dataset { message: String },

    /// A batch row did not produce a result within its timeout.
    #[error("workflow exceeded {timeout_secs}s timeout")]
    RowTimeout { timeout_secs: u64 },

    /// Batch-level invariant violation (e.g., metrics over an empty result set).
    #[error("Batch error: {message}")]
    Batch { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GreenlineError {
    /// Short variant name, used by scorers and result summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            GreenlineError::WorkflowLoad { .. } => "WorkflowLoad",
            GreenlineError::InvalidStep { .. } => "InvalidStep",
            GreenlineError::NavigationFailed { .. } => "NavigationFailed",
            GreenlineError::AssertionFailed { .. } => "AssertionFailed",
            GreenlineError::LockTimeout { .. } => "LockTimeout",
            GreenlineError::Session { .. } => "Session",
            GreenlineError::Dataset { .. } => "Dataset",
            GreenlineError::RowTimeout { .. } => "RowTimeout",
            GreenlineError::Batch { .. } => "Batch",
            GreenlineError::Io(_) => "Io",
            GreenlineError::Other(_) => "Other",
        }
    }
}

/// Result type alias for Greenline operations.
pub type Result<T> = std::result::Result<T, GreenlineError>;
