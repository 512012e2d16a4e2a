//! Workflow definitions and the typed action model.
//!
//! A workflow is loaded from YAML into a [`WorkflowDefinition`]: a named,
//! ordered list of raw [`StepDefinition`]s plus optional execution
//! [`WorkflowTolerance`] bounds. Raw steps are converted into the closed
//! [`Action`] set before execution; the conversion is pure and is performed
//! twice per step (once by the validator, once by the executor) so schema
//! mismatches surface before any session exists.

pub mod action;
pub mod loader;
pub mod schema;
pub mod tolerance;

pub use action::Action;
pub use loader::load_workflow;
pub use schema::{ActionKind, StepDefinition, WorkflowDefinition};
pub use tolerance::{ToleranceSpec, WorkflowTolerance};
